use ripplefx_common::{CanvasSize, DistortMode, GridDims};
use serde::{Deserialize, Serialize};

use crate::error::RippleError;
use crate::table::RIPPLE_LENGTH;

/// Largest vertex count for 16-bit strip indices. `0xFFFF` is the strip
/// restart value, so the last usable index is `0xFFFE`.
pub const MAX_VERTICES: usize = u16::MAX as usize;

/// Default ripple propagation speed, in canvas units per tick.
pub const DEFAULT_STEP: i32 = 7;

/// Construction parameters for a [`RippleSurface`](crate::RippleSurface).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Grid subdivision; fixed for the lifetime of the surface.
    pub grid: GridDims,
    /// Canvas the grid spans, in canvas units.
    pub canvas: CanvasSize,
    /// Attribute distorted right after construction.
    pub initial_mode: DistortMode,
    /// Optional cap on simultaneously active ripples. `None` means unbounded.
    pub max_ripples: Option<usize>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            grid: GridDims::default(),
            canvas: CanvasSize::default(),
            initial_mode: DistortMode::default(),
            max_ripples: None,
        }
    }
}

impl SurfaceConfig {
    /// Default grid over a canvas of the given size.
    pub fn with_canvas(width: f32, height: f32) -> Self {
        Self {
            canvas: CanvasSize::new(width, height),
            ..Self::default()
        }
    }

    /// Check that the configuration describes a buildable surface.
    pub fn validate(&self) -> Result<(), RippleError> {
        let CanvasSize { width, height } = self.canvas;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RippleError::InvalidCanvas { width, height });
        }
        // Ripple durations are `ceil(diagonal) + RIPPLE_LENGTH` and must fit in u32.
        let diagonal = f64::from(width).hypot(f64::from(height)).ceil();
        if diagonal + RIPPLE_LENGTH as f64 > f64::from(u32::MAX) {
            return Err(RippleError::InvalidCanvas { width, height });
        }
        validate_grid(self.grid)
    }
}

/// Check that a grid is non-empty and indexable with `u16`.
pub(crate) fn validate_grid(grid: GridDims) -> Result<(), RippleError> {
    let GridDims { cols, rows } = grid;
    if cols == 0 || rows == 0 {
        return Err(RippleError::EmptyGrid { cols, rows });
    }
    let vertices = (cols as usize + 1).saturating_mul(rows as usize + 1);
    if vertices > MAX_VERTICES {
        return Err(RippleError::GridTooLarge {
            cols,
            rows,
            vertices,
        });
    }
    Ok(())
}
