use glam::Vec2;
use ripplefx_common::{CanvasSize, GridDims};
use std::f64::consts::TAU;

/// Number of radial phases in the amplitude curve. Also the age at which a
/// ripple's global fade reaches zero.
pub const RIPPLE_LENGTH: usize = 2048;

/// Oscillations of the wave train over the full amplitude curve.
pub const RIPPLE_CYCLES: f64 = 18.0;

/// Peak amplitude, as a fraction of the distorted attribute's extent.
pub const RIPPLE_AMPLITUDE: f64 = 0.125;

/// Precomputed propagation data for one non-negative cell offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupEntry {
    /// Outward unit direction of the front through this offset. Zero at the origin.
    pub direction: Vec2,
    /// Radial phase at which the front reaches this offset, in canvas units.
    pub phase: usize,
}

/// Immutable radial lookup tables for one grid/canvas pair.
///
/// Only the `dx, dy >= 0` quadrant is stored; callers mirror the other three.
#[derive(Debug, Clone)]
pub struct RippleLookupTable {
    dims: GridDims,
    entries: Vec<LookupEntry>,
    amplitudes: Vec<f32>,
}

impl RippleLookupTable {
    pub fn new(dims: GridDims, canvas: CanvasSize) -> Self {
        let cell = Vec2::new(
            canvas.width / dims.cols as f32,
            canvas.height / dims.rows as f32,
        );

        let mut entries = Vec::with_capacity(dims.vertex_count());
        for dy in 0..=dims.rows {
            for dx in 0..=dims.cols {
                let offset = Vec2::new(dx as f32, dy as f32) * cell;
                entries.push(LookupEntry {
                    direction: offset.normalize_or_zero(),
                    phase: offset.length().round() as usize,
                });
            }
        }

        let amplitudes = (0..RIPPLE_LENGTH).map(amplitude_at).collect();

        Self {
            dims,
            entries,
            amplitudes,
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Direction and radial phase for the offset `(dx, dy)`.
    ///
    /// `dx` must be in `0..=cols` and `dy` in `0..=rows`.
    pub fn direction(&self, dx: u32, dy: u32) -> LookupEntry {
        debug_assert!(
            dx <= self.dims.cols && dy <= self.dims.rows,
            "offset ({dx}, {dy}) outside {}x{} table",
            self.dims.cols,
            self.dims.rows
        );
        self.entries[self.dims.vertex_index(dx, dy)]
    }

    /// Wave amplitude at a radial phase. Phases past the end clamp to the last entry.
    pub fn amplitude(&self, phase: usize) -> f32 {
        self.amplitudes[phase.min(RIPPLE_LENGTH - 1)]
    }

    /// The full amplitude curve.
    pub fn amplitudes(&self) -> &[f32] {
        &self.amplitudes
    }
}

/// How far a ripple of the given age has travelled past a cell whose front
/// arrives at `base`, clamped into the amplitude curve's domain.
pub fn radial_phase(age: u32, base: usize) -> usize {
    (i64::from(age) - base as i64).clamp(0, RIPPLE_LENGTH as i64 - 1) as usize
}

/// Damped wave train: a raised cosine under a `t^8` envelope, zero at both ends.
fn amplitude_at(phase: usize) -> f32 {
    let t = 1.0 - phase as f64 / (RIPPLE_LENGTH - 1) as f64;
    let wave = 0.5 - 0.5 * (TAU * RIPPLE_CYCLES * t).cos();
    (wave * RIPPLE_AMPLITUDE * t.powi(8)) as f32
}
