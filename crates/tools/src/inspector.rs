use ripplefx_common::{DistortMode, GridCell};
use ripplefx_kernel::{LiveAttribute, RippleId, RippleSurface};
use serde::Serialize;

/// Surface inspector for developer tooling.
///
/// Read-only queries against a [`RippleSurface`] for the CLI and the
/// viewer's side panel.
pub struct SurfaceInspector;

impl SurfaceInspector {
    pub fn summary(surface: &RippleSurface) -> SurfaceSummary {
        SurfaceSummary {
            tick: surface.tick_count(),
            mode: surface.mode(),
            cols: surface.dims().cols,
            rows: surface.dims().rows,
            active_ripples: surface.ripples().len(),
            oldest_age: surface.ripples().iter().map(|r| r.age).max(),
            peak_displacement: Self::peak_displacement(surface),
            pending_events: surface.events().len(),
        }
    }

    /// Every active ripple, in insertion order.
    pub fn ripples(surface: &RippleSurface) -> Vec<RippleInfo> {
        surface
            .ripples()
            .iter()
            .map(|r| RippleInfo {
                id: r.id,
                origin: r.origin,
                age: r.age,
                duration: r.duration,
                step: r.step,
            })
            .collect()
    }

    /// Largest distance between a live attribute value and its pristine
    /// value. Canvas units for positions, texture units for texcoords.
    pub fn peak_displacement(surface: &RippleSurface) -> f32 {
        let mesh = surface.mesh();
        match surface.live_attribute() {
            LiveAttribute::Positions(live) => live
                .iter()
                .zip(mesh.pristine_positions())
                .map(|(a, b)| a.distance(*b))
                .fold(0.0, f32::max),
            LiveAttribute::TexCoords(live) => live
                .iter()
                .zip(mesh.pristine_texcoords())
                .map(|(a, b)| a.distance(*b))
                .fold(0.0, f32::max),
        }
    }
}

/// Summary of surface state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceSummary {
    pub tick: u64,
    pub mode: DistortMode,
    pub cols: u32,
    pub rows: u32,
    pub active_ripples: usize,
    pub oldest_age: Option<u32>,
    pub peak_displacement: f32,
    pub pending_events: usize,
}

impl std::fmt::Display for SurfaceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Surface: tick={} mode={} grid={}x{} ripples={} oldest_age={} peak={:.5} pending_events={}",
            self.tick,
            self.mode,
            self.cols,
            self.rows,
            self.active_ripples,
            self.oldest_age.map_or_else(|| "-".to_string(), |a| a.to_string()),
            self.peak_displacement,
            self.pending_events
        )
    }
}

/// Detailed info about a single ripple.
#[derive(Debug, Clone, Serialize)]
pub struct RippleInfo {
    pub id: RippleId,
    pub origin: GridCell,
    pub age: u32,
    pub duration: u32,
    pub step: u32,
}

impl std::fmt::Display for RippleInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ripple [{}] cell=({}, {}) age={}/{} step={}",
            self.id.0, self.origin.gx, self.origin.gy, self.age, self.duration, self.step
        )
    }
}
