//! Ripple Kernel: radial lookup tables, grid mesh, ripple aging, per-tick distortion.
//!
//! # Invariants
//! - Grid topology is fixed at construction.
//! - Border vertices never move.
//! - Exactly one attribute is distorted; the other equals its pristine snapshot.
//! - Every ripple expires in a bounded number of ticks (`step > 0`).

pub mod config;
pub mod error;
pub mod mesh;
pub mod ripple;
pub mod surface;
pub mod table;

pub use config::{DEFAULT_STEP, MAX_VERTICES, SurfaceConfig};
pub use error::RippleError;
pub use mesh::GridMesh;
pub use ripple::{Ripple, RippleId, RippleSet};
pub use surface::{LiveAttribute, RippleSurface, SurfaceEvent};
pub use table::{LookupEntry, RIPPLE_LENGTH, RippleLookupTable};

pub fn crate_info() -> &'static str {
    "ripplefx-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
