//! Developer Tooling: surface inspector and frame timing.
//!
//! # Invariants
//! - Tools only read surface state.

mod inspector;
mod timing;

pub use inspector::{RippleInfo, SurfaceInspector, SurfaceSummary};
pub use timing::FrameTimer;

pub fn crate_info() -> &'static str {
    "ripplefx-tools v0.1.0"
}
