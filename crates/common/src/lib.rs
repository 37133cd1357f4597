//! Shared value types for the ripple engine crates.

mod types;

pub use types::{CanvasSize, DistortMode, GridCell, GridDims, ParseModeError};
