//! Input mapping: window events become surface actions.
//!
//! # Invariants
//! - Hosts consume [`Action`]s, never raw window events.
//! - Pointer positions map to canvas coordinates centred on the canvas, y up.

pub mod action;

pub use action::{Action, MAX_STEP, MIN_STEP, clamp_step, window_to_canvas};
