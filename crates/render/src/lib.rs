//! Rendering Adapter: renderer-agnostic buffer upload and draw interface.
//!
//! # Invariants
//! - Adapters cannot mutate ripple state.
//! - Render buffers derive from the surface's working arrays, overwritten in full.
//!
//! The [`RenderAdapter`] trait is the only thing the engine needs from a
//! backend. [`HeadlessAdapter`] stands in where no GPU exists; the wgpu
//! backend lives in its own crate and plugs in without changing consumers.

mod adapter;
mod engine;
mod headless;

pub use adapter::{
    MeshBuffers, POSITION_ATTRIBUTE, RenderAdapter, TEXCOORD_ATTRIBUTE, VertexAttribute,
};
pub use engine::DistortionEngine;
pub use headless::{AdapterStats, HeadlessAdapter};

pub fn crate_info() -> &'static str {
    "ripplefx-render v0.1.0"
}
