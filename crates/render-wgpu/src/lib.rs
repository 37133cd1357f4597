//! wgpu render backend for the ripple surface.
//!
//! Draws the grid as one indexed triangle strip with a selectable texture,
//! under a pixel-space orthographic projection centred on the canvas.
//!
//! # Invariants
//! - The adapter never mutates surface state.
//! - Attribute buffers are overwritten in full; sizes are fixed at upload.
//! - Frame rate is independent of the surface tick.

mod canvas;
mod gpu;
mod shaders;
mod textures;

pub use canvas::CanvasProjection;
pub use gpu::{RipplePipeline, WgpuRippleAdapter};
pub use shaders::RIPPLE_SHADER;
pub use textures::{SurfaceTexture, TextureError, builtin_textures};

pub fn crate_info() -> &'static str {
    "ripplefx-render-wgpu v0.1.0"
}
