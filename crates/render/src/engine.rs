use ripplefx_common::DistortMode;
use ripplefx_kernel::{
    LiveAttribute, RippleError, RippleId, RippleSurface, SurfaceConfig, SurfaceEvent,
};

use crate::adapter::{MeshBuffers, RenderAdapter};

/// Drives a [`RippleSurface`] and mirrors its buffers into a render adapter.
///
/// The host owns the engine for its whole lifetime and calls `tick` then
/// `draw` once per frame from a single thread.
pub struct DistortionEngine<A: RenderAdapter> {
    surface: RippleSurface,
    adapter: A,
    program: A::Program,
}

impl<A: RenderAdapter> DistortionEngine<A> {
    /// Default grid over a `canvas_width × canvas_height` canvas.
    pub fn new(
        program: A::Program,
        adapter: A,
        canvas_width: f32,
        canvas_height: f32,
        initial_mode: DistortMode,
    ) -> Result<Self, RippleError> {
        let config = SurfaceConfig {
            initial_mode,
            ..SurfaceConfig::with_canvas(canvas_width, canvas_height)
        };
        Self::with_config(program, adapter, config)
    }

    /// Build the surface and upload the pristine mesh through the adapter.
    pub fn with_config(
        program: A::Program,
        mut adapter: A,
        config: SurfaceConfig,
    ) -> Result<Self, RippleError> {
        let surface = RippleSurface::new(&config)?;
        adapter.upload_mesh(&mesh_buffers(&surface));
        Ok(Self {
            surface,
            adapter,
            program,
        })
    }

    /// Start a ripple at a canvas-centered, y-up point.
    pub fn add_ripple(&mut self, x: f32, y: f32, step: i32) -> Result<RippleId, RippleError> {
        self.surface.add_ripple(x, y, step)
    }

    /// Advance one frame and push the live attribute to the adapter.
    pub fn tick(&mut self) {
        self.surface.tick();
        push_live(&self.surface, &mut self.adapter);
    }

    /// Switch the distorted attribute. The restored one is pushed so no stale
    /// distortion lingers in the render buffers.
    pub fn set_distort_mode(&mut self, mode: DistortMode) -> bool {
        let previous = self.surface.mode();
        if !self.surface.set_distort_mode(mode) {
            return false;
        }
        let mesh = self.surface.mesh();
        match previous {
            DistortMode::Vertices => self.adapter.write_positions(mesh.positions()),
            DistortMode::TexCoords => self.adapter.write_texcoords(mesh.texcoords()),
        }
        true
    }

    /// Issue the draw call for the current buffers.
    pub fn draw(&mut self, target: &A::Target) {
        let buffers = mesh_buffers(&self.surface);
        self.adapter.draw(&self.program, target, &buffers);
    }

    pub fn mode(&self) -> DistortMode {
        self.surface.mode()
    }

    pub fn surface(&self) -> &RippleSurface {
        &self.surface
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn program(&self) -> &A::Program {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut A::Program {
        &mut self.program
    }

    /// Drain the surface's event log.
    pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        self.surface.drain_events()
    }
}

fn mesh_buffers(surface: &RippleSurface) -> MeshBuffers<'_> {
    let mesh = surface.mesh();
    MeshBuffers {
        positions: mesh.positions(),
        texcoords: mesh.texcoords(),
        indices: mesh.indices(),
    }
}

fn push_live<A: RenderAdapter>(surface: &RippleSurface, adapter: &mut A) {
    match surface.live_attribute() {
        LiveAttribute::Positions(positions) => adapter.write_positions(positions),
        LiveAttribute::TexCoords(texcoords) => adapter.write_texcoords(texcoords),
    }
}
