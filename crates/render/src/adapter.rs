use glam::{Vec2, Vec3};

/// A named per-vertex input the shader program consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub location: u32,
    /// Number of `f32` components per vertex.
    pub components: u32,
}

/// Vertex position input: 3 floats per vertex.
pub const POSITION_ATTRIBUTE: VertexAttribute = VertexAttribute {
    name: "a_position",
    location: 0,
    components: 3,
};

/// Texture coordinate input: 2 floats per vertex.
pub const TEXCOORD_ATTRIBUTE: VertexAttribute = VertexAttribute {
    name: "a_texcoord",
    location: 1,
    components: 2,
};

/// Borrowed view of everything needed to draw the grid.
#[derive(Debug, Clone, Copy)]
pub struct MeshBuffers<'a> {
    pub positions: &'a [Vec3],
    pub texcoords: &'a [Vec2],
    /// Triangle-strip indices.
    pub indices: &'a [u16],
}

impl MeshBuffers<'_> {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Renderer-agnostic boundary. All backends implement this trait.
///
/// The engine uploads the mesh once, overwrites one attribute array in full
/// every tick, and asks for a triangle-strip draw each frame. The adapter
/// never mutates engine state.
pub trait RenderAdapter {
    /// Opaque compiled program handle, passed through at draw time.
    type Program;
    /// Where a draw lands (a texture view, a framebuffer, nothing).
    type Target;

    /// Allocate and fill vertex and index buffers.
    fn upload_mesh(&mut self, mesh: &MeshBuffers<'_>);

    /// Overwrite the whole position buffer.
    fn write_positions(&mut self, positions: &[Vec3]);

    /// Overwrite the whole texcoord buffer.
    fn write_texcoords(&mut self, texcoords: &[Vec2]);

    /// Bind `a_position` and `a_texcoord` and draw the strip.
    fn draw(&mut self, program: &Self::Program, target: &Self::Target, mesh: &MeshBuffers<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_layout() {
        assert_eq!(POSITION_ATTRIBUTE.name, "a_position");
        assert_eq!(POSITION_ATTRIBUTE.components, 3);
        assert_eq!(TEXCOORD_ATTRIBUTE.name, "a_texcoord");
        assert_eq!(TEXCOORD_ATTRIBUTE.components, 2);
        assert_ne!(POSITION_ATTRIBUTE.location, TEXCOORD_ATTRIBUTE.location);
    }

    #[test]
    fn mesh_buffer_counts() {
        let positions = [Vec3::ZERO; 4];
        let texcoords = [Vec2::ZERO; 4];
        let indices = [0u16, 2, 1, 3];
        let mesh = MeshBuffers {
            positions: &positions,
            texcoords: &texcoords,
            indices: &indices,
        };
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 4);
    }
}
