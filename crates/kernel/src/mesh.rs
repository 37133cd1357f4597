use glam::{Vec2, Vec3};
use ripplefx_common::{CanvasSize, DistortMode, GridDims};

use crate::config::validate_grid;
use crate::error::RippleError;

/// Fixed-topology subdivided quad centred on the canvas origin.
///
/// Holds a working and a pristine copy of both vertex attributes plus the
/// static triangle-strip index list. Row 0 is the top edge; y points up.
#[derive(Debug, Clone)]
pub struct GridMesh {
    dims: GridDims,
    canvas: CanvasSize,
    positions: Vec<Vec3>,
    pristine_positions: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    pristine_texcoords: Vec<Vec2>,
    indices: Vec<u16>,
}

impl GridMesh {
    /// Build the grid, its pristine snapshot and the strip indices.
    pub fn build(dims: GridDims, canvas: CanvasSize) -> Result<Self, RippleError> {
        validate_grid(dims)?;

        let GridDims { cols, rows } = dims;
        let origin = -canvas.half_extents();
        let piece = Vec2::new(canvas.width / cols as f32, canvas.height / rows as f32);

        let mut positions = Vec::with_capacity(dims.vertex_count());
        let mut texcoords = Vec::with_capacity(dims.vertex_count());
        for row in 0..=rows {
            for col in 0..=cols {
                let flipped = (rows - row) as f32;
                positions.push(Vec3::new(
                    origin.x + col as f32 * piece.x,
                    origin.y + flipped * piece.y,
                    0.0,
                ));
                texcoords.push(Vec2::new(col as f32 / cols as f32, flipped / rows as f32));
            }
        }

        let indices = strip_indices(dims);

        Ok(Self {
            dims,
            canvas,
            pristine_positions: positions.clone(),
            positions,
            pristine_texcoords: texcoords.clone(),
            texcoords,
            indices,
        })
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    pub fn pristine_positions(&self) -> &[Vec3] {
        &self.pristine_positions
    }

    pub fn texcoords(&self) -> &[Vec2] {
        &self.texcoords
    }

    pub fn texcoords_mut(&mut self) -> &mut [Vec2] {
        &mut self.texcoords
    }

    pub fn pristine_texcoords(&self) -> &[Vec2] {
        &self.pristine_texcoords
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Copy the pristine snapshot of one attribute back over its working array.
    pub fn restore(&mut self, mode: DistortMode) {
        match mode {
            DistortMode::Vertices => self.positions.copy_from_slice(&self.pristine_positions),
            DistortMode::TexCoords => self.texcoords.copy_from_slice(&self.pristine_texcoords),
        }
    }

    /// Whether one attribute's working array equals its pristine snapshot.
    pub fn is_pristine(&self, mode: DistortMode) -> bool {
        match mode {
            DistortMode::Vertices => self.positions == self.pristine_positions,
            DistortMode::TexCoords => self.texcoords == self.pristine_texcoords,
        }
    }
}

/// One continuous strip over all rows: for each row, each column contributes
/// its vertex in this row followed by the vertex directly below it.
fn strip_indices(dims: GridDims) -> Vec<u16> {
    let mut indices = Vec::with_capacity(dims.index_count());
    for row in 0..dims.rows {
        for col in 0..=dims.cols {
            indices.push(dims.vertex_index(col, row) as u16);
            indices.push(dims.vertex_index(col, row + 1) as u16);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> GridMesh {
        GridMesh::build(GridDims::new(4, 2), CanvasSize::new(200.0, 100.0)).unwrap()
    }

    #[test]
    fn vertex_and_index_counts() {
        let m = mesh();
        assert_eq!(m.positions().len(), 5 * 3);
        assert_eq!(m.texcoords().len(), 5 * 3);
        assert_eq!(m.indices().len(), 5 * 2 * 2);
    }

    #[test]
    fn corners_span_the_canvas() {
        let m = mesh();
        let dims = m.dims();
        // top-left
        assert_eq!(m.positions()[dims.vertex_index(0, 0)], Vec3::new(-100.0, 50.0, 0.0));
        assert_eq!(m.texcoords()[dims.vertex_index(0, 0)], Vec2::new(0.0, 1.0));
        // bottom-right
        assert_eq!(m.positions()[dims.vertex_index(4, 2)], Vec3::new(100.0, -50.0, 0.0));
        assert_eq!(m.texcoords()[dims.vertex_index(4, 2)], Vec2::new(1.0, 0.0));
    }

    #[test]
    fn interior_vertex_layout() {
        let m = mesh();
        let idx = m.dims().vertex_index(1, 1);
        assert_eq!(m.positions()[idx], Vec3::new(-50.0, 0.0, 0.0));
        assert_eq!(m.texcoords()[idx], Vec2::new(0.25, 0.5));
    }

    #[test]
    fn strip_walks_rows_top_to_bottom() {
        let m = mesh();
        assert_eq!(&m.indices()[..6], &[0, 5, 1, 6, 2, 7]);
        // second row starts after (cols + 1) * 2 entries
        assert_eq!(&m.indices()[10..12], &[5, 10]);
        assert_eq!(*m.indices().last().unwrap(), 14);
    }

    #[test]
    fn starts_pristine_and_restores() {
        let mut m = mesh();
        assert!(m.is_pristine(DistortMode::Vertices));
        assert!(m.is_pristine(DistortMode::TexCoords));

        m.positions_mut()[6].x += 3.0;
        m.texcoords_mut()[7].y -= 0.1;
        assert!(!m.is_pristine(DistortMode::Vertices));

        m.restore(DistortMode::Vertices);
        assert!(m.is_pristine(DistortMode::Vertices));
        assert!(!m.is_pristine(DistortMode::TexCoords));

        m.restore(DistortMode::TexCoords);
        assert!(m.is_pristine(DistortMode::TexCoords));
    }

    #[test]
    fn rejects_unindexable_grid() {
        let err = GridMesh::build(GridDims::new(300, 300), CanvasSize::default()).unwrap_err();
        assert!(matches!(err, RippleError::GridTooLarge { .. }));
    }
}
