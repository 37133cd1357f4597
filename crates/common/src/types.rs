use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grid subdivision of the rippling quad, in cells.
///
/// A grid of `cols × rows` cells has `(cols + 1) × (rows + 1)` vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    pub cols: u32,
    pub rows: u32,
}

impl GridDims {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    /// Number of vertices per row (`cols + 1`).
    pub fn stride(&self) -> usize {
        self.cols as usize + 1
    }

    pub fn vertex_count(&self) -> usize {
        self.stride() * (self.rows as usize + 1)
    }

    /// Length of the triangle-strip index list covering the whole grid.
    pub fn index_count(&self) -> usize {
        self.stride() * self.rows as usize * 2
    }

    /// Flat index of the vertex at `(col, row)`.
    pub fn vertex_index(&self, col: u32, row: u32) -> usize {
        row as usize * self.stride() + col as usize
    }

    /// Whether the vertex at `(col, row)` sits on the pinned outer edge.
    pub fn is_border(&self, col: u32, row: u32) -> bool {
        col == 0 || row == 0 || col == self.cols || row == self.rows
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self { cols: 32, rows: 32 }
    }
}

/// Size of the rendering surface the grid spans, in canvas units (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Length of the canvas diagonal: the longest distance a ripple front can travel.
    pub fn diagonal(&self) -> f32 {
        (self.width * self.width + self.height * self.height).sqrt()
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Whether a canvas-centered, y-up point lies on the canvas (edges included).
    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.half_extents();
        point.is_finite() && point.x.abs() <= half.x && point.y.abs() <= half.y
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 512.0,
            height: 512.0,
        }
    }
}

/// Integer grid coordinate of a ripple origin. Row 0 is the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub gx: i32,
    pub gy: i32,
}

impl GridCell {
    pub fn new(gx: i32, gy: i32) -> Self {
        Self { gx, gy }
    }
}

/// Which mesh attribute the ripples currently perturb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistortMode {
    /// Displace vertex positions: the quad's geometry wobbles.
    Vertices,
    /// Displace texture coordinates: the image refracts, the geometry stays flat.
    #[default]
    TexCoords,
}

impl DistortMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Vertices => Self::TexCoords,
            Self::TexCoords => Self::Vertices,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertices => "vertices",
            Self::TexCoords => "texcoords",
        }
    }
}

impl fmt::Display for DistortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a distort mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown distort mode {0:?}, expected \"vertices\" or \"texcoords\"")]
pub struct ParseModeError(pub String);

impl FromStr for DistortMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vertices" | "vertex" | "positions" => Ok(Self::Vertices),
            "texcoords" | "texcoord" | "uv" => Ok(Self::TexCoords),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_counts() {
        let dims = GridDims::new(10, 4);
        assert_eq!(dims.vertex_count(), 11 * 5);
        assert_eq!(dims.index_count(), 11 * 4 * 2);
        assert_eq!(dims.vertex_index(3, 2), 2 * 11 + 3);
    }

    #[test]
    fn border_detection() {
        let dims = GridDims::new(4, 4);
        assert!(dims.is_border(0, 2));
        assert!(dims.is_border(4, 2));
        assert!(dims.is_border(2, 0));
        assert!(dims.is_border(2, 4));
        assert!(!dims.is_border(1, 3));
    }

    #[test]
    fn canvas_contains_edges() {
        let canvas = CanvasSize::new(100.0, 50.0);
        assert!(canvas.contains(Vec2::ZERO));
        assert!(canvas.contains(Vec2::new(50.0, -25.0)));
        assert!(!canvas.contains(Vec2::new(50.5, 0.0)));
        assert!(!canvas.contains(Vec2::new(f32::NAN, 0.0)));
    }

    #[test]
    fn canvas_diagonal() {
        let canvas = CanvasSize::new(3.0, 4.0);
        assert_eq!(canvas.diagonal(), 5.0);
    }

    #[test]
    fn distort_mode_defaults_to_texcoords() {
        assert_eq!(DistortMode::default(), DistortMode::TexCoords);
        assert_eq!(DistortMode::TexCoords.toggled(), DistortMode::Vertices);
    }

    #[test]
    fn distort_mode_parses() {
        assert_eq!("Vertices".parse::<DistortMode>(), Ok(DistortMode::Vertices));
        assert_eq!("uv".parse::<DistortMode>(), Ok(DistortMode::TexCoords));
        assert!("normals".parse::<DistortMode>().is_err());
        assert_eq!(DistortMode::Vertices.to_string(), "vertices");
    }
}
