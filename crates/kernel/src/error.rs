/// Errors from ripple kernel operations.
///
/// Configuration errors surface at construction; the only runtime errors are
/// invalid pick inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RippleError {
    #[error("ripple step must be positive, got {0}")]
    InvalidStep(i32),
    #[error("point ({x}, {y}) lies outside the {width}x{height} canvas")]
    OutsideCanvas {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    #[error("grid needs at least one column and one row, got {cols}x{rows}")]
    EmptyGrid { cols: u32, rows: u32 },
    #[error("a {cols}x{rows} grid has {vertices} vertices, more than 16-bit indices can address")]
    GridTooLarge { cols: u32, rows: u32, vertices: usize },
    #[error("canvas size must be positive, finite and within ripple duration range, got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
}
