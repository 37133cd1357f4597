use glam::{Mat4, Vec3};

/// Pixel-space orthographic projection with the canvas origin at the
/// viewport centre, y up.
///
/// Grid positions are in canvas units (pixels) centred on the origin, so a
/// 512×512 canvas fills 512×512 pixels in the middle of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasProjection {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CanvasProjection {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl CanvasProjection {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport_width: viewport_width.max(1.0),
            viewport_height: viewport_height.max(1.0),
            near: -1.0,
            far: 1000.0,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width.max(1.0);
        self.viewport_height = height.max(1.0);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(
            0.0,
            self.viewport_width,
            0.0,
            self.viewport_height,
            self.near,
            self.far,
        )
    }

    /// Moves the canvas origin to the viewport centre.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(
            self.viewport_width * 0.5,
            self.viewport_height * 0.5,
            0.0,
        ))
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.model_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_origin_is_clip_centre() {
        let proj = CanvasProjection::new(800.0, 600.0);
        let clip = proj.view_projection().project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-6);
        assert!(clip.y.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&clip.z));
    }

    #[test]
    fn half_viewport_reaches_clip_edge() {
        let proj = CanvasProjection::new(800.0, 600.0);
        let clip = proj.view_projection().project_point3(Vec3::new(400.0, 300.0, 0.0));
        assert!((clip.x - 1.0).abs() < 1e-5);
        assert!((clip.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn resize_never_collapses() {
        let mut proj = CanvasProjection::default();
        proj.resize(0.0, 0.0);
        assert_eq!(proj.viewport_width, 1.0);
        let vp = proj.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }
}
