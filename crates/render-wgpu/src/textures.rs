//! Images shown under the ripples.
//!
//! Textures are loaded from files through the `image` crate or generated
//! procedurally. Pixel data is RGBA8, top row first.

use std::path::Path;

/// Errors from texture loading.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("RGBA data for a {width}x{height} texture must be {expected} bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("texture dimensions must be non-zero")]
    Empty,
    #[error("texture {name} is {width}x{height}, the device allows at most {max} per side")]
    TooLarge {
        name: String,
        width: u32,
        height: u32,
        max: u32,
    },
}

/// CPU-side RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceTexture {
    pub name: String,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl SurfaceTexture {
    pub fn from_rgba(
        name: impl Into<String>,
        data: Vec<u8>,
        width: u32,
        height: u32,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            data,
            width,
            height,
        })
    }

    /// Load a PNG or JPEG file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| TextureError::Image {
                path: path.display().to_string(),
                source,
            })?
            .into_rgba8();
        let (width, height) = img.dimensions();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::debug!(%name, width, height, "texture loaded");
        Self::from_rgba(name, img.into_raw(), width, height)
    }

    /// Two-colour checkerboard with `cells` squares per side.
    /// Check both sides against a device limit such as
    /// `max_texture_dimension_2d`.
    pub fn check_fits(&self, max_dimension: u32) -> Result<(), TextureError> {
        if self.width > max_dimension || self.height > max_dimension {
            return Err(TextureError::TooLarge {
                name: self.name.clone(),
                width: self.width,
                height: self.height,
                max: max_dimension,
            });
        }
        Ok(())
    }

    pub fn checkerboard(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        Self::generate("checkerboard", size, size, |x, y| {
            if (x / cell + y / cell) % 2 == 0 { a } else { b }
        })
    }

    /// Pool-floor tiles: light grout lines over a blue gradient.
    pub fn pool_tiles(size: u32) -> Self {
        let size = size.max(1);
        let tile = (size / 8).max(2);
        Self::generate("pool tiles", size, size, |x, y| {
            if x % tile < 2 || y % tile < 2 {
                [225, 235, 240, 255]
            } else {
                let depth = y as f32 / size as f32;
                let g = (170.0 - 60.0 * depth) as u8;
                let b = (230.0 - 40.0 * depth) as u8;
                [40, g, b, 255]
            }
        })
    }

    /// Concentric bands around the centre, warm to cool.
    pub fn sunset_rings(size: u32) -> Self {
        let size = size.max(1);
        let centre = size as f32 * 0.5;
        Self::generate("sunset rings", size, size, |x, y| {
            let dx = x as f32 - centre;
            let dy = y as f32 - centre;
            let r = (dx * dx + dy * dy).sqrt() / centre;
            let band = ((r * 12.0).sin() * 0.5 + 0.5) * 0.25;
            let t = (r + band).min(1.0);
            [
                (250.0 - 180.0 * t) as u8,
                (160.0 - 90.0 * t) as u8,
                (60.0 + 150.0 * t) as u8,
                255,
            ]
        })
    }

    fn generate(name: &str, width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&pixel(x, y));
            }
        }
        Self {
            name: name.to_string(),
            data,
            width,
            height,
        }
    }
}

/// The three textures offered when no image files are given.
pub fn builtin_textures() -> Vec<SurfaceTexture> {
    vec![
        SurfaceTexture::pool_tiles(512),
        SurfaceTexture::checkerboard(512, 16, [240, 240, 240, 255], [30, 60, 110, 255]),
        SurfaceTexture::sunset_rings(512),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_checks_size() {
        assert!(SurfaceTexture::from_rgba("ok", vec![0; 16], 2, 2).is_ok());
        assert!(matches!(
            SurfaceTexture::from_rgba("short", vec![0; 15], 2, 2),
            Err(TextureError::SizeMismatch { expected: 16, actual: 15, .. })
        ));
        assert!(matches!(
            SurfaceTexture::from_rgba("empty", vec![], 0, 2),
            Err(TextureError::Empty)
        ));
    }

    #[test]
    fn checkerboard_alternates() {
        let white = [255, 255, 255, 255];
        let black = [0, 0, 0, 255];
        let tex = SurfaceTexture::checkerboard(4, 2, white, black);
        let px = |x: usize, y: usize| &tex.data[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
        assert_eq!(px(0, 0), &white);
        assert_eq!(px(2, 0), &black);
        assert_eq!(px(2, 2), &white);
    }

    #[test]
    fn builtins_are_complete() {
        let textures = builtin_textures();
        assert_eq!(textures.len(), 3);
        for tex in &textures {
            assert_eq!(tex.data.len(), (tex.width * tex.height * 4) as usize);
            assert!(!tex.name.is_empty());
        }
    }

    #[test]
    fn oversized_texture_is_rejected() {
        let wide = SurfaceTexture::from_rgba("wide", vec![0; 9000 * 4], 9000, 1).unwrap();
        assert!(matches!(
            wide.check_fits(8192),
            Err(TextureError::TooLarge { width: 9000, height: 1, max: 8192, .. })
        ));
        let tall = SurfaceTexture::from_rgba("tall", vec![0; 9000 * 4], 1, 9000).unwrap();
        assert!(tall.check_fits(8192).is_err());
        assert!(tall.check_fits(9000).is_ok());
        for tex in builtin_textures() {
            assert!(tex.check_fits(8192).is_ok());
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = SurfaceTexture::from_file("/definitely/not/here.png").unwrap_err();
        assert!(err.to_string().contains("not/here.png"));
    }
}
