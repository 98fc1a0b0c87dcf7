//! 2D drawing surfaces
//!
//! A surface is sized, painted by a PDF engine, and serialized to an encoded
//! image. Environments that can rasterize expose a [`SurfaceProvider`].

use crate::error::Result;
use crate::file::Blob;
use image::{DynamicImage, ImageFormat, RgbaImage};

/// A pixel surface a page can be rendered into
pub trait DrawingSurface: Send {
    /// Resize and clear to transparent
    fn resize(&mut self, width: u32, height: u32);

    /// Current (width, height) in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Paint an image at the origin, clipped to the surface bounds
    fn draw_image(&mut self, image: &DynamicImage) -> Result<()>;

    /// Encode the surface. `Ok(None)` means there was nothing to encode.
    fn to_blob(&self, format: ImageFormat) -> Result<Option<Blob>>;
}

/// Capability to create drawing surfaces
pub trait SurfaceProvider: Send + Sync {
    fn create_surface(&self) -> Box<dyn DrawingSurface>;
}

/// In-memory RGBA surface
#[derive(Debug, Clone, Default)]
pub struct ImageSurface {
    pixels: RgbaImage,
}

impl ImageSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl DrawingSurface for ImageSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::new(width, height);
    }

    fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn draw_image(&mut self, image: &DynamicImage) -> Result<()> {
        let rgba = image.to_rgba8();
        image::imageops::replace(&mut self.pixels, &rgba, 0, 0);
        Ok(())
    }

    fn to_blob(&self, format: ImageFormat) -> Result<Option<Blob>> {
        let (width, height) = self.pixels.dimensions();
        if width == 0 || height == 0 {
            return Ok(None);
        }

        let mut bytes = Vec::new();
        self.pixels
            .write_to(&mut std::io::Cursor::new(&mut bytes), format)?;

        Ok(Some(Blob::new(bytes, format.to_mime_type())))
    }
}

/// Hands out fresh [`ImageSurface`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSurfaceProvider;

impl SurfaceProvider for ImageSurfaceProvider {
    fn create_surface(&self) -> Box<dyn DrawingSurface> {
        Box::new(ImageSurface::new())
    }
}
