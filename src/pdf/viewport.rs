//! Page viewport geometry

use crate::error::{Error, Result};

/// Fixed upscale factor applied to the native page size
pub const RENDER_SCALE: f32 = 3.0;

/// Pixel region and scale used to render a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Native page width in points (1 point = 1/72 inch)
    pub page_width: f32,
    /// Native page height in points
    pub page_height: f32,
    /// Scale factor relative to the native size
    pub scale: f32,
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
}

impl Viewport {
    /// Compute the viewport for a page of the given size in points.
    ///
    /// Pixel dimensions are truncated, never below one pixel.
    pub fn new(page_width: f32, page_height: f32, scale: f32) -> Result<Self> {
        if !(page_width.is_finite() && page_height.is_finite() && scale.is_finite())
            || page_width <= 0.0
            || page_height <= 0.0
            || scale <= 0.0
        {
            return Err(Error::Render {
                reason: format!(
                    "Invalid page geometry: {}x{} at scale {}",
                    page_width, page_height, scale
                ),
            });
        }

        Ok(Self {
            page_width,
            page_height,
            scale,
            width: to_pixels(page_width * scale),
            height: to_pixels(page_height * scale),
        })
    }

    /// Total pixel area
    pub fn pixel_area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Fail when the pixel area exceeds `max_pixels`
    pub fn check_pixel_budget(&self, max_pixels: u64) -> Result<()> {
        let area = self.pixel_area();
        if area > max_pixels {
            return Err(Error::ImageDimensionExceeded {
                detail: format!(
                    "pixel area {}x{} = {} exceeds maximum {} pixels",
                    self.width, self.height, area, max_pixels
                ),
            });
        }
        Ok(())
    }
}

fn to_pixels(value: f32) -> u32 {
    // f32 -> u32 casts saturate
    (value.floor() as u32).max(1)
}
