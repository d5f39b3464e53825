//! CPU-side image data and PNG encoding

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use thiserror::Error;

use crate::render::target::RenderTarget;

/// Image encoding failures
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Pixel count does not match the dimensions
    #[error("buffer holds {actual} pixels but {width}x{height} needs {expected}")]
    SizeMismatch {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
        /// Pixels required by the dimensions
        expected: usize,
        /// Pixels present
        actual: usize,
    },

    /// The image encoder failed
    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Rendered image: row-major RGBA8 with straight alpha, top row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelBuffer {
    /// Wrap existing pixels
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Result<Self, EncodeError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(EncodeError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Copy the colour buffer of a render target
    pub fn read_back(target: &RenderTarget) -> Self {
        Self {
            width: target.width(),
            height: target.height(),
            pixels: target.color().to_vec(),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, with `y = 0` the top row
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// All pixels
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Pixels as a flat byte slice
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of pixels with non-zero alpha
    pub fn coverage(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0).count()
    }

    /// Encode as a lossless RGBA PNG
    pub fn encode_png(&self) -> Result<Vec<u8>, EncodeError> {
        let image = RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec()).ok_or(
            EncodeError::SizeMismatch {
                width: self.width,
                height: self.height,
                expected: self.width as usize * self.height as usize,
                actual: self.pixels.len(),
            },
        )?;

        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    /// Decode a PNG produced by [`PixelBuffer::encode_png`]
    pub fn decode_png(bytes: &[u8]) -> Result<Self, EncodeError> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
        let (width, height) = image.dimensions();
        let pixels = bytemuck::cast_slice::<u8, [u8; 4]>(image.as_raw()).to_vec();
        Self::from_pixels(width, height, pixels)
    }

    /// Read a PNG file
    pub fn load_png<P: AsRef<Path>>(path: P) -> Result<Self, EncodeError> {
        let image = image::open(path)?.to_rgba8();
        let (width, height) = image.dimensions();
        let pixels = bytemuck::cast_slice::<u8, [u8; 4]>(image.as_raw()).to_vec();
        Self::from_pixels(width, height, pixels)
    }
}
