use alloc::vec::Vec;

use crate::color::Rgb;
use crate::error::ConfigurationError;

/// Row-major pixel buffer produced by a capture backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl ImageFrame {
    /// Wrap `pixels`, which must hold exactly `width * height` entries
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Result<Self, ConfigurationError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ConfigurationError::PixelCountMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Image filled with a single color
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: alloc::vec![color; width as usize * height as usize],
        }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Set one pixel; coordinates outside the image are ignored
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }
}
