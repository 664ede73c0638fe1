//! Spatial mapper
//!
//! Reduces a captured image to one mean color per LED. The pixel indices of
//! every LED are computed once for a given image size and border crop; a frame
//! then only needs to be summed.

use alloc::vec::Vec;

use crate::color::{BLACK, Rgb};
use crate::error::ConfigurationError;
use crate::image::ImageFrame;

/// Fractional extent below which a viewport is treated as empty
const ZERO_AREA_EPSILON: f64 = 1e-6;

const MAPPING_NAME_MULTICOLOR: &str = "multicolor_mean";
const MAPPING_NAME_UNICOLOR: &str = "unicolor_mean";

/// Viewport of one physical LED inside the active capture area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedGeometry {
    /// Position of the LED on the strip
    pub index: u32,
    pub min_x_frac: f64,
    pub max_x_frac: f64,
    pub min_y_frac: f64,
    pub max_y_frac: f64,
}

impl LedGeometry {
    pub const fn new(index: u32, x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            index,
            min_x_frac: x.0,
            max_x_frac: x.1,
            min_y_frac: y.0,
            max_y_frac: y.1,
        }
    }

    fn is_valid(&self) -> bool {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        in_unit(self.min_x_frac)
            && in_unit(self.max_x_frac)
            && in_unit(self.min_y_frac)
            && in_unit(self.max_y_frac)
            && self.max_x_frac >= self.min_x_frac
            && self.max_y_frac >= self.min_y_frac
    }

    fn is_zero_area(&self) -> bool {
        self.max_x_frac - self.min_x_frac < ZERO_AREA_EPSILON
            || self.max_y_frac - self.min_y_frac < ZERO_AREA_EPSILON
    }
}

/// How LED colors are derived from their pixel regions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MappingType {
    /// Every LED gets the mean of its own region
    #[default]
    MulticolorMean,
    /// Every LED gets the mean of all mapped regions together
    UnicolorMean,
}

impl MappingType {
    pub fn parse_from_str(s: &str) -> Result<Self, ConfigurationError> {
        match s {
            MAPPING_NAME_MULTICOLOR => Ok(Self::MulticolorMean),
            MAPPING_NAME_UNICOLOR => Ok(Self::UnicolorMean),
            _ => Err(ConfigurationError::UnknownMappingType(s.into())),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MulticolorMean => MAPPING_NAME_MULTICOLOR,
            Self::UnicolorMean => MAPPING_NAME_UNICOLOR,
        }
    }
}

/// LED geometry and border crop, independent of the image size
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedLayout {
    pub geometry: Vec<LedGeometry>,
    /// Rows cropped from the top and the bottom
    pub horizontal_border: u32,
    /// Columns cropped from the left and the right
    pub vertical_border: u32,
    pub mapping: MappingType,
}

impl LedLayout {
    pub fn new(geometry: Vec<LedGeometry>) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_borders(mut self, horizontal_border: u32, vertical_border: u32) -> Self {
        self.horizontal_border = horizontal_border;
        self.vertical_border = vertical_border;
        self
    }

    #[must_use]
    pub fn with_mapping(mut self, mapping: MappingType) -> Self {
        self.mapping = mapping;
        self
    }

    /// Build the mapper for an image of the given size
    pub fn mapper(&self, width: u32, height: u32) -> Result<SpatialMapper, ConfigurationError> {
        SpatialMapper::new(
            width,
            height,
            self.horizontal_border,
            self.vertical_border,
            &self.geometry,
        )
    }
}

/// Precomputed image-to-LED index map
#[derive(Debug, Clone)]
pub struct SpatialMapper {
    width: u32,
    height: u32,
    /// Flat pixel indices per LED, in strip order
    leds: Vec<Vec<usize>>,
}

impl SpatialMapper {
    pub fn new(
        width: u32,
        height: u32,
        horizontal_border: u32,
        vertical_border: u32,
        geometry: &[LedGeometry],
    ) -> Result<Self, ConfigurationError> {
        let active_width = width.saturating_sub(vertical_border.saturating_mul(2));
        let active_height = height.saturating_sub(horizontal_border.saturating_mul(2));
        if active_width == 0 || active_height == 0 {
            return Err(ConfigurationError::EmptyActiveArea {
                width,
                height,
                horizontal: horizontal_border,
                vertical: vertical_border,
            });
        }

        let led_count = geometry.len();
        let mut leds: Vec<Option<Vec<usize>>> = alloc::vec![None; led_count];
        for led in geometry {
            if !led.is_valid() {
                return Err(ConfigurationError::InvalidGeometry { index: led.index });
            }
            let slot = leds
                .get_mut(led.index as usize)
                .filter(|slot| slot.is_none())
                .ok_or(ConfigurationError::InvalidLedIndex {
                    index: led.index,
                    led_count,
                })?;

            if led.is_zero_area() {
                *slot = Some(Vec::new());
                continue;
            }

            let (min_x, max_x) =
                axis_bounds(vertical_border, active_width, led.min_x_frac, led.max_x_frac);
            let (min_y, max_y) = axis_bounds(
                horizontal_border,
                active_height,
                led.min_y_frac,
                led.max_y_frac,
            );

            let mut indices =
                Vec::with_capacity((max_x - min_x) as usize * (max_y - min_y) as usize);
            for y in min_y..max_y {
                let row = y as usize * width as usize;
                indices.extend((min_x..max_x).map(|x| row + x as usize));
            }
            *slot = Some(indices);
        }

        Ok(Self {
            width,
            height,
            // every slot is filled: indices are unique and below led_count
            leds: leds.into_iter().map(Option::unwrap_or_default).collect(),
        })
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub fn led_count(&self) -> usize {
        self.leds.len()
    }

    /// Pixel indices sampled for `led`
    pub fn pixel_indices(&self, led: usize) -> Option<&[usize]> {
        self.leds.get(led).map(Vec::as_slice)
    }

    /// Mean color of every LED's region; empty regions are black
    pub fn mean_led_colors(&self, image: &ImageFrame) -> Result<Vec<Rgb>, ConfigurationError> {
        self.check_size(image)?;
        let pixels = image.pixels();
        Ok(self
            .leds
            .iter()
            .map(|indices| {
                let mut sum = ChannelSum::default();
                sum.add_all(pixels, indices);
                sum.mean()
            })
            .collect())
    }

    /// Mean over the union of all LED regions, repeated for every LED
    pub fn mean_color(&self, image: &ImageFrame) -> Result<Vec<Rgb>, ConfigurationError> {
        self.check_size(image)?;
        let pixels = image.pixels();
        let mut sum = ChannelSum::default();
        for indices in &self.leds {
            sum.add_all(pixels, indices);
        }
        Ok(alloc::vec![sum.mean(); self.leds.len()])
    }

    /// LED colors according to `mapping`
    pub fn led_colors(
        &self,
        image: &ImageFrame,
        mapping: MappingType,
    ) -> Result<Vec<Rgb>, ConfigurationError> {
        match mapping {
            MappingType::MulticolorMean => self.mean_led_colors(image),
            MappingType::UnicolorMean => self.mean_color(image),
        }
    }

    fn check_size(&self, image: &ImageFrame) -> Result<(), ConfigurationError> {
        if image.width() != self.width || image.height() != self.height {
            return Err(ConfigurationError::ImageSizeMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: image.width(),
                actual_height: image.height(),
            });
        }
        Ok(())
    }
}

/// Half-open pixel range `[min, max)` of one axis, never empty
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn axis_bounds(offset: u32, size: u32, min_frac: f64, max_frac: f64) -> (u32, u32) {
    let to_index = |frac: f64| {
        let step = libm::round(f64::from(size) * frac).clamp(0.0, f64::from(size)) as u32;
        offset + step
    };
    let mut min = to_index(min_frac);
    let mut max = to_index(max_frac);

    if max == min {
        if max < offset + size {
            max += 1;
        } else {
            min -= 1;
        }
    }
    (min, max)
}

#[derive(Default)]
struct ChannelSum {
    r: u64,
    g: u64,
    b: u64,
    count: u64,
}

impl ChannelSum {
    fn add_all(&mut self, pixels: &[Rgb], indices: &[usize]) {
        for pixel in indices.iter().filter_map(|&i| pixels.get(i)) {
            self.r += u64::from(pixel.r);
            self.g += u64::from(pixel.g);
            self.b += u64::from(pixel.b);
            self.count += 1;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn mean(&self) -> Rgb {
        if self.count == 0 {
            return BLACK;
        }
        Rgb {
            r: (self.r / self.count) as u8,
            g: (self.g / self.count) as u8,
            b: (self.b / self.count) as u8,
        }
    }
}
