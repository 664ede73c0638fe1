//! Reference-color adjustment
//!
//! A [`ChannelAdjustmentLut`] scales each output channel by a fixed gain. A
//! [`ColorAdjustment`] combines three of them, one per primary reference
//! color, into a tint/white-balance correction.

use crate::color::Rgb;

/// Scale tables for the red, green and blue output channels.
///
/// `table[c][i] = min(255, floor(i * adjust[c] / 255))`
#[derive(Debug, Clone)]
pub struct ChannelAdjustmentLut {
    adjust: [u8; 3],
    tables: [[u8; 256]; 3],
}

impl ChannelAdjustmentLut {
    pub fn new(adjust_r: u8, adjust_g: u8, adjust_b: u8) -> Self {
        let adjust = [adjust_r, adjust_g, adjust_b];
        Self {
            adjust,
            tables: [
                build_table(adjust_r),
                build_table(adjust_g),
                build_table(adjust_b),
            ],
        }
    }

    /// Gains as an `Rgb` triple
    pub const fn adjustment(&self) -> Rgb {
        Rgb {
            r: self.adjust[0],
            g: self.adjust[1],
            b: self.adjust[2],
        }
    }

    #[inline]
    pub fn adjust_r(&self, value: u8) -> u8 {
        self.tables[0][usize::from(value)]
    }

    #[inline]
    pub fn adjust_g(&self, value: u8) -> u8 {
        self.tables[1][usize::from(value)]
    }

    #[inline]
    pub fn adjust_b(&self, value: u8) -> u8 {
        self.tables[2][usize::from(value)]
    }

    /// Apply the three tables to the matching channels of `color`
    #[inline]
    pub fn apply(&self, color: Rgb) -> Rgb {
        Rgb {
            r: self.adjust_r(color.r),
            g: self.adjust_g(color.g),
            b: self.adjust_b(color.b),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn build_table(adjust: u8) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let scaled = (i as u32 * u32::from(adjust)) / 255;
        *entry = scaled.min(255) as u8;
    }
    table
}

/// Reference colors for the red, green and blue primaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentConfig {
    pub red: Rgb,
    pub green: Rgb,
    pub blue: Rgb,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            red: Rgb { r: 255, g: 0, b: 0 },
            green: Rgb { r: 0, g: 255, b: 0 },
            blue: Rgb { r: 0, g: 0, b: 255 },
        }
    }
}

/// Correction that tells each LED what "pure red", "pure green" and
/// "pure blue" must look like on this strip.
///
/// Every input primary is spread over the output channels through its
/// reference table. Output channel `c` collects the reference of primary `c`
/// applied to input `c`, plus the references of the other primaries applied to
/// how much their input exceeds input `c`. The result is capped by the gain of
/// primary `c` on channel `c`. Pure-primary references give the identity.
#[derive(Debug, Clone)]
pub struct ColorAdjustment {
    red: ChannelAdjustmentLut,
    green: ChannelAdjustmentLut,
    blue: ChannelAdjustmentLut,
}

impl Default for ColorAdjustment {
    fn default() -> Self {
        Self::from_config(&AdjustmentConfig::default())
    }
}

impl ColorAdjustment {
    pub fn new(
        red: ChannelAdjustmentLut,
        green: ChannelAdjustmentLut,
        blue: ChannelAdjustmentLut,
    ) -> Self {
        Self { red, green, blue }
    }

    pub fn from_config(config: &AdjustmentConfig) -> Self {
        let lut = |c: Rgb| ChannelAdjustmentLut::new(c.r, c.g, c.b);
        Self::new(lut(config.red), lut(config.green), lut(config.blue))
    }

    pub fn config(&self) -> AdjustmentConfig {
        AdjustmentConfig {
            red: self.red.adjustment(),
            green: self.green.adjustment(),
            blue: self.blue.adjustment(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(&self, color: Rgb) -> Rgb {
        let Rgb { r, g, b } = color;
        let excess = |a: u8, b: u8| a.saturating_sub(b);

        let rr = u16::from(self.red.adjust_r(r));
        let rg = u16::from(self.red.adjust_g(excess(r, g)));
        let rb = u16::from(self.red.adjust_b(excess(r, b)));

        let gr = u16::from(self.green.adjust_r(excess(g, r)));
        let gg = u16::from(self.green.adjust_g(g));
        let gb = u16::from(self.green.adjust_b(excess(g, b)));

        let br = u16::from(self.blue.adjust_r(excess(b, r)));
        let bg = u16::from(self.blue.adjust_g(excess(b, g)));
        let bb = u16::from(self.blue.adjust_b(b));

        let max_r = u16::from(self.red.adjustment().r);
        let max_g = u16::from(self.green.adjustment().g);
        let max_b = u16::from(self.blue.adjustment().b);

        Rgb {
            r: (rr + gr + br).min(max_r) as u8,
            g: (rg + gg + bg).min(max_g) as u8,
            b: (rb + gb + bb).min(max_b) as u8,
        }
    }
}
