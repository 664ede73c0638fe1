use crate::error::ConfigurationError;

use super::{Rgb, Rgbw};

const ORDER_NAME_RGB: &str = "rgb";
const ORDER_NAME_BGR: &str = "bgr";
const ORDER_NAME_RBG: &str = "rbg";
const ORDER_NAME_GRB: &str = "grb";
const ORDER_NAME_GBR: &str = "gbr";
const ORDER_NAME_BRG: &str = "brg";

/// Byte order in which a strip expects its color channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorOrder {
    #[default]
    Rgb,
    Bgr,
    Rbg,
    Grb,
    Gbr,
    Brg,
}

impl ColorOrder {
    pub fn parse_from_str(s: &str) -> Result<Self, ConfigurationError> {
        Ok(match s {
            ORDER_NAME_RGB => Self::Rgb,
            ORDER_NAME_BGR => Self::Bgr,
            ORDER_NAME_RBG => Self::Rbg,
            ORDER_NAME_GRB => Self::Grb,
            ORDER_NAME_GBR => Self::Gbr,
            ORDER_NAME_BRG => Self::Brg,
            _ => return Err(ConfigurationError::UnknownColorOrder(s.into())),
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => ORDER_NAME_RGB,
            Self::Bgr => ORDER_NAME_BGR,
            Self::Rbg => ORDER_NAME_RBG,
            Self::Grb => ORDER_NAME_GRB,
            Self::Gbr => ORDER_NAME_GBR,
            Self::Brg => ORDER_NAME_BRG,
        }
    }

    /// Reorder the channels so that the wire order matches the strip.
    ///
    /// The returned value still uses the `r`, `g`, `b` field names; they hold
    /// the first, second and third byte to be sent.
    pub const fn apply(self, color: Rgb) -> Rgb {
        let Rgb { r, g, b } = color;
        match self {
            Self::Rgb => Rgb { r, g, b },
            Self::Bgr => Rgb { r: b, g, b: r },
            Self::Rbg => Rgb { r, g: b, b: g },
            Self::Grb => Rgb { r: g, g: r, b },
            Self::Gbr => Rgb { r: g, g: b, b: r },
            Self::Brg => Rgb { r: b, g: r, b: g },
        }
    }

    /// Reorder the color channels of a four-channel value; white stays last
    pub const fn apply_rgbw(self, color: Rgbw) -> Rgbw {
        let Rgb { r, g, b } = self.apply(Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        });
        Rgbw { r, g, b, w: color.w }
    }

    /// Reorder every color of a frame in place
    pub fn apply_all(self, frame: &mut [Rgb]) {
        if self == Self::Rgb {
            return;
        }
        for color in frame {
            *color = self.apply(*color);
        }
    }

    /// Reorder every four-channel color of a frame in place
    pub fn apply_all_rgbw(self, frame: &mut [Rgbw]) {
        if self == Self::Rgb {
            return;
        }
        for color in frame {
            *color = self.apply_rgbw(*color);
        }
    }
}
