//! RGB to RGBW derivation strategies

use alloc::string::ToString;

use crate::color::{Rgb, Rgbw};
use crate::error::ConfigurationError;

const ALGORITHM_NAME_SUBTRACT_MINIMUM: &str = "subtract_minimum";
const ALGORITHM_NAME_SUB_MIN_WARM_ADJUST: &str = "sub_min_warm_adjust";
const ALGORITHM_NAME_SUB_MIN_COOL_ADJUST: &str = "sub_min_cool_adjust";
const ALGORITHM_NAME_WHITE_OFF: &str = "white_off";

/// Channel weights of the warm white emitter
const WARM_FACTORS: [f32; 3] = [0.274, 0.454, 2.333];
/// Channel weights of the cool white emitter
const COOL_FACTORS: [f32; 3] = [0.299, 0.587, 0.114];

/// How the white channel is derived from an RGB color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WhiteAlgorithm {
    /// `w = min(r, g, b)`, removed from every channel
    SubtractMinimum,
    /// Weighted minimum for a warm white emitter
    SubMinWarmAdjust,
    /// Weighted minimum for a cool white emitter
    SubMinCoolAdjust,
    /// RGB passes through, white stays dark
    #[default]
    WhiteOff,
}

impl WhiteAlgorithm {
    pub fn parse_from_str(s: &str) -> Result<Self, ConfigurationError> {
        Ok(match s {
            ALGORITHM_NAME_SUBTRACT_MINIMUM => Self::SubtractMinimum,
            ALGORITHM_NAME_SUB_MIN_WARM_ADJUST => Self::SubMinWarmAdjust,
            ALGORITHM_NAME_SUB_MIN_COOL_ADJUST => Self::SubMinCoolAdjust,
            ALGORITHM_NAME_WHITE_OFF => Self::WhiteOff,
            _ => return Err(ConfigurationError::UnknownWhiteAlgorithm(s.to_string())),
        })
    }

    /// Parse `s`, falling back to [`WhiteAlgorithm::WhiteOff`] for unknown names
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse_from_str(s).unwrap_or_else(|err| {
            tracing::warn!(%err, fallback = ALGORITHM_NAME_WHITE_OFF, "unsupported white algorithm");
            Self::WhiteOff
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SubtractMinimum => ALGORITHM_NAME_SUBTRACT_MINIMUM,
            Self::SubMinWarmAdjust => ALGORITHM_NAME_SUB_MIN_WARM_ADJUST,
            Self::SubMinCoolAdjust => ALGORITHM_NAME_SUB_MIN_COOL_ADJUST,
            Self::WhiteOff => ALGORITHM_NAME_WHITE_OFF,
        }
    }

    pub fn convert(self, color: Rgb) -> Rgbw {
        match self {
            Self::SubtractMinimum => subtract_minimum(color),
            Self::SubMinWarmAdjust => subtract_weighted_minimum(color, WARM_FACTORS),
            Self::SubMinCoolAdjust => subtract_weighted_minimum(color, COOL_FACTORS),
            Self::WhiteOff => Rgbw::from_rgb(color),
        }
    }
}

fn subtract_minimum(color: Rgb) -> Rgbw {
    let w = color.r.min(color.g).min(color.b);
    Rgbw {
        r: color.r - w,
        g: color.g - w,
        b: color.b - w,
        w,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn subtract_weighted_minimum(color: Rgb, factors: [f32; 3]) -> Rgbw {
    let [f1, f2, f3] = factors;
    let r = f32::from(color.r);
    let g = f32::from(color.g);
    let b = f32::from(color.b);

    // white is quantized before it is taken out of the color channels
    let w = (r * f1).min(g * f2).min(b * f3).clamp(0.0, 255.0) as u8;
    let wf = f32::from(w);

    Rgbw {
        r: (r - wf / f1).clamp(0.0, 255.0) as u8,
        g: (g - wf / f2).clamp(0.0, 255.0) as u8,
        b: (b - wf / f3).clamp(0.0, 255.0) as u8,
        w,
    }
}
