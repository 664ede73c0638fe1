use alloc::string::String;

use super::{
    AdjustmentConfig, ChannelTransform, ChannelTransformConfig, ColorAdjustment,
    HueGainTransform, RgbChannelTransform, WhiteAlgorithm,
};
use crate::color::Rgb;

/// Configuration shape of one calibration profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    pub id: String,
    pub red: ChannelTransformConfig,
    pub green: ChannelTransformConfig,
    pub blue: ChannelTransformConfig,
    pub adjustment: AdjustmentConfig,
    pub saturation_gain: f64,
    pub value_gain: f64,
    pub white_algorithm: WhiteAlgorithm,
}

impl ProfileConfig {
    /// Neutral profile: every stage is the identity
    pub fn neutral(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            red: ChannelTransformConfig::default(),
            green: ChannelTransformConfig::default(),
            blue: ChannelTransformConfig::default(),
            adjustment: AdjustmentConfig::default(),
            saturation_gain: 1.0,
            value_gain: 1.0,
            white_algorithm: WhiteAlgorithm::WhiteOff,
        }
    }
}

/// Immutable calibration applied to a range of LEDs.
///
/// Built once from a [`ProfileConfig`]; a changed configuration produces a new
/// profile rather than editing this one.
#[derive(Debug, Clone)]
pub struct CalibrationProfile {
    id: String,
    per_channel: RgbChannelTransform,
    adjustment: ColorAdjustment,
    hue_gain: HueGainTransform,
    white_algorithm: WhiteAlgorithm,
}

impl CalibrationProfile {
    pub fn from_config(config: &ProfileConfig) -> Self {
        Self {
            id: config.id.clone(),
            per_channel: RgbChannelTransform::new(
                ChannelTransform::from_config(config.red),
                ChannelTransform::from_config(config.green),
                ChannelTransform::from_config(config.blue),
            ),
            adjustment: ColorAdjustment::from_config(&config.adjustment),
            hue_gain: HueGainTransform::new(config.saturation_gain, config.value_gain),
            white_algorithm: config.white_algorithm,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn per_channel(&self) -> &RgbChannelTransform {
        &self.per_channel
    }

    pub fn adjustment(&self) -> &ColorAdjustment {
        &self.adjustment
    }

    pub fn hue_gain(&self) -> &HueGainTransform {
        &self.hue_gain
    }

    pub fn white_algorithm(&self) -> WhiteAlgorithm {
        self.white_algorithm
    }

    /// Run a raw color through channel transforms, adjustment and hue gain
    #[inline]
    pub fn apply(&self, color: Rgb) -> Rgb {
        let color = self.per_channel.apply(color);
        let color = self.adjustment.apply(color);
        self.hue_gain.apply(color)
    }
}
