use crate::color::{Rgb, hsv2rgb, rgb2hsv};

/// Saturation and value gain applied in HSV space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueGainTransform {
    saturation_gain: f64,
    value_gain: f64,
}

impl Default for HueGainTransform {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl HueGainTransform {
    pub const fn new(saturation_gain: f64, value_gain: f64) -> Self {
        Self {
            saturation_gain,
            value_gain,
        }
    }

    pub const fn saturation_gain(&self) -> f64 {
        self.saturation_gain
    }

    pub const fn value_gain(&self) -> f64 {
        self.value_gain
    }

    /// Unit gains: colors pass through untouched
    #[allow(clippy::float_cmp)]
    pub fn is_identity(&self) -> bool {
        self.saturation_gain == 1.0 && self.value_gain == 1.0
    }

    pub fn apply(&self, color: Rgb) -> Rgb {
        // The HSV round trip is not bit exact, so unit gains must not touch it
        if self.is_identity() {
            return color;
        }

        let mut hsv = rgb2hsv(color);
        hsv.sat = apply_gain(hsv.sat, self.saturation_gain);
        hsv.val = apply_gain(hsv.val, self.value_gain);
        hsv2rgb(hsv)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn apply_gain(value: u8, gain: f64) -> u8 {
    let scaled = f64::from(value) * gain;
    if scaled.is_nan() {
        return value;
    }
    scaled.clamp(0.0, 255.0) as u8
}
