//! Single-channel threshold/gamma/level transform
//!
//! Every possible input byte is precomputed into a 256-entry table, so the
//! per-pixel cost is one lookup. Parameter changes rebuild the whole table in
//! a local buffer before it replaces the old one.

use crate::color::Rgb;

/// Parameters of a [`ChannelTransform`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelTransformConfig {
    /// Inputs below this normalized level are switched off
    pub threshold: f64,
    pub gamma: f64,
    /// Output level for a zero input
    pub blacklevel: f64,
    /// Output level for a full input
    pub whitelevel: f64,
}

impl Default for ChannelTransformConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            gamma: 1.0,
            blacklevel: 0.0,
            whitelevel: 1.0,
        }
    }
}

/// Lookup-table transform of one color channel
#[derive(Debug, Clone)]
pub struct ChannelTransform {
    config: ChannelTransformConfig,
    table: [u8; 256],
}

impl Default for ChannelTransform {
    fn default() -> Self {
        Self::from_config(ChannelTransformConfig::default())
    }
}

impl ChannelTransform {
    pub fn new(threshold: f64, gamma: f64, blacklevel: f64, whitelevel: f64) -> Self {
        Self::from_config(ChannelTransformConfig {
            threshold,
            gamma,
            blacklevel,
            whitelevel,
        })
    }

    pub fn from_config(config: ChannelTransformConfig) -> Self {
        Self {
            config,
            table: build_table(&config),
        }
    }

    pub fn config(&self) -> ChannelTransformConfig {
        self.config
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.reconfigure(ChannelTransformConfig {
            threshold,
            ..self.config
        });
    }

    pub fn set_gamma(&mut self, gamma: f64) {
        self.reconfigure(ChannelTransformConfig {
            gamma,
            ..self.config
        });
    }

    pub fn set_blacklevel(&mut self, blacklevel: f64) {
        self.reconfigure(ChannelTransformConfig {
            blacklevel,
            ..self.config
        });
    }

    pub fn set_whitelevel(&mut self, whitelevel: f64) {
        self.reconfigure(ChannelTransformConfig {
            whitelevel,
            ..self.config
        });
    }

    /// Transform a single channel value
    #[inline]
    pub fn transform(&self, value: u8) -> u8 {
        self.table[usize::from(value)]
    }

    pub fn table(&self) -> &[u8; 256] {
        &self.table
    }

    fn reconfigure(&mut self, config: ChannelTransformConfig) {
        let table = build_table(&config);
        self.config = config;
        self.table = table;
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn build_table(config: &ChannelTransformConfig) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let mut v = i as f64 / 255.0;
        if v < config.threshold {
            v = 0.0;
        }
        if config.gamma != 1.0 {
            v = libm::pow(v, config.gamma);
        }
        v = config.blacklevel + (config.whitelevel - config.blacklevel) * v;
        // NaN parameters collapse to black instead of poisoning the cast
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        *entry = libm::round(v * 255.0) as u8;
    }
    table
}

/// One [`ChannelTransform`] per color channel
#[derive(Debug, Clone, Default)]
pub struct RgbChannelTransform {
    pub red: ChannelTransform,
    pub green: ChannelTransform,
    pub blue: ChannelTransform,
}

impl RgbChannelTransform {
    pub fn new(red: ChannelTransform, green: ChannelTransform, blue: ChannelTransform) -> Self {
        Self { red, green, blue }
    }

    #[inline]
    pub fn apply(&self, color: Rgb) -> Rgb {
        Rgb {
            r: self.red.transform(color.r),
            g: self.green.transform(color.g),
            b: self.blue.transform(color.b),
        }
    }
}
