//! Calibration primitives
//!
//! Stateless, precomputed color transforms. Each value is built from its
//! configuration in one step and never edited while in use.

mod adjustment;
mod hue_gain;
mod profile;
mod rgbw;
mod transform;

pub use adjustment::{AdjustmentConfig, ChannelAdjustmentLut, ColorAdjustment};
pub use hue_gain::HueGainTransform;
pub use profile::{CalibrationProfile, ProfileConfig};
pub use rgbw::WhiteAlgorithm;
pub use transform::{ChannelTransform, ChannelTransformConfig, RgbChannelTransform};
