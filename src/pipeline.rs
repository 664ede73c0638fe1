//! Calibration pipeline
//!
//! Assigns calibration profiles to LED ranges and applies them across a
//! whole frame.

use alloc::string::String;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::calibration::{CalibrationProfile, ProfileConfig, WhiteAlgorithm};
use crate::color::{Rgb, Rgbw};
use crate::error::ConfigurationError;

/// Inclusive LED range bound to a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedRange {
    pub start_led: u32,
    pub end_led: u32,
    pub profile_id: String,
}

impl LedRange {
    pub fn new(start_led: u32, end_led: u32, profile_id: impl Into<String>) -> Self {
        Self {
            start_led,
            end_led,
            profile_id: profile_id.into(),
        }
    }
}

/// Configuration shape of a pipeline: profiles and their assignments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationConfig {
    pub profiles: Vec<ProfileConfig>,
    /// Applied in order, later ranges win on overlap
    pub assignments: Vec<LedRange>,
}

/// Outcome of [`CalibrationPipeline::verify`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationResult {
    /// LED indices without a profile, ascending
    pub missing_leds: Vec<u32>,
}

impl VerificationResult {
    pub fn is_complete(&self) -> bool {
        self.missing_leds.is_empty()
    }
}

/// Per-LED calibration of a full frame
#[derive(Debug)]
pub struct CalibrationPipeline {
    profiles: Vec<CalibrationProfile>,
    /// Index into `profiles` for every LED
    led_profiles: Vec<Option<usize>>,
    incomplete_reported: AtomicBool,
}

impl CalibrationPipeline {
    /// Create a pipeline with no assignments
    pub fn new(
        led_count: usize,
        profiles: Vec<CalibrationProfile>,
    ) -> Result<Self, ConfigurationError> {
        for (i, profile) in profiles.iter().enumerate() {
            if profiles[..i].iter().any(|p| p.id() == profile.id()) {
                return Err(ConfigurationError::DuplicateProfile(profile.id().into()));
            }
        }

        Ok(Self {
            profiles,
            led_profiles: alloc::vec![None; led_count],
            incomplete_reported: AtomicBool::new(false),
        })
    }

    /// Build profiles and apply every assignment of `config`
    pub fn from_config(
        led_count: usize,
        config: &CalibrationConfig,
    ) -> Result<Self, ConfigurationError> {
        let profiles = config
            .profiles
            .iter()
            .map(CalibrationProfile::from_config)
            .collect();
        let mut pipeline = Self::new(led_count, profiles)?;
        for range in &config.assignments {
            pipeline.assign(range.start_led, range.end_led, &range.profile_id)?;
        }
        Ok(pipeline)
    }

    /// Pipeline where every LED uses one neutral profile
    pub fn passthrough(led_count: usize) -> Self {
        let profile = CalibrationProfile::from_config(&ProfileConfig::neutral("default"));
        Self {
            profiles: alloc::vec![profile],
            led_profiles: alloc::vec![Some(0); led_count],
            incomplete_reported: AtomicBool::new(false),
        }
    }

    pub fn led_count(&self) -> usize {
        self.led_profiles.len()
    }

    pub fn profile_ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(CalibrationProfile::id)
    }

    pub fn profile(&self, id: &str) -> Option<&CalibrationProfile> {
        self.profiles.iter().find(|p| p.id() == id)
    }

    /// Profile assigned to `led`, if any
    pub fn profile_for(&self, led: usize) -> Option<&CalibrationProfile> {
        let index = (*self.led_profiles.get(led)?)?;
        self.profiles.get(index)
    }

    /// Bind LEDs `start_led..=end_led` to the profile `profile_id`.
    ///
    /// Overrides earlier assignments on overlap. Bounds past the last LED are
    /// clamped with a warning.
    pub fn assign(
        &mut self,
        start_led: u32,
        end_led: u32,
        profile_id: &str,
    ) -> Result<(), ConfigurationError> {
        if start_led > end_led {
            return Err(ConfigurationError::InvalidRange {
                start: start_led,
                end: end_led,
            });
        }
        let profile = self
            .profiles
            .iter()
            .position(|p| p.id() == profile_id)
            .ok_or_else(|| ConfigurationError::UnknownProfile(profile_id.into()))?;

        let Some(last) = self.led_profiles.len().checked_sub(1) else {
            tracing::warn!(start_led, end_led, profile_id, "no leds to assign a profile to");
            return Ok(());
        };
        let start = (start_led as usize).min(last);
        let end = (end_led as usize).min(last);
        if start != start_led as usize || end != end_led as usize {
            tracing::warn!(
                start_led,
                end_led,
                clamped_start = start,
                clamped_end = end,
                profile_id,
                "led range exceeds strip, clamped"
            );
        }

        for slot in &mut self.led_profiles[start..=end] {
            *slot = Some(profile);
        }
        Ok(())
    }

    pub fn verify(&self) -> VerificationResult {
        let missing_leds = self
            .led_profiles
            .iter()
            .enumerate()
            .filter(|(_, profile)| profile.is_none())
            .filter_map(|(led, _)| u32::try_from(led).ok())
            .collect();
        VerificationResult { missing_leds }
    }

    /// Calibrate `frame` in place.
    ///
    /// LEDs without a profile, and colors past the configured LED count, are
    /// left as they are.
    pub fn apply(&self, frame: &mut [Rgb]) {
        let mut unassigned = 0usize;
        for (color, profile) in frame.iter_mut().zip(&self.led_profiles) {
            match profile.and_then(|index| self.profiles.get(index)) {
                Some(profile) => *color = profile.apply(*color),
                None => unassigned += 1,
            }
        }

        if unassigned > 0 && !self.incomplete_reported.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                unassigned,
                "leds without calibration profile are passed through unmodified"
            );
        }
    }

    /// Derive four-channel colors using each LED's white algorithm
    pub fn to_rgbw(&self, frame: &[Rgb]) -> Vec<Rgbw> {
        frame
            .iter()
            .enumerate()
            .map(|(led, color)| {
                self.profile_for(led)
                    .map_or(WhiteAlgorithm::WhiteOff, CalibrationProfile::white_algorithm)
                    .convert(*color)
            })
            .collect()
    }
}
