//! Linear output smoothing
//!
//! Eases the shown colors toward the latest calibrated frame over a settling
//! time and can hold frames back for a fixed number of ticks before they
//! reach the strip.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use crate::color::{BLACK, Rgb};

/// Parameters of [`ColorSmoothing`]; the default passes frames through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmoothingConfig {
    /// Time to reach a new target; zero switches instantly
    pub settling_time: Duration,
    /// Ticks a frame waits before it is shown
    pub output_delay: usize,
}

impl SmoothingConfig {
    pub const fn new(settling_time: Duration, output_delay: usize) -> Self {
        Self {
            settling_time,
            output_delay,
        }
    }
}

/// Smoothing state for one strip
#[derive(Debug, Clone)]
pub struct ColorSmoothing {
    config: SmoothingConfig,
    /// Colors shown by the latest step
    current: Vec<Rgb>,
    target: Vec<Rgb>,
    /// When `current` reaches `target`
    target_time: Instant,
    /// Time of the latest step
    previous_time: Instant,
    delayed: VecDeque<Vec<Rgb>>,
}

impl ColorSmoothing {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            config,
            current: Vec::new(),
            target: Vec::new(),
            target_time: Instant::from_ticks(0),
            previous_time: Instant::from_ticks(0),
            delayed: VecDeque::new(),
        }
    }

    pub const fn config(&self) -> SmoothingConfig {
        self.config
    }

    /// Swap parameters, keeping the colors in flight
    pub fn set_config(&mut self, config: SmoothingConfig) {
        tracing::debug!(
            settling_ms = config.settling_time.as_millis(),
            output_delay = config.output_delay,
            "smoothing reconfigured"
        );
        self.config = config;
    }

    /// Feed the latest target and return the colors to show at `now`
    pub fn update(&mut self, target: &[Rgb], now: Instant) -> Vec<Rgb> {
        self.set_target(target, now);
        self.step(now);
        self.delay(self.current.clone())
    }

    fn set_target(&mut self, target: &[Rgb], now: Instant) {
        if self.current.len() != target.len() {
            // first frame or another strip length: nothing to ease from
            self.current = target.to_vec();
            self.target = target.to_vec();
            self.target_time = now;
            self.previous_time = now;
            self.delayed.clear();
            return;
        }
        if self.target != target {
            self.target.clear();
            self.target.extend_from_slice(target);
            self.target_time = now + self.config.settling_time;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn step(&mut self, now: Instant) {
        if now >= self.target_time {
            self.current.clone_from(&self.target);
        } else {
            let remaining = (self.target_time - now).as_ticks() as f32;
            let span = self
                .target_time
                .saturating_duration_since(self.previous_time)
                .as_ticks() as f32;
            let progress = if span > 0.0 {
                (1.0 - remaining / span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            for (current, target) in self.current.iter_mut().zip(&self.target) {
                *current = blend(*current, *target, progress);
            }
        }
        self.previous_time = now;
    }

    fn delay(&mut self, frame: Vec<Rgb>) -> Vec<Rgb> {
        let delay = self.config.output_delay;
        if delay == 0 {
            self.delayed.clear();
            return frame;
        }

        while self.delayed.len() > delay {
            self.delayed.pop_front();
        }
        if self.delayed.len() < delay {
            // the strip stays dark until the first delayed frame comes out
            let filler = self
                .delayed
                .front()
                .cloned()
                .unwrap_or_else(|| alloc::vec![BLACK; frame.len()]);
            while self.delayed.len() < delay {
                self.delayed.push_front(filler.clone());
            }
        }

        self.delayed.push_back(frame);
        self.delayed.pop_front().unwrap_or_default()
    }
}

/// Move `from` toward `to` by `progress`, truncating like integer channels do
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend(from: Rgb, to: Rgb, progress: f32) -> Rgb {
    let channel = |a: u8, b: u8| {
        let a = f32::from(a);
        (a + progress * (f32::from(b) - a)) as u8
    };
    Rgb {
        r: channel(from.r, to.r),
        g: channel(from.g, to.g),
        b: channel(from.b, to.b),
    }
}
