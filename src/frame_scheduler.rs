//! Frame scheduling and timing utilities.
//!
//! Drives the renderer at a fixed rate and hands every frame to the output
//! driver. The caller is responsible for sleeping between frames.

use embassy_time::{Duration, Instant};

use crate::renderer::{ChannelLayout, Renderer};
use crate::OutputDriver;

/// Default target frame rate
pub const DEFAULT_FPS: u32 = 25;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Priority shown in this frame
    pub visible_priority: i32,
}

/// Portable frame scheduler that manages timing without async.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(renderer, driver);
///
/// loop {
///     let now = Instant::from_millis(clock_ms());
///     let result = scheduler.tick(now);
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct FrameScheduler<'a, O: OutputDriver, const CHANNEL_SIZE: usize> {
    output: O,
    renderer: Renderer<'a, CHANNEL_SIZE>,
    next_frame: Instant,
    frame_duration: Duration,
    configured_layout: Option<ChannelLayout>,
}

impl<'a, O: OutputDriver, const CHANNEL_SIZE: usize> FrameScheduler<'a, O, CHANNEL_SIZE> {
    /// Create a scheduler running at [`DEFAULT_FPS`]
    pub fn new(renderer: Renderer<'a, CHANNEL_SIZE>, driver: O) -> Self {
        Self::with_frame_duration(renderer, driver, DEFAULT_FRAME_DURATION)
    }

    pub fn with_frame_duration(
        renderer: Renderer<'a, CHANNEL_SIZE>,
        driver: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            output: driver,
            renderer,
            next_frame: Instant::from_millis(0),
            frame_duration,
            configured_layout: None,
        }
    }

    /// Render one frame, write it out and return when the next one is due.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Skip the backlog after a long stall instead of bursting to catch up
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let frame = self.renderer.render(now);
        let layout = frame.layout();
        if self.configured_layout != Some(layout) {
            self.output.configure(self.renderer.led_count(), layout);
            self.configured_layout = Some(layout);
        }
        self.output.write(frame);

        self.next_frame += self.frame_duration;
        let sleep_duration = if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_ticks(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            visible_priority: self.renderer.visible_priority(),
        }
    }

    pub fn renderer(&self) -> &Renderer<'a, CHANNEL_SIZE> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<'a, CHANNEL_SIZE> {
        &mut self.renderer
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
