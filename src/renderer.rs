use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use embassy_time::Instant;

use crate::arbitrator::{Component, InputPayload, SENTINEL_PRIORITY, SharedArbitrator};
use crate::channel::{Channel, Receiver, Sender, TrySendError};
use crate::color::{BLACK, ColorOrder, Rgb, Rgbw};
use crate::error::ConfigurationError;
use crate::image::ImageFrame;
use crate::mapper::{LedLayout, SpatialMapper};
use crate::pipeline::{CalibrationConfig, CalibrationPipeline};
use crate::smoothing::{ColorSmoothing, SmoothingConfig};

/// Number of color channels the strip expects per LED
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelLayout {
    #[default]
    Rgb,
    Rgbw,
}

/// Hardware-facing output settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    pub layout: ChannelLayout,
    pub color_order: ColorOrder,
}

/// Finished colors for one tick, ready for the device writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedFrame {
    Rgb(Vec<Rgb>),
    Rgbw(Vec<Rgbw>),
}

impl LedFrame {
    pub fn len(&self) -> usize {
        match self {
            Self::Rgb(colors) => colors.len(),
            Self::Rgbw(colors) => colors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn layout(&self) -> ChannelLayout {
        match self {
            Self::Rgb(_) => ChannelLayout::Rgb,
            Self::Rgbw(_) => ChannelLayout::Rgbw,
        }
    }

    pub fn as_rgb(&self) -> Option<&[Rgb]> {
        match self {
            Self::Rgb(colors) => Some(colors),
            Self::Rgbw(_) => None,
        }
    }

    pub fn as_rgbw(&self) -> Option<&[Rgbw]> {
        match self {
            Self::Rgb(_) => None,
            Self::Rgbw(colors) => Some(colors),
        }
    }
}

/// Startup configuration of the renderer.
///
/// The layout geometry and the calibration pipeline must both describe
/// exactly `led_count` LEDs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RendererConfig {
    pub led_count: usize,
    pub layout: LedLayout,
    pub calibration: CalibrationConfig,
    pub smoothing: SmoothingConfig,
    pub output: OutputConfig,
}

/// Reconfiguration request, applied at the start of the next tick.
///
/// Every variant carries a complete replacement value; the renderer never
/// observes a half-updated configuration. Layouts and pipelines sized for
/// another strip are logged and ignored.
#[derive(Debug)]
pub enum RenderIntent {
    /// New LED geometry, borders or mapping type
    Layout(LedLayout),
    /// Pipeline built by the configuring thread
    Calibration(Box<CalibrationPipeline>),
    Smoothing(SmoothingConfig),
    Output(OutputConfig),
}

/// Status notification from the render tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    /// Another priority became visible
    VisiblePriorityChanged { previous: i32, current: i32 },
}

pub type IntentChannel<const SIZE: usize> = Channel<RenderIntent, SIZE>;
pub type IntentSender<'a, const SIZE: usize> = Sender<'a, RenderIntent, SIZE>;
pub type IntentReceiver<'a, const SIZE: usize> = Receiver<'a, RenderIntent, SIZE>;

pub type EventChannel<const SIZE: usize> = Channel<RenderEvent, SIZE>;
pub type EventSender<'a, const SIZE: usize> = Sender<'a, RenderEvent, SIZE>;
pub type EventReceiver<'a, const SIZE: usize> = Receiver<'a, RenderEvent, SIZE>;

/// Render orchestrator
///
/// Once per tick: expire stale inputs, pick the visible one, map images onto
/// the LEDs, calibrate and produce the output frame.
pub struct Renderer<'a, const CHANNEL_SIZE: usize> {
    // External dependencies
    arbitrator: &'a SharedArbitrator,
    intents: IntentReceiver<'a, CHANNEL_SIZE>,
    events: Option<EventSender<'a, CHANNEL_SIZE>>,

    // Configuration
    led_count: usize,
    layout: LedLayout,
    pipeline: CalibrationPipeline,
    output: OutputConfig,

    // Internal state
    smoothing: ColorSmoothing,
    mapper: Option<SpatialMapper>,
    failed_image_size: Option<(u32, u32)>,
    visible_priority: i32,
    pending_event: Option<RenderEvent>,
    last_colors: Vec<Rgb>,
}

impl<'a, const CHANNEL_SIZE: usize> Renderer<'a, CHANNEL_SIZE> {
    pub fn new(
        arbitrator: &'a SharedArbitrator,
        intents: IntentReceiver<'a, CHANNEL_SIZE>,
        config: &RendererConfig,
    ) -> Result<Self, ConfigurationError> {
        check_led_count("layout", config.led_count, config.layout.geometry.len())?;
        let pipeline = CalibrationPipeline::from_config(config.led_count, &config.calibration)?;

        Ok(Self {
            arbitrator,
            intents,
            events: None,
            led_count: config.led_count,
            layout: config.layout.clone(),
            pipeline,
            output: config.output,
            smoothing: ColorSmoothing::new(config.smoothing),
            mapper: None,
            failed_image_size: None,
            visible_priority: SENTINEL_PRIORITY,
            pending_event: None,
            last_colors: alloc::vec![BLACK; config.led_count],
        })
    }

    /// Publish status events on `events`
    #[must_use]
    pub fn with_events(mut self, events: EventSender<'a, CHANNEL_SIZE>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn led_count(&self) -> usize {
        self.led_count
    }

    pub fn layout(&self) -> &LedLayout {
        &self.layout
    }

    pub fn pipeline(&self) -> &CalibrationPipeline {
        &self.pipeline
    }

    pub fn output(&self) -> OutputConfig {
        self.output
    }

    pub fn smoothing(&self) -> SmoothingConfig {
        self.smoothing.config()
    }

    /// Priority shown by the latest tick
    pub fn visible_priority(&self) -> i32 {
        self.visible_priority
    }

    /// Produce the frame for `now`.
    ///
    /// Never fails: when the visible input cannot be mapped, the previous
    /// colors are repeated.
    pub fn render(&mut self, now: Instant) -> LedFrame {
        self.process_intents();

        let (priority, component, payload, expired) = self.arbitrator.with(|arb| {
            let expired = arb.set_current_time(now);
            let input = arb.current_input();
            (
                input.priority,
                input.component,
                Arc::clone(&input.payload),
                expired,
            )
        });
        // expired payloads are released outside the critical section
        drop(expired);
        self.track_visible_priority(priority, component);

        if let Some(mut colors) = self.raw_colors(&payload) {
            self.pipeline.apply(&mut colors);
            self.last_colors = colors;
        }

        let shown = self.smoothing.update(&self.last_colors, now);
        self.build_frame(shown)
    }

    /// Apply every queued reconfiguration
    fn process_intents(&mut self) {
        let intents = self.intents;
        intents.drain(|intent| self.apply_intent(intent));
    }

    fn apply_intent(&mut self, intent: RenderIntent) {
        match intent {
            RenderIntent::Layout(layout) => {
                if let Err(err) = check_led_count("layout", self.led_count, layout.geometry.len())
                {
                    tracing::warn!(%err, "layout ignored");
                    return;
                }
                self.layout = layout;
                self.mapper = None;
                self.failed_image_size = None;
            }
            RenderIntent::Calibration(pipeline) => {
                if let Err(err) =
                    check_led_count("calibration pipeline", self.led_count, pipeline.led_count())
                {
                    tracing::warn!(%err, "calibration ignored");
                    return;
                }
                self.pipeline = *pipeline;
            }
            RenderIntent::Smoothing(config) => {
                self.smoothing.set_config(config);
            }
            RenderIntent::Output(output) => {
                self.output = output;
            }
        }
    }

    fn track_visible_priority(&mut self, priority: i32, component: Component) {
        if priority != self.visible_priority {
            tracing::debug!(
                previous = self.visible_priority,
                current = priority,
                component = component.as_str(),
                "visible priority changed"
            );
            self.pending_event = Some(RenderEvent::VisiblePriorityChanged {
                previous: self.visible_priority,
                current: priority,
            });
            self.visible_priority = priority;
        }

        let Some(events) = self.events else {
            self.pending_event = None;
            return;
        };
        if let Some(event) = self.pending_event.take() {
            // retried on the next tick while the consumer is behind
            if let Err(TrySendError(event)) = events.try_send(event) {
                self.pending_event = Some(event);
            }
        }
    }

    /// Uncalibrated colors of the visible input, one per LED
    fn raw_colors(&mut self, payload: &InputPayload) -> Option<Vec<Rgb>> {
        match payload {
            InputPayload::Colors(colors) => Some(fit_to_led_count(colors, self.led_count)),
            InputPayload::Image(image) => {
                let mapping = self.layout.mapping;
                let mapper = self.mapper_for(image)?;
                match mapper.led_colors(image, mapping) {
                    Ok(colors) => Some(fit_to_led_count(&colors, self.led_count)),
                    Err(err) => {
                        tracing::warn!(%err, "image could not be mapped");
                        None
                    }
                }
            }
        }
    }

    /// Mapper matching the size of `image`, rebuilt when the size changes
    fn mapper_for(&mut self, image: &ImageFrame) -> Option<&SpatialMapper> {
        let size = (image.width(), image.height());
        let stale = self
            .mapper
            .as_ref()
            .is_none_or(|mapper| (mapper.width(), mapper.height()) != size);

        if stale {
            self.mapper = None;
            match self.layout.mapper(size.0, size.1) {
                Ok(mapper) => {
                    tracing::debug!(width = size.0, height = size.1, "led mapping rebuilt");
                    self.mapper = Some(mapper);
                    self.failed_image_size = None;
                }
                Err(err) => {
                    if self.failed_image_size != Some(size) {
                        tracing::warn!(%err, width = size.0, height = size.1, "cannot map image onto leds");
                        self.failed_image_size = Some(size);
                    }
                }
            }
        }
        self.mapper.as_ref()
    }

    fn build_frame(&self, mut colors: Vec<Rgb>) -> LedFrame {
        let order = self.output.color_order;
        match self.output.layout {
            ChannelLayout::Rgb => {
                order.apply_all(&mut colors);
                LedFrame::Rgb(colors)
            }
            ChannelLayout::Rgbw => {
                let mut colors = self.pipeline.to_rgbw(&colors);
                order.apply_all_rgbw(&mut colors);
                LedFrame::Rgbw(colors)
            }
        }
    }
}

fn check_led_count(
    what: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ConfigurationError> {
    if expected != actual {
        return Err(ConfigurationError::LedCountMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Stretch or cut `colors` to exactly `led_count` entries.
///
/// A single color fills the whole strip; missing LEDs are black.
fn fit_to_led_count(colors: &[Rgb], led_count: usize) -> Vec<Rgb> {
    if let [single] = colors {
        return alloc::vec![*single; led_count];
    }
    let mut fitted: Vec<Rgb> = colors.iter().copied().take(led_count).collect();
    fitted.resize(led_count, BLACK);
    fitted
}
