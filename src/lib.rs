#![no_std]

extern crate alloc;

pub mod arbitrator;
pub mod calibration;
pub mod channel;
pub mod color;
pub mod error;
pub mod frame_scheduler;
pub mod image;
pub mod mapper;
pub mod pipeline;
pub mod renderer;
pub mod smoothing;

pub use arbitrator::{
    Component, InputPayload, PriorityInput, SENTINEL_PRIORITY, SharedArbitrator, SourceArbitrator,
};
pub use calibration::{
    AdjustmentConfig, CalibrationProfile, ChannelAdjustmentLut, ChannelTransform,
    ChannelTransformConfig, ColorAdjustment, HueGainTransform, ProfileConfig, WhiteAlgorithm,
};
pub use color::{ColorOrder, Hsv, Rgb, Rgbw};
pub use error::{ConfigurationError, LookupError};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use image::ImageFrame;
pub use mapper::{LedGeometry, LedLayout, MappingType, SpatialMapper};
pub use pipeline::{CalibrationConfig, CalibrationPipeline, LedRange, VerificationResult};
pub use renderer::{
    ChannelLayout, EventChannel, EventReceiver, EventSender, IntentChannel, IntentReceiver,
    IntentSender, LedFrame, OutputConfig, RenderEvent, RenderIntent, Renderer, RendererConfig,
};
pub use smoothing::{ColorSmoothing, SmoothingConfig};

pub use embassy_time::{Duration, Instant};

/// Device writer at the end of the pipeline
///
/// Implement this trait to serialize frames onto a concrete strip. The
/// scheduler is generic over it.
pub trait OutputDriver {
    /// Called before the first frame and whenever the channel layout changes
    fn configure(&mut self, _led_count: usize, _layout: ChannelLayout) {}

    /// Take ownership of one finished frame
    fn write(&mut self, frame: LedFrame);
}
