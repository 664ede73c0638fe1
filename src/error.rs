use alloc::string::String;

/// Rejected configuration or call argument.
///
/// Returned at call time; the caller decides on a fallback. Nothing in the
/// crate turns one of these into a panic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("priority {priority} is reserved, inputs must use a value below {limit}")]
    ReservedPriority { priority: i32, limit: i32 },
    #[error("led {index} has an invalid viewport")]
    InvalidGeometry { index: u32 },
    #[error("led index {index} is duplicated or outside 0..{led_count}")]
    InvalidLedIndex { index: u32, led_count: usize },
    #[error(
        "borders {horizontal}px/{vertical}px leave no active area in a {width}x{height} image"
    )]
    EmptyActiveArea {
        width: u32,
        height: u32,
        horizontal: u32,
        vertical: u32,
    },
    #[error("image is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    ImageSizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("image buffer holds {actual} pixels, {width}x{height} needs {expected}")]
    PixelCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("unknown white algorithm `{0}`")]
    UnknownWhiteAlgorithm(String),
    #[error("unknown color order `{0}`")]
    UnknownColorOrder(String),
    #[error("unknown led mapping type `{0}`")]
    UnknownMappingType(String),
    #[error("unknown calibration profile `{0}`")]
    UnknownProfile(String),
    #[error("calibration profile `{0}` is defined twice")]
    DuplicateProfile(String),
    #[error("{what} covers {actual} leds, the strip has {expected}")]
    LedCountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid led range {start}..={end}")]
    InvalidRange { start: u32, end: u32 },
}

/// Queried priority is not registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("priority {0} is not active")]
pub struct LookupError(pub i32);
