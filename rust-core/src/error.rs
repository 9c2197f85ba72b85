//! Error types for filter construction and stream processing
//!
//! Configuration violations are reported when a filter is built; stream-level
//! precondition violations are reported by the fallible drive functions.

use thiserror::Error;

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    // Configuration violations
    #[error("Unstable feedback coefficient `{name}`: magnitude {magnitude} must be < 1")]
    UnstableFeedback { name: &'static str, magnitude: f64 },

    #[error("Coefficient count mismatch: expected {expected}, found {found}")]
    CoefficientCountMismatch { expected: usize, found: usize },

    #[error("Delay must be at least one sample (found {delay})")]
    InvalidDelay { delay: usize },

    #[error("Weight count mismatch: {weights} weights for {filters} filters")]
    WeightCountMismatch { weights: usize, filters: usize },

    #[error("Output transform is {rows}x{cols}, expected {channels}x{channels}")]
    TransformShapeMismatch { rows: usize, cols: usize, channels: usize },

    #[error("Unsupported rate factor {0} (only 4x is supported)")]
    UnsupportedRateFactor(usize),

    #[error("Window size must be non-zero")]
    ZeroWindowSize,

    #[error("Convolution kernel is empty")]
    EmptyKernel,

    #[error("FFT failed: {0}")]
    Fft(String),

    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    // Precondition violations
    #[error("Requested delay {requested} outside [0, {capacity}]")]
    DelayOutOfRange { requested: f64, capacity: usize },

    #[error("Expected {expected} channels, found {found}")]
    ChannelCountMismatch { expected: usize, found: usize },

    #[error("Input stream {channel} ended at a different time than the others")]
    StreamLengthMismatch { channel: usize },
}

/// Check a feedback coefficient magnitude for stability
pub(crate) fn check_stable(name: &'static str, magnitude: f64) -> Result<()> {
    if magnitude < 1.0 {
        Ok(())
    } else {
        tracing::warn!(name, magnitude, "rejecting unstable feedback coefficient");
        Err(FilterError::UnstableFeedback { name, magnitude })
    }
}
