//! Streamfilter - Streaming DSP Filter Core
//!
//! Sample-by-sample filtering over pull-driven streams: delay lines, comb
//! filters, first-order sections, overlap-add FFT convolution, 4x resampling
//! and multi-channel composition (Freeverb).

pub mod convolution;
pub mod error;
pub mod filters;
pub mod multichannel;
pub mod sample;
pub mod sampling;
pub mod stream;

pub use convolution::{DftConvolver, OverlapAddConvolver};
pub use error::{FilterError, Result};
pub use filters::{
    FeedforwardFeedbackComb, Filter, FilterVariant, FilteredFeedbackComb, Flanger, ParallelCombination,
    SeriesCombination, TappedDelayLine, TimeVaryingDelayLine, WindowType,
};
pub use multichannel::{freeverb, FreeverbConfig, MultiChannelFilter};
pub use sample::Sample;
pub use sampling::{Oversampled, PairedInterpolatorDecimator};
pub use stream::{process, process_with_transients, run_filter, Sink, Source};
