//! Per-sample filters: delay lines, combs, first-order sections and combinators

pub mod combinators;
pub mod comb;
pub mod delay_buffer;
pub mod design;
pub mod filter;
pub mod first_order;
pub mod tapped_delay_line;
pub mod time_varying;
pub mod windows;

pub use combinators::{FilterVariant, ParallelCombination, SeriesCombination};
pub use comb::{FeedforwardFeedbackComb, FilteredFeedbackComb, OnePoleLowpass};
pub use delay_buffer::DelayBuffer;
pub use design::{design_lowpass, windowed_sinc};
pub use filter::Filter;
pub use first_order::{FirstOrderCoefficients, FirstOrderFilter, FirstOrderKind};
pub use tapped_delay_line::TappedDelayLine;
pub use time_varying::{
    DelaySequence, Flanger, FnDelay, SinusoidalDelay, SinusoidalDelayConfig, TimeVaryingDelayLine,
};
pub use windows::WindowType;
