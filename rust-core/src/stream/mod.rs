//! Sample streams and the filter drive loop
//!
//! A [`Source`] yields samples until it is exhausted, signalled by `None`
//! (and `None` forever after). A [`Sink`] accepts samples in order. Buffered
//! data and live sample-by-sample data look identical to a filter.

pub mod buffer;
pub mod live;

pub use buffer::{FnSource, SliceSink, SliceSource, VecSink, VecSource};
pub use live::{live_stream, LiveSink, LiveSource};

use crate::filters::Filter;
use crate::sample::Sample;

/// Read side of a stream
pub trait Source<S> {
    /// Next sample, or `None` once the stream is exhausted
    fn read_next(&mut self) -> Option<S>;
}

/// Write side of a stream
pub trait Sink<S> {
    /// Accept the next sample
    fn write_next(&mut self, sample: S);
}

impl<S, T: Source<S> + ?Sized> Source<S> for &mut T {
    fn read_next(&mut self) -> Option<S> {
        (**self).read_next()
    }
}

impl<S, T: Sink<S> + ?Sized> Sink<S> for &mut T {
    fn write_next(&mut self, sample: S) {
        (**self).write_next(sample)
    }
}

/// Drive a filter over a stream, then drain its transient response
///
/// Reads, filters and writes until the source is exhausted, then feeds
/// `filter.transient_len()` zero samples so the tail after the end of the
/// input is captured too.
///
/// # Returns
/// Total number of samples written to the sink
///
/// # Note
/// Never returns for a live source that is never closed.
pub fn process<S, F, I, O>(filter: &mut F, source: &mut I, sink: &mut O) -> usize
where
    S: Sample,
    F: Filter<S> + ?Sized,
    I: Source<S> + ?Sized,
    O: Sink<S> + ?Sized,
{
    let transients = filter.transient_len();
    process_with_transients(filter, source, sink, transients)
}

/// Drive a filter over a stream with a caller-chosen transient count
///
/// IIR filters ring forever, so their observed tail length is up to the
/// caller.
pub fn process_with_transients<S, F, I, O>(
    filter: &mut F,
    source: &mut I,
    sink: &mut O,
    transients: usize,
) -> usize
where
    S: Sample,
    F: Filter<S> + ?Sized,
    I: Source<S> + ?Sized,
    O: Sink<S> + ?Sized,
{
    let mut written = 0;
    while let Some(input) = source.read_next() {
        sink.write_next(filter.next(input));
        written += 1;
    }

    tracing::trace!(samples = written, transients, "input exhausted, draining transients");

    for _ in 0..transients {
        sink.write_next(filter.next(S::zero()));
    }

    let total = written + transients;
    tracing::debug!(input = written, total, "stream processed");
    total
}

/// Filter a whole buffer and return the output including `transients` tail samples
pub fn run_filter<S, F>(filter: &mut F, input: &[S], transients: usize) -> Vec<S>
where
    S: Sample,
    F: Filter<S> + ?Sized,
{
    let mut source = SliceSource::new(input);
    let mut sink = VecSink::with_capacity(input.len() + transients);
    process_with_transients(filter, &mut source, &mut sink, transients);
    sink.into_inner()
}
