//! Multi-input multi-output composition
//!
//! `N` independent single-channel filters whose outputs are mixed by an
//! `N x N` transform and added to a scaled copy of the input vector:
//!
//! ```text
//! y[n] = input_gain * x[n] + T * [f_0(x_0[n]), ..., f_{N-1}(x_{N-1}[n])]
//! ```

pub mod freeverb;

pub use freeverb::{freeverb, FreeverbConfig};

use ndarray::{Array1, Array2};

use crate::error::{FilterError, Result};
use crate::filters::Filter;
use crate::sample::Sample;
use crate::stream::{Sink, Source};

/// Boxed single-channel filter
pub type ChannelFilter<S> = Box<dyn Filter<S> + Send>;

/// `N` parallel channels mixed through an output transform
pub struct MultiChannelFilter<S> {
    input_gain: S,
    transform: Array2<S>,
    channels: Vec<ChannelFilter<S>>,
    /// Per-channel filter outputs, reused every sample
    outputs: Array1<S>,
}

impl<S: Sample> MultiChannelFilter<S> {
    /// # Arguments
    /// * `input_gain` - Weight of the unfiltered input vector (dry signal)
    /// * `transform` - `N x N` mix of the channel outputs
    /// * `channels` - One filter per channel
    pub fn new(input_gain: S, transform: Array2<S>, channels: Vec<ChannelFilter<S>>) -> Result<Self> {
        let n = channels.len();
        let (rows, cols) = transform.dim();
        if rows != n || cols != n {
            tracing::warn!(rows, cols, channels = n, "output transform has the wrong shape");
            return Err(FilterError::TransformShapeMismatch { rows, cols, channels: n });
        }

        tracing::debug!(channels = n, "multi-channel filter created");

        Ok(Self {
            input_gain,
            transform,
            channels,
            outputs: Array1::zeros(n),
        })
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Longest transient of any channel
    pub fn transient_len(&self) -> usize {
        self.channels.iter().map(|c| c.transient_len()).max().unwrap_or(0)
    }

    /// Advance every channel by one sample
    pub fn next(&mut self, input: &Array1<S>) -> Result<Array1<S>> {
        if input.len() != self.channels.len() {
            return Err(FilterError::ChannelCountMismatch {
                expected: self.channels.len(),
                found: input.len(),
            });
        }

        for ((channel, out), &x) in self.channels.iter_mut().zip(self.outputs.iter_mut()).zip(input) {
            *out = channel.next(x);
        }

        let gain = self.input_gain;
        Ok(input.mapv(|x| gain * x) + self.transform.dot(&self.outputs))
    }

    /// Drive all channels from `sources` into `sinks`, then `transients` zero samples
    ///
    /// Every source must end on the same sample.
    ///
    /// # Returns
    /// Samples written to each sink
    pub fn process<I, O>(&mut self, sources: &mut [I], sinks: &mut [O], transients: usize) -> Result<usize>
    where
        I: Source<S>,
        O: Sink<S>,
    {
        let n = self.channels.len();
        for found in [sources.len(), sinks.len()] {
            if found != n {
                tracing::warn!(expected = n, found, "stream count does not match channel count");
                return Err(FilterError::ChannelCountMismatch { expected: n, found });
            }
        }

        let mut frame = Array1::zeros(n);
        let mut written = 0;
        loop {
            let mut ended = Vec::new();
            for (i, source) in sources.iter_mut().enumerate() {
                match source.read_next() {
                    Some(x) => frame[i] = x,
                    None => ended.push(i),
                }
            }
            if ended.len() == n {
                break;
            }
            if let Some(&channel) = ended.first() {
                tracing::warn!(channel, sample = written, "input streams ended at different times");
                return Err(FilterError::StreamLengthMismatch { channel });
            }

            let out = self.next(&frame)?;
            for (sink, &y) in sinks.iter_mut().zip(out.iter()) {
                sink.write_next(y);
            }
            written += 1;
        }

        tracing::trace!(samples = written, transients, "inputs exhausted, draining transients");

        let silence = Array1::zeros(n);
        for _ in 0..transients {
            let out = self.next(&silence)?;
            for (sink, &y) in sinks.iter_mut().zip(out.iter()) {
                sink.write_next(y);
            }
        }

        let total = written + transients;
        tracing::debug!(channels = n, input = written, total, "multi-channel stream processed");
        Ok(total)
    }

    pub fn reset(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.reset();
        }
        self.outputs.fill(S::zero());
    }
}
