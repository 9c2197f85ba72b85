//! Run any per-sample stage at four times the base rate
//!
//! Nonlinear stages (waveshapers, saturators) alias when run at the base
//! rate; oversampling pushes the aliases above the band the decimator keeps.

use crate::error::Result;
use crate::filters::Filter;
use crate::sample::Sample;
use crate::sampling::{PairedInterpolatorDecimator, RATE_FACTOR};

/// A stage wrapped between 4x interpolation and decimation
pub struct Oversampled<S, F> {
    resampler: PairedInterpolatorDecimator<S>,
    stage: F,
}

impl<S: Sample, F: Filter<S>> Oversampled<S, F> {
    /// # Arguments
    /// * `stage` - Filter run at the high rate
    /// * `window_size` - Overlap-add window of the resampler, in high-rate samples
    pub fn new(stage: F, window_size: usize) -> Result<Self> {
        Ok(Self {
            resampler: PairedInterpolatorDecimator::new(window_size)?,
            stage,
        })
    }

    pub fn stage(&self) -> &F {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut F {
        &mut self.stage
    }
}

impl<S: Sample, F: Filter<S>> Filter<S> for Oversampled<S, F> {
    fn next(&mut self, input: S) -> S {
        let mut block = self.resampler.interpolate(input);
        for x in block.iter_mut() {
            *x = self.stage.next(*x);
        }
        self.resampler.decimate(&block)
    }

    /// Round-trip resampling delay plus the stage's own tail, in base-rate samples
    fn transient_len(&self) -> usize {
        let high_rate = self.resampler.round_trip_delay() + self.stage.transient_len();
        high_rate.div_ceil(RATE_FACTOR)
    }

    fn reset(&mut self) {
        self.resampler.reset();
        self.stage.reset();
    }
}
