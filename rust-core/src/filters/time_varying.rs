//! Time-varying fractional delay and the flanger built on it
//!
//! `y[n] = c_in x[n] + c_delay x[n - d[n]]` where `d[n]` is real-valued and the
//! delayed sample is linearly interpolated between the two bracketing buffer
//! entries.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};
use crate::filters::{DelayBuffer, Filter};
use crate::sample::Sample;

/// Delay line read at a (possibly fractional) delay chosen per sample
#[derive(Debug, Clone)]
pub struct TimeVaryingDelayLine<S> {
    input_coeff: S,
    delay_coeff: S,
    history: DelayBuffer<S>,
}

impl<S: Sample> TimeVaryingDelayLine<S> {
    /// # Arguments
    /// * `capacity` - Longest supported delay in samples, at least 1
    /// * `input_coeff` - Weight of the undelayed input
    /// * `delay_coeff` - Weight of the delayed, interpolated input
    pub fn new(capacity: usize, input_coeff: S, delay_coeff: S) -> Result<Self> {
        Ok(Self {
            input_coeff,
            delay_coeff,
            history: DelayBuffer::new(capacity, S::zero())?,
        })
    }

    pub fn capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Advance one sample using delay `delay`
    ///
    /// Valid delays are `[0, capacity]`. A delay of 0 reads the current input;
    /// an integer delay reads that buffer entry exactly.
    pub fn try_next(&mut self, input: S, delay: f64) -> Result<S> {
        let capacity = self.capacity();
        // NaN fails the range check too
        if !(0.0..=capacity as f64).contains(&delay) {
            return Err(FilterError::DelayOutOfRange { requested: delay, capacity });
        }

        let lower = delay.floor() as usize;
        let frac = delay - lower as f64;

        let newer = if lower == 0 { input } else { self.history.tap(lower) };
        let delayed = if frac == 0.0 {
            newer
        } else {
            // lower < capacity here, so lower + 1 is still retained
            let older = self.history.tap(lower + 1);
            newer + S::from_f64(frac) * (older - newer)
        };

        let output = self.input_coeff * input + self.delay_coeff * delayed;
        self.history.push(input);
        Ok(output)
    }

    /// Infallible form of [`TimeVaryingDelayLine::try_next`]
    ///
    /// # Panics
    /// Panics if `delay` is outside `[0, capacity]` (or NaN).
    pub fn next(&mut self, input: S, delay: f64) -> S {
        match self.try_next(input, delay) {
            Ok(output) => output,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn reset(&mut self) {
        self.history.reset();
    }
}

/// Source of per-sample delay values
pub trait DelaySequence {
    /// Delay to use for the next sample
    fn next_delay(&mut self) -> f64;

    /// Upper bound of every value `next_delay` can return, rounded up
    fn max_delay(&self) -> usize;

    /// Restart the sequence
    fn reset(&mut self) {}
}

/// Delay sequence driven by a closure
pub struct FnDelay<F> {
    f: F,
    max_delay: usize,
}

impl<F: FnMut() -> f64> FnDelay<F> {
    /// # Arguments
    /// * `max_delay` - Bound the closure promises not to exceed
    /// * `f` - Called once per sample
    pub fn new(max_delay: usize, f: F) -> Self {
        Self { f, max_delay }
    }
}

impl<F: FnMut() -> f64> DelaySequence for FnDelay<F> {
    fn next_delay(&mut self) -> f64 {
        (self.f)()
    }

    fn max_delay(&self) -> usize {
        self.max_delay
    }
}

/// Parameters of a sinusoidal delay sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinusoidalDelayConfig {
    /// Centre delay in samples
    pub average_delay: f64,
    /// Relative sweep depth in `[-1, 1]`
    pub sweep: f64,
    /// Sweep rate in Hz
    pub speed: f64,
    /// Sample rate in Hz
    pub sample_rate: f64,
}

impl Default for SinusoidalDelayConfig {
    fn default() -> Self {
        Self {
            average_delay: 96.0,
            sweep: 0.9,
            speed: 0.25,
            sample_rate: 48000.0,
        }
    }
}

/// `m[n] = avg (1 + sweep sin(2 pi speed n / fs))`
#[derive(Debug, Clone)]
pub struct SinusoidalDelay {
    config: SinusoidalDelayConfig,
    index: u64,
}

impl SinusoidalDelay {
    pub fn new(config: SinusoidalDelayConfig) -> Result<Self> {
        let invalid = |name: &'static str, reason: String| -> Result<Self> {
            tracing::warn!(name, %reason, "rejecting sinusoidal delay parameter");
            Err(FilterError::InvalidParameter { name, reason })
        };
        if !(config.average_delay > 0.0) {
            return invalid("average_delay", format!("must be positive, got {}", config.average_delay));
        }
        if !(config.speed > 0.0) {
            return invalid("speed", format!("must be positive, got {}", config.speed));
        }
        if !(config.sample_rate > 0.0) {
            return invalid("sample_rate", format!("must be positive, got {}", config.sample_rate));
        }
        if !(config.sweep.abs() <= 1.0) {
            return invalid("sweep", format!("must be in [-1, 1], got {}", config.sweep));
        }
        Ok(Self { config, index: 0 })
    }

    pub fn config(&self) -> &SinusoidalDelayConfig {
        &self.config
    }
}

impl DelaySequence for SinusoidalDelay {
    fn next_delay(&mut self) -> f64 {
        let c = &self.config;
        let phase = 2.0 * PI * c.speed * self.index as f64 / c.sample_rate;
        self.index += 1;
        c.average_delay * (1.0 + c.sweep * phase.sin())
    }

    fn max_delay(&self) -> usize {
        (self.config.average_delay * (1.0 + self.config.sweep.abs())).ceil() as usize
    }

    fn reset(&mut self) {
        self.index = 0;
    }
}

/// Flanger: the input mixed with a copy of itself under a swept delay
pub struct Flanger<S, D> {
    line: TimeVaryingDelayLine<S>,
    sequence: D,
    depth: f64,
    invert_phase: bool,
}

impl<S: Sample, D: DelaySequence> Flanger<S, D> {
    /// # Arguments
    /// * `depth` - Weight of the delayed copy, in `[0, 1]`
    /// * `invert_phase` - Subtract the delayed copy instead of adding it
    /// * `sequence` - Per-sample delay generator; its `max_delay` sizes the line
    pub fn new(depth: f64, invert_phase: bool, sequence: D) -> Result<Self> {
        if !(0.0..=1.0).contains(&depth) {
            tracing::warn!(depth, "flanger depth outside [0, 1]");
            return Err(FilterError::InvalidParameter {
                name: "depth",
                reason: format!("must be in [0, 1], got {}", depth),
            });
        }
        let delay_coeff = if invert_phase { -depth } else { depth };
        let line = TimeVaryingDelayLine::new(sequence.max_delay(), S::one(), S::from_f64(delay_coeff))?;

        tracing::debug!(depth, invert_phase, capacity = line.capacity(), "flanger created");

        Ok(Self {
            line,
            sequence,
            depth,
            invert_phase,
        })
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn invert_phase(&self) -> bool {
        self.invert_phase
    }

    /// Advance one sample, reporting an out-of-range delay instead of panicking
    pub fn try_next(&mut self, input: S) -> Result<S> {
        let delay = self.sequence.next_delay();
        self.line.try_next(input, delay)
    }
}

impl<S: Sample, D: DelaySequence> Filter<S> for Flanger<S, D> {
    /// # Panics
    /// Panics if the sequence yields a delay beyond its own `max_delay`.
    fn next(&mut self, input: S) -> S {
        let delay = self.sequence.next_delay();
        self.line.next(input, delay)
    }

    fn transient_len(&self) -> usize {
        self.line.capacity()
    }

    fn reset(&mut self) {
        self.line.reset();
        self.sequence.reset();
    }
}
