//! Comb filters
//!
//! Feedforward-feedback comb: `y[n] = b0 x[n] + b1 x[n-m] + a y[n-m]`.
//! Filtered feedback comb (Schroeder/Moorer style, as used by Freeverb):
//! `y[n] = x[n] + LP(y[n-m])` where `LP` is a one-pole lowpass.

use crate::error::{check_stable, FilterError, Result};
use crate::filters::{DelayBuffer, Filter};
use crate::sample::Sample;

fn check_delay(delay: usize) -> Result<()> {
    if delay == 0 {
        tracing::warn!("comb filter delay must be at least one sample");
        return Err(FilterError::InvalidDelay { delay });
    }
    Ok(())
}

/// Comb filter with one feedforward and one feedback path sharing delay `m`
#[derive(Debug, Clone)]
pub struct FeedforwardFeedbackComb<S> {
    input_coeff: S,
    input_delay_coeff: S,
    output_coeff: S,
    /// (input, output) pairs; one cursor serves both histories
    history: DelayBuffer<(S, S)>,
}

impl<S: Sample> FeedforwardFeedbackComb<S> {
    /// Create a comb filter
    ///
    /// # Arguments
    /// * `b0` - Weight of the current input
    /// * `b1` - Weight of the input `delay` samples ago
    /// * `a` - Feedback weight of the output `delay` samples ago, `|a| < 1`
    /// * `delay` - Delay `m` in samples, at least 1
    pub fn new(b0: S, b1: S, a: S, delay: usize) -> Result<Self> {
        check_stable("a", a.magnitude())?;
        check_delay(delay)?;

        tracing::debug!(delay, "feedforward-feedback comb created");

        Ok(Self {
            input_coeff: b0,
            input_delay_coeff: b1,
            output_coeff: a,
            history: DelayBuffer::new(delay, (S::zero(), S::zero()))?,
        })
    }

    /// Schroeder all-pass section: `y[n] = -x[n] + (1 + g) x[n-m] + g y[n-m]`
    ///
    /// This is the all-pass approximation used by Freeverb.
    pub fn allpass(g: S, delay: usize) -> Result<Self> {
        Self::new(S::zero() - S::one(), S::one() + g, g, delay)
    }

    pub fn delay(&self) -> usize {
        self.history.capacity()
    }

    /// (b0, b1, a)
    pub fn coefficients(&self) -> (S, S, S) {
        (self.input_coeff, self.input_delay_coeff, self.output_coeff)
    }
}

impl<S: Sample> Filter<S> for FeedforwardFeedbackComb<S> {
    #[inline]
    fn next(&mut self, input: S) -> S {
        let (delayed_input, delayed_output) = self.history.oldest();
        let output = self.input_coeff * input
            + self.input_delay_coeff * delayed_input
            + self.output_coeff * delayed_output;
        self.history.push((input, output));
        output
    }

    fn transient_len(&self) -> usize {
        self.delay()
    }

    fn reset(&mut self) {
        self.history.reset();
    }
}

/// One-pole lowpass: `y[n] = alpha x[n] + beta y[n-1]`
#[derive(Debug, Clone)]
pub struct OnePoleLowpass<S> {
    alpha: S,
    beta: S,
    prev_output: S,
}

impl<S: Sample> OnePoleLowpass<S> {
    /// # Arguments
    /// * `alpha` - Input weight
    /// * `beta` - Feedback weight, `|beta| < 1`
    pub fn new(alpha: S, beta: S) -> Result<Self> {
        check_stable("beta", beta.magnitude())?;
        Ok(Self {
            alpha,
            beta,
            prev_output: S::zero(),
        })
    }
}

impl<S: Sample> Filter<S> for OnePoleLowpass<S> {
    #[inline]
    fn next(&mut self, input: S) -> S {
        let output = self.alpha * input + self.beta * self.prev_output;
        self.prev_output = output;
        output
    }

    fn transient_len(&self) -> usize {
        1
    }

    fn reset(&mut self) {
        self.prev_output = S::zero();
    }
}

/// Feedback comb with a one-pole lowpass in the feedback path
///
/// `y[n] = x[n] + LP(y[n-m])`. The lowpass damps high frequencies a little
/// more on every trip around the loop, which is what makes a reverb tail
/// darken as it decays.
#[derive(Debug, Clone)]
pub struct FilteredFeedbackComb<S> {
    lowpass: OnePoleLowpass<S>,
    feedback: DelayBuffer<S>,
}

impl<S: Sample> FilteredFeedbackComb<S> {
    /// # Arguments
    /// * `alpha` - Lowpass input weight (overall feedback gain)
    /// * `beta` - Lowpass feedback weight (damping), `|beta| < 1`
    /// * `delay` - Loop delay `m` in samples, at least 1
    pub fn new(alpha: S, beta: S, delay: usize) -> Result<Self> {
        let lowpass = OnePoleLowpass::new(alpha, beta)?;
        check_delay(delay)?;

        tracing::debug!(delay, "filtered feedback comb created");

        Ok(Self {
            lowpass,
            feedback: DelayBuffer::new(delay, S::zero())?,
        })
    }

    pub fn delay(&self) -> usize {
        self.feedback.capacity()
    }
}

impl<S: Sample> Filter<S> for FilteredFeedbackComb<S> {
    #[inline]
    fn next(&mut self, input: S) -> S {
        let output = input + self.lowpass.next(self.feedback.oldest());
        self.feedback.push(output);
        output
    }

    fn transient_len(&self) -> usize {
        self.delay()
    }

    fn reset(&mut self) {
        self.lowpass.reset();
        self.feedback.reset();
    }
}
