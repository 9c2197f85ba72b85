//! Sparse FIR filter over a circular delay line
//!
//! Only the listed delays are tapped, so long sparse responses (echo
//! patterns, reverb early reflections) cost one multiply per tap rather
//! than one per sample of the longest delay.

use crate::error::{FilterError, Result};
use crate::filters::{DelayBuffer, Filter};
use crate::sample::Sample;

/// Tapped delay line: `y[n] = c0 x[n] + Σ c(i+1) x[n - d_i]`
#[derive(Debug, Clone)]
pub struct TappedDelayLine<S> {
    delays: Vec<usize>,
    /// `coefficients[0]` weights the undelayed input
    coefficients: Vec<S>,
    /// `None` when there are no delayed taps (pure gain)
    history: Option<DelayBuffer<S>>,
}

impl<S: Sample> TappedDelayLine<S> {
    /// Create a tapped delay line
    ///
    /// # Arguments
    /// * `delays` - Tap delays in samples, each at least 1
    /// * `coefficients` - One more than `delays`: the undelayed weight first,
    ///   then one weight per delay in the same order
    pub fn new(delays: Vec<usize>, coefficients: Vec<S>) -> Result<Self> {
        if coefficients.len() != delays.len() + 1 {
            tracing::warn!(
                delays = delays.len(),
                coefficients = coefficients.len(),
                "tapped delay line coefficient count mismatch"
            );
            return Err(FilterError::CoefficientCountMismatch {
                expected: delays.len() + 1,
                found: coefficients.len(),
            });
        }
        if let Some(&delay) = delays.iter().find(|&&d| d == 0) {
            tracing::warn!(delay, "tapped delay line tap without delay");
            return Err(FilterError::InvalidDelay { delay });
        }

        let max_delay = delays.iter().max().copied().unwrap_or(0);
        let history = if max_delay > 0 {
            Some(DelayBuffer::new(max_delay, S::zero())?)
        } else {
            None
        };

        tracing::debug!(taps = delays.len(), max_delay, "tapped delay line created");

        Ok(Self {
            delays,
            coefficients,
            history,
        })
    }

    /// Dense FIR filter from an impulse response `h[0..M]`
    ///
    /// Tap `k` gets delay `k`, so the line holds `M - 1` past samples.
    pub fn from_impulse_response(kernel: &[S]) -> Result<Self> {
        if kernel.is_empty() {
            tracing::warn!("empty impulse response");
            return Err(FilterError::EmptyKernel);
        }
        Self::new((1..kernel.len()).collect(), kernel.to_vec())
    }

    pub fn delays(&self) -> &[usize] {
        &self.delays
    }

    pub fn coefficients(&self) -> &[S] {
        &self.coefficients
    }

    /// Longest tap delay (0 for a pure gain)
    pub fn max_delay(&self) -> usize {
        self.history.as_ref().map_or(0, DelayBuffer::capacity)
    }

    /// Replace the tap weights, keeping delays and state
    pub fn update_coefficients(&mut self, coefficients: Vec<S>) -> Result<()> {
        if coefficients.len() != self.coefficients.len() {
            return Err(FilterError::CoefficientCountMismatch {
                expected: self.coefficients.len(),
                found: coefficients.len(),
            });
        }
        self.coefficients = coefficients;
        Ok(())
    }
}

impl<S: Sample> Filter<S> for TappedDelayLine<S> {
    #[inline]
    fn next(&mut self, input: S) -> S {
        let mut output = self.coefficients[0] * input;

        if let Some(history) = self.history.as_mut() {
            for (&delay, &coeff) in self.delays.iter().zip(&self.coefficients[1..]) {
                output += coeff * history.tap(delay);
            }
            history.push(input);
        }

        output
    }

    fn transient_len(&self) -> usize {
        self.max_delay()
    }

    fn reset(&mut self) {
        if let Some(history) = self.history.as_mut() {
            history.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::run_filter;
    use num_complex::Complex;

    fn assert_close(got: &[f64], want: &[f64]) {
        assert_eq!(got.len(), want.len());
        for (g, w) in got.iter().zip(want) {
            assert!((g - w).abs() < 1e-10, "{:?} != {:?}", got, want);
        }
    }

    #[test]
    fn test_identity() {
        let mut tdl = TappedDelayLine::new(vec![], vec![1.0]).unwrap();
        assert_eq!(tdl.transient_len(), 0);
        assert_close(&run_filter(&mut tdl, &[1.0, 2.0, 3.0], 0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_pure_delay() {
        let mut tdl = TappedDelayLine::new(vec![2], vec![0.0, 1.0]).unwrap();
        let transients = tdl.transient_len();
        let out = run_filter(&mut tdl, &[1.0, 2.0, 3.0], transients);
        assert_close(&out, &[0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_sparse_taps_with_transients() {
        let mut tdl = TappedDelayLine::new(vec![1, 2], vec![4.0, 5.0, 7.0]).unwrap();
        let transients = tdl.transient_len();
        let out = run_filter(&mut tdl, &[1.0, 2.0, 3.0, 4.0], transients);
        assert_close(&out, &[4.0, 13.0, 29.0, 45.0, 41.0, 28.0]);
    }

    #[test]
    fn test_tap_order_does_not_matter() {
        let mut a = TappedDelayLine::new(vec![3, 1], vec![1.0, 0.5, 0.25]).unwrap();
        let mut b = TappedDelayLine::new(vec![1, 3], vec![1.0, 0.25, 0.5]).unwrap();
        let input = [1.0, -2.0, 0.5, 3.0];
        assert_close(&run_filter(&mut a, &input, 3), &run_filter(&mut b, &input, 3));
    }

    #[test]
    fn test_moving_average_impulse() {
        let mut fir = TappedDelayLine::from_impulse_response(&[1.0 / 3.0; 3]).unwrap();
        let transients = fir.transient_len();
        let out = run_filter(&mut fir, &[3.0], transients);
        assert_close(&out, &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_complex_samples() {
        let i = Complex::new(0.0, 1.0);
        let one = Complex::new(1.0, 0.0);
        let mut tdl = TappedDelayLine::new(vec![1], vec![one, i]).unwrap();
        let out = run_filter(&mut tdl, &[one, one], 1);
        assert_eq!(out, vec![one, one + i, i]);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut tdl = TappedDelayLine::new(vec![1], vec![1.0, 1.0]).unwrap();
        tdl.next(1.0);
        tdl.next(2.0);
        tdl.reset();
        assert_eq!(tdl.next(1.0), 1.0);
    }

    #[test]
    fn test_update_coefficients() {
        let mut tdl = TappedDelayLine::new(vec![1], vec![1.0, 0.0]).unwrap();
        assert_eq!(tdl.next(1.0), 1.0);
        tdl.update_coefficients(vec![0.0, 1.0]).unwrap();
        // History survives the update
        assert_eq!(tdl.next(2.0), 1.0);
        assert!(tdl.update_coefficients(vec![1.0]).is_err());
    }

    #[test]
    fn test_invalid_configurations() {
        assert_eq!(
            TappedDelayLine::new(vec![1, 2], vec![1.0, 1.0]).unwrap_err(),
            FilterError::CoefficientCountMismatch { expected: 3, found: 2 }
        );
        assert_eq!(
            TappedDelayLine::new(vec![1, 0], vec![1.0, 1.0, 1.0]).unwrap_err(),
            FilterError::InvalidDelay { delay: 0 }
        );
        assert_eq!(
            TappedDelayLine::<f64>::from_impulse_response(&[]).unwrap_err(),
            FilterError::EmptyKernel
        );
    }
}
