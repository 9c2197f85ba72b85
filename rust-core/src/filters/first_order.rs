//! First-order filters designed from analog prototypes via the bilinear transform
//!
//! All four kinds share the difference equation
//!
//! ```text
//! y[n] = dry x[n] + wet (a0 x[n] + a1 x[n-1] - b1 y[n-1])
//! ```
//!
//! and differ only in how the coefficients are computed (frequency warping
//! included).

use std::f64::consts::PI;

use crate::error::{FilterError, Result};
use crate::filters::Filter;
use crate::sample::Sample;

/// What a [`FirstOrderFilter`] was designed as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstOrderKind {
    Lowpass,
    Highpass,
    LowShelving,
    HighShelving,
}

/// Coefficients of the first-order difference equation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstOrderCoefficients<S> {
    pub dry: S,
    pub wet: S,
    pub a0: S,
    pub a1: S,
    pub b1: S,
}

impl<S: Sample> FirstOrderCoefficients<S> {
    fn from_f64(dry: f64, wet: f64, a0: f64, a1: f64, b1: f64) -> Self {
        Self {
            dry: S::from_f64(dry),
            wet: S::from_f64(wet),
            a0: S::from_f64(a0),
            a1: S::from_f64(a1),
            b1: S::from_f64(b1),
        }
    }
}

/// First-order IIR section with dry/wet mix
///
/// Coefficients are public and may be changed between samples; the state is
/// kept.
#[derive(Debug, Clone)]
pub struct FirstOrderFilter<S> {
    pub coefficients: FirstOrderCoefficients<S>,
    pub kind: FirstOrderKind,
    prev_input: S,
    prev_output: S,
}

/// Normalized cutoff angle `2 pi fc / fs`
fn cutoff_angle(cutoff_freq: f64, sample_rate: f64) -> Result<f64> {
    if !(sample_rate > 0.0) {
        tracing::warn!(sample_rate, "first-order filter sample rate must be positive");
        return Err(FilterError::InvalidParameter {
            name: "sample_rate",
            reason: format!("must be positive, got {}", sample_rate),
        });
    }
    if !(cutoff_freq >= 0.0) {
        tracing::warn!(cutoff_freq, "first-order filter cutoff must be non-negative");
        return Err(FilterError::InvalidParameter {
            name: "cutoff_freq",
            reason: format!("must be non-negative, got {}", cutoff_freq),
        });
    }
    Ok(2.0 * PI * cutoff_freq / sample_rate)
}

/// Gamma for the low/high pass designs
fn pass_gamma(theta: f64) -> f64 {
    theta.cos() / (1.0 + theta.sin())
}

/// (gamma, mu) for the shelving designs
fn shelf_gamma_mu(theta: f64, gain_db: f64, low: bool) -> (f64, f64) {
    let mu = 10f64.powf(gain_db / 20.0);
    let beta = if low { 4.0 / (1.0 + mu) } else { 0.25 * (1.0 + mu) };
    let delta = beta * (0.5 * theta).tan();
    ((1.0 - delta) / (1.0 + delta), mu)
}

impl<S: Sample> FirstOrderFilter<S> {
    pub fn new(coefficients: FirstOrderCoefficients<S>, kind: FirstOrderKind) -> Self {
        Self {
            coefficients,
            kind,
            prev_input: S::zero(),
            prev_output: S::zero(),
        }
    }

    /// First-order lowpass
    ///
    /// # Arguments
    /// * `dry` - Weight of the unfiltered input
    /// * `wet` - Weight of the filtered signal
    /// * `cutoff_freq` - Cutoff in Hz
    /// * `sample_rate` - Sample rate in Hz
    pub fn lowpass(dry: S, wet: S, cutoff_freq: f64, sample_rate: f64) -> Result<Self> {
        let gamma = pass_gamma(cutoff_angle(cutoff_freq, sample_rate)?);
        let mut coefficients =
            FirstOrderCoefficients::from_f64(0.0, 0.0, 0.5 * (1.0 - gamma), 0.5 * (1.0 - gamma), -gamma);
        coefficients.dry = dry;
        coefficients.wet = wet;
        Ok(Self::new(coefficients, FirstOrderKind::Lowpass))
    }

    /// First-order highpass, arguments as for [`FirstOrderFilter::lowpass`]
    pub fn highpass(dry: S, wet: S, cutoff_freq: f64, sample_rate: f64) -> Result<Self> {
        let gamma = pass_gamma(cutoff_angle(cutoff_freq, sample_rate)?);
        let mut coefficients =
            FirstOrderCoefficients::from_f64(0.0, 0.0, 0.5 * (1.0 + gamma), -0.5 * (1.0 + gamma), -gamma);
        coefficients.dry = dry;
        coefficients.wet = wet;
        Ok(Self::new(coefficients, FirstOrderKind::Highpass))
    }

    /// Low shelf boosting (or cutting) below `cutoff_freq` by `gain_db`
    pub fn low_shelf(cutoff_freq: f64, sample_rate: f64, gain_db: f64) -> Result<Self> {
        let theta = cutoff_angle(cutoff_freq, sample_rate)?;
        let (gamma, mu) = shelf_gamma_mu(theta, gain_db, true);
        let coefficients = FirstOrderCoefficients::from_f64(
            1.0,
            mu - 1.0,
            0.5 * (1.0 - gamma),
            0.5 * (1.0 - gamma),
            -gamma,
        );
        Ok(Self::new(coefficients, FirstOrderKind::LowShelving))
    }

    /// High shelf boosting (or cutting) above `cutoff_freq` by `gain_db`
    pub fn high_shelf(cutoff_freq: f64, sample_rate: f64, gain_db: f64) -> Result<Self> {
        let theta = cutoff_angle(cutoff_freq, sample_rate)?;
        let (gamma, mu) = shelf_gamma_mu(theta, gain_db, false);
        let coefficients = FirstOrderCoefficients::from_f64(
            1.0,
            mu - 1.0,
            0.5 * (1.0 + gamma),
            -0.5 * (1.0 + gamma),
            -gamma,
        );
        Ok(Self::new(coefficients, FirstOrderKind::HighShelving))
    }
}

impl<S: Sample> Filter<S> for FirstOrderFilter<S> {
    #[inline]
    fn next(&mut self, input: S) -> S {
        let c = &self.coefficients;
        let output = c.dry * input
            + c.wet * (c.a0 * input + c.a1 * self.prev_input - c.b1 * self.prev_output);
        self.prev_input = input;
        self.prev_output = output;
        output
    }

    fn transient_len(&self) -> usize {
        1
    }

    fn reset(&mut self) {
        self.prev_input = S::zero();
        self.prev_output = S::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::run_filter;
    use approx::assert_abs_diff_eq;

    const INPUT: [f64; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];

    fn manual(dry: f64, wet: f64, a0: f64, a1: f64, b1: f64) -> FirstOrderFilter<f64> {
        FirstOrderFilter::new(
            FirstOrderCoefficients { dry, wet, a0, a1, b1 },
            FirstOrderKind::Lowpass,
        )
    }

    fn assert_coefficients(f: &FirstOrderFilter<f64>, dry: f64, wet: f64, a0: f64, a1: f64, b1: f64) {
        let c = f.coefficients;
        assert_abs_diff_eq!(c.dry, dry, epsilon = 1e-12);
        assert_abs_diff_eq!(c.wet, wet, epsilon = 1e-12);
        assert_abs_diff_eq!(c.a0, a0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.a1, a1, epsilon = 1e-12);
        assert_abs_diff_eq!(c.b1, b1, epsilon = 1e-12);
    }

    #[test]
    fn test_dry_only_replicates_input() {
        let mut f = manual(1.0, 0.0, 5.0, 5.0, 5.0);
        assert_eq!(run_filter(&mut f, &INPUT, 0), INPUT.to_vec());
    }

    #[test]
    fn test_a0_only_replicates_input() {
        let mut f = manual(0.0, 1.0, 1.0, 0.0, 0.0);
        assert_eq!(run_filter(&mut f, &INPUT, 0), INPUT.to_vec());
    }

    #[test]
    fn test_a1_only_delays_input() {
        let mut f = manual(0.0, 1.0, 0.0, 1.0, 0.0);
        let transients = f.transient_len();
        assert_eq!(
            run_filter(&mut f, &INPUT, transients),
            vec![0.0, 0.0, 1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn test_zero_coefficients_give_zeros() {
        let mut f = manual(0.0, 1.0, 0.0, 0.0, 0.0);
        assert_eq!(run_filter(&mut f, &INPUT, 2), vec![0.0; 7]);
    }

    #[test]
    fn test_recursive_output() {
        let mut f = manual(0.0, 1.0, 1.0, 1.0, 0.5);
        let out = run_filter(&mut f, &INPUT, 2);
        let expected = [0.0, 1.0, 2.5, 3.75, 5.125, 1.4375, -0.71875];
        for (g, w) in out.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*g, *w, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_lowpass_coefficients() {
        let f0 = FirstOrderFilter::lowpass(0.0, 1.0, 0.0, 1.0).unwrap();
        assert_coefficients(&f0, 0.0, 1.0, 0.0, 0.0, -1.0);
        assert_eq!(f0.kind, FirstOrderKind::Lowpass);

        let f1 = FirstOrderFilter::lowpass(0.0, 1.0, 1.0, 1.0).unwrap();
        assert_coefficients(&f1, 0.0, 1.0, 0.0, 0.0, -1.0);

        let fh = FirstOrderFilter::lowpass(0.0, 1.0, 0.5, 1.0).unwrap();
        assert_coefficients(&fh, 0.0, 1.0, 1.0, 1.0, 1.0);
    }

    #[test]
    fn test_highpass_coefficients() {
        let f0 = FirstOrderFilter::highpass(0.0, 1.0, 0.0, 1.0).unwrap();
        assert_coefficients(&f0, 0.0, 1.0, 1.0, -1.0, -1.0);
        assert_eq!(f0.kind, FirstOrderKind::Highpass);

        let f1 = FirstOrderFilter::highpass(0.0, 1.0, 1.0, 1.0).unwrap();
        assert_coefficients(&f1, 0.0, 1.0, 1.0, -1.0, -1.0);

        let fh = FirstOrderFilter::highpass(0.0, 1.0, 0.5, 1.0).unwrap();
        assert_coefficients(&fh, 0.0, 1.0, 0.0, 0.0, 1.0);
    }

    #[test]
    fn test_low_shelf_coefficients() {
        let f0 = FirstOrderFilter::<f64>::low_shelf(0.0, 1.0, 20.0).unwrap();
        assert_coefficients(&f0, 1.0, 9.0, 0.0, 0.0, -1.0);
        assert_eq!(f0.kind, FirstOrderKind::LowShelving);

        // delta = 4/11 at a quarter of the sample rate
        let gamma = (1.0 - 4.0 / 11.0) / (1.0 + 4.0 / 11.0);
        let fq = FirstOrderFilter::<f64>::low_shelf(0.25, 1.0, 20.0).unwrap();
        assert_coefficients(&fq, 1.0, 9.0, 0.5 * (1.0 - gamma), 0.5 * (1.0 - gamma), -gamma);
    }

    #[test]
    fn test_high_shelf_coefficients() {
        let f0 = FirstOrderFilter::<f64>::high_shelf(0.0, 1.0, 20.0).unwrap();
        assert_coefficients(&f0, 1.0, 9.0, 1.0, -1.0, -1.0);
        assert_eq!(f0.kind, FirstOrderKind::HighShelving);

        // delta = 11/4 at a quarter of the sample rate
        let gamma = (1.0 - 11.0 / 4.0) / (1.0 + 11.0 / 4.0);
        let fq = FirstOrderFilter::<f64>::high_shelf(0.25, 1.0, 20.0).unwrap();
        assert_coefficients(&fq, 1.0, 9.0, 0.5 * (1.0 + gamma), -0.5 * (1.0 + gamma), -gamma);
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut lp = FirstOrderFilter::lowpass(0.0, 1.0, 1000.0, 48000.0).unwrap();
        let out = run_filter(&mut lp, &[1.0; 2000], 0);
        assert_abs_diff_eq!(out[1999], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_sample_rate() {
        assert!(matches!(
            FirstOrderFilter::<f64>::high_shelf(100.0, 0.0, 6.0),
            Err(FilterError::InvalidParameter { name: "sample_rate", .. })
        ));
        assert!(FirstOrderFilter::lowpass(0.0, 1.0, f64::NAN, 48000.0).is_err());
    }
}
