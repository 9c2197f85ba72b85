//! Fixed 4x interpolation and decimation
//!
//! Interpolation zero-stuffs each input sample into four phases and lowpass
//! filters the result to remove the spectral images; decimation lowpass filters
//! four high-rate samples and keeps one. Both directions use the same kernel.

use std::sync::OnceLock;

use crate::convolution::OverlapAddConvolver;
use crate::error::{FilterError, Result};
use crate::filters::{windowed_sinc, Filter, WindowType};
use crate::sample::Sample;

/// The only supported rate change
pub const RATE_FACTOR: usize = 4;

/// Transition band of the interpolation kernel (radians)
const TRANSITION_WIDTH: f64 = 12.0 * std::f64::consts::PI / 768.0;

/// Lowpass kernel for 4x rate changes
///
/// Blackman-windowed sinc, 769 taps, cutoff half a transition band below
/// π/4 so the stopband starts at the new Nyquist frequency. Built on first use.
pub fn interpolation_kernel() -> &'static [f64] {
    static KERNEL: OnceLock<Vec<f64>> = OnceLock::new();
    KERNEL.get_or_init(|| {
        let window = WindowType::Blackman;
        let length = window.kernel_length(TRANSITION_WIDTH);
        let cutoff = 1.0 / RATE_FACTOR as f64 - 0.5 * TRANSITION_WIDTH / std::f64::consts::PI;
        tracing::debug!(length, cutoff, "designing interpolation kernel");
        windowed_sinc(cutoff, length, window)
    })
}

/// Interpolator and decimator pair for running a stage at 4x the base rate
pub struct PairedInterpolatorDecimator<S> {
    interpolator: OverlapAddConvolver<S>,
    decimator: OverlapAddConvolver<S>,
    /// Restores the energy lost to zero-stuffing
    gain: S,
}

impl<S: Sample> PairedInterpolatorDecimator<S> {
    /// # Arguments
    /// * `window_size` - Overlap-add window of both convolvers, in high-rate samples
    pub fn new(window_size: usize) -> Result<Self> {
        let kernel: Vec<S> = interpolation_kernel().iter().map(|&h| S::from_f64(h)).collect();

        let interpolator = OverlapAddConvolver::new(window_size, &kernel)?;
        let decimator = OverlapAddConvolver::new(window_size, &kernel)?;

        tracing::debug!(factor = RATE_FACTOR, window_size, taps = kernel.len(), "resampler created");

        Ok(Self {
            interpolator,
            decimator,
            gain: S::from_f64(RATE_FACTOR as f64),
        })
    }

    /// Like [`PairedInterpolatorDecimator::new`] with an explicit rate factor
    ///
    /// Fails with `UnsupportedRateFactor` for anything but 4.
    pub fn with_factor(factor: usize, window_size: usize) -> Result<Self> {
        if factor != RATE_FACTOR {
            tracing::warn!(factor, "unsupported rate factor");
            return Err(FilterError::UnsupportedRateFactor(factor));
        }
        Self::new(window_size)
    }

    /// Upsample one base-rate sample into four high-rate samples
    pub fn interpolate(&mut self, input: S) -> [S; RATE_FACTOR] {
        let mut out = [S::zero(); RATE_FACTOR];
        for (phase, slot) in out.iter_mut().enumerate() {
            let x = if phase == 0 { input } else { S::zero() };
            *slot = self.gain * self.interpolator.next(x);
        }
        out
    }

    /// Downsample four high-rate samples into one base-rate sample
    ///
    /// All four go through the lowpass; the last filtered phase is kept.
    pub fn decimate(&mut self, block: &[S; RATE_FACTOR]) -> S {
        let mut last = S::zero();
        for &x in block {
            last = self.decimator.next(x);
        }
        last
    }

    /// High-rate samples between an input and its round-trip output
    ///
    /// Both convolvers' block latency plus the group delay of the kernel twice.
    pub fn round_trip_delay(&self) -> usize {
        self.interpolator.transient_len() + self.decimator.transient_len()
    }

    pub fn reset(&mut self) {
        self.interpolator.reset();
        self.decimator.reset();
    }
}
