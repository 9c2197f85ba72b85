//! Streaming FIR filtering by overlap-add FFT convolution
//!
//! Samples are gathered into windows of `window_size`. Each full window is
//! convolved with the kernel in one shot and the `window + kernel - 1` result
//! samples are summed into a circular accumulator, where they overlap the
//! tail of the previous window. Output is read from the accumulator one sample
//! per call, so the filter looks like any other per-sample filter but with a
//! latency of `window_size - 1` samples.

use crate::convolution::DftConvolver;
use crate::error::Result;
use crate::filters::Filter;
use crate::sample::Sample;

/// Overlap-add convolution filter
pub struct OverlapAddConvolver<S> {
    convolver: DftConvolver<S>,
    window_size: usize,
    kernel_len: usize,

    /// Samples gathered into the current window
    filled: usize,

    /// Circular accumulator of transform length
    accumulator: Vec<S>,
    /// Start of the most recently added block
    write: usize,
    /// Next output position, trails `write` by up to one window
    read: usize,
}

impl<S: Sample> OverlapAddConvolver<S> {
    /// Create an overlap-add filter
    ///
    /// # Arguments
    /// * `window_size` - Samples per FFT block (also sets the latency)
    /// * `kernel` - FIR impulse response
    pub fn new(window_size: usize, kernel: &[S]) -> Result<Self> {
        let convolver = DftConvolver::new(window_size, kernel)?;
        let fft_len = convolver.fft_len();

        tracing::debug!(window_size, kernel_len = kernel.len(), fft_len, "overlap-add convolver created");

        Ok(Self {
            convolver,
            window_size,
            kernel_len: kernel.len(),
            filled: 0,
            accumulator: vec![S::zero(); fft_len],
            write: 0,
            read: 0,
        })
    }

    /// Delay between an input sample and its direct contribution to the output
    pub fn latency(&self) -> usize {
        self.window_size - 1
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn kernel_len(&self) -> usize {
        self.kernel_len
    }

    /// Convolve the completed window and fold it into the accumulator
    fn add_block(&mut self) {
        self.convolver.run_filter();

        let len = self.accumulator.len();
        let tail = self.kernel_len - 1;

        // Slots past the previous block's tail still hold stale sums
        for i in 0..self.window_size {
            self.accumulator[(self.write + tail + i) % len] = S::zero();
        }
        for (i, &y) in self.convolver.output().iter().enumerate() {
            self.accumulator[(self.write + i) % len] += y;
        }

        self.read = self.write;
        self.write = (self.write + self.window_size) % len;
        self.filled = 0;
    }
}

impl<S: Sample> Filter<S> for OverlapAddConvolver<S> {
    fn next(&mut self, input: S) -> S {
        self.convolver.input_mut()[self.filled] = input;
        self.filled += 1;
        if self.filled == self.window_size {
            self.add_block();
        }

        let output = self.accumulator[self.read];
        self.read = (self.read + 1) % self.accumulator.len();
        output
    }

    /// Latency plus the kernel tail
    fn transient_len(&self) -> usize {
        self.latency() + self.kernel_len - 1
    }

    fn reset(&mut self) {
        self.accumulator.fill(S::zero());
        self.convolver.input_mut().fill(S::zero());
        self.filled = 0;
        self.write = 0;
        self.read = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::TappedDelayLine;
    use crate::stream::run_filter;

    const INPUT: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
    const KERNEL: [f64; 3] = [-1.0, 1.0, 3.0];

    fn assert_close(got: &[f64], want: &[f64]) {
        assert_eq!(got.len(), want.len(), "{:?} vs {:?}", got, want);
        for (i, (g, w)) in got.iter().zip(want).enumerate() {
            assert!((g - w).abs() < 1e-9, "Mismatch at {}: {} vs {}", i, g, w);
        }
    }

    #[test]
    fn test_window_two() {
        let mut ola = OverlapAddConvolver::new(2, &KERNEL).unwrap();
        assert_eq!(ola.latency(), 1);
        let out = run_filter(&mut ola, &INPUT, 4);
        assert_close(&out, &[0.0, -1.0, -1.0, 2.0, 5.0, 8.0, 17.0, 15.0, 0.0]);
    }

    #[test]
    fn test_window_three() {
        let mut ola = OverlapAddConvolver::new(3, &KERNEL).unwrap();
        let out = run_filter(&mut ola, &INPUT, 5);
        assert_close(&out, &[0.0, 0.0, -1.0, -1.0, 2.0, 5.0, 8.0, 17.0, 15.0, 0.0]);
    }

    #[test]
    fn test_single_precision_windows() {
        let input: Vec<f32> = INPUT.iter().map(|&x| x as f32).collect();
        let kernel: Vec<f32> = KERNEL.iter().map(|&h| h as f32).collect();
        let cases: [(usize, usize, &[f64]); 2] = [
            (2, 4, &[0.0, -1.0, -1.0, 2.0, 5.0, 8.0, 17.0, 15.0, 0.0]),
            (3, 5, &[0.0, 0.0, -1.0, -1.0, 2.0, 5.0, 8.0, 17.0, 15.0, 0.0]),
        ];

        for (window, transients, want) in cases {
            let mut ola = OverlapAddConvolver::new(window, &kernel).unwrap();
            let out = run_filter(&mut ola, &input, transients);
            assert_eq!(out.len(), want.len());
            for (i, (&g, &w)) in out.iter().zip(want).enumerate() {
                assert!((g as f64 - w).abs() < 1e-5, "window {} at {}: {} vs {}", window, i, g, w);
            }
        }
    }

    #[test]
    fn test_window_one_has_no_latency() {
        let mut ola = OverlapAddConvolver::new(1, &KERNEL).unwrap();
        let transients = ola.transient_len();
        assert_eq!(transients, 2);
        let out = run_filter(&mut ola, &INPUT, transients);
        assert_close(&out, &[-1.0, -1.0, 2.0, 5.0, 8.0, 17.0, 15.0]);
    }

    #[test]
    fn test_matches_direct_convolution_after_latency() {
        let kernel: Vec<f64> = (0..37).map(|k| ((k * 7 % 11) as f64 - 5.0) / 10.0).collect();
        let input: Vec<f64> = (0..300).map(|n| (n as f64 * 0.37).sin()).collect();

        let mut direct = TappedDelayLine::from_impulse_response(&kernel).unwrap();
        let expected = run_filter(&mut direct, &input, kernel.len() - 1);

        for window in [1, 4, 16, 50, 64] {
            let mut ola = OverlapAddConvolver::new(window, &kernel).unwrap();
            let transients = ola.transient_len();
            let out = run_filter(&mut ola, &input, transients);

            // Strip the latency: what is left is the linear convolution
            let latency = ola.latency();
            assert_eq!(out.len() - latency, input.len() + kernel.len() - 1);
            assert_close(&out[latency..], &expected);
        }
    }

    #[test]
    fn test_reset_restarts_stream() {
        let mut ola = OverlapAddConvolver::new(3, &KERNEL).unwrap();
        let first = run_filter(&mut ola, &INPUT, 5);
        // Leave a partial window behind, then reset
        ola.next(9.0);
        ola.reset();
        let second = run_filter(&mut ola, &INPUT, 5);
        assert_close(&first, &second);
    }
}
