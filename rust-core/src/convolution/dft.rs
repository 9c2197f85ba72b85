//! Single-block linear convolution via the FFT
//!
//! The block and the kernel are zero-padded to a power-of-two transform
//! length of at least `block + kernel - 1`, so the circular convolution
//! computed in the frequency domain equals the linear one.

use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::{FilterError, Result};
use crate::sample::Sample;

/// FFT convolver for one fixed-size input block against a fixed kernel
pub struct DftConvolver<S> {
    block_size: usize,
    kernel_len: usize,
    fft_len: usize,

    /// Kernel spectrum, computed once
    kernel_spectrum: Vec<Complex<f64>>,

    /// Block the caller fills before [`DftConvolver::run_filter`]
    input: Vec<S>,

    /// Working spectrum, reused every block
    spectrum: Vec<Complex<f64>>,

    /// FFT scratch space
    scratch: Vec<Complex<f64>>,

    /// Linear convolution of the last block, `block + kernel - 1` samples
    output: Vec<S>,

    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl<S: Sample> DftConvolver<S> {
    /// Create a convolver
    ///
    /// # Arguments
    /// * `block_size` - Number of input samples per call, non-zero
    /// * `kernel` - Impulse response, non-empty
    pub fn new(block_size: usize, kernel: &[S]) -> Result<Self> {
        if block_size == 0 {
            tracing::warn!("convolver block size must be non-zero");
            return Err(FilterError::ZeroWindowSize);
        }
        if kernel.is_empty() {
            tracing::warn!("convolver kernel is empty");
            return Err(FilterError::EmptyKernel);
        }

        let kernel_len = kernel.len();
        let fft_len = (block_size + kernel_len - 1).next_power_of_two();

        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(fft_len);
        let inverse = planner.plan_fft_inverse(fft_len);

        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        let mut scratch = vec![Complex::new(0.0, 0.0); scratch_len];

        let mut kernel_spectrum = vec![Complex::new(0.0, 0.0); fft_len];
        for (slot, &h) in kernel_spectrum.iter_mut().zip(kernel) {
            *slot = h.to_complex();
        }
        forward.process_with_scratch(&mut kernel_spectrum, &mut scratch);

        tracing::debug!(block_size, kernel_len, fft_len, "dft convolver created");

        Ok(Self {
            block_size,
            kernel_len,
            fft_len,
            kernel_spectrum,
            input: vec![S::zero(); block_size],
            spectrum: vec![Complex::new(0.0, 0.0); fft_len],
            scratch,
            output: vec![S::zero(); block_size + kernel_len - 1],
            forward,
            inverse,
        })
    }

    /// Input block, written by the caller
    pub fn input_mut(&mut self) -> &mut [S] {
        &mut self.input
    }

    /// Convolve the current input block with the kernel
    ///
    /// Forward transform, pointwise multiply by the kernel spectrum, inverse
    /// transform scaled by `1 / fft_len`.
    pub fn run_filter(&mut self) {
        for (slot, &x) in self.spectrum.iter_mut().zip(&self.input) {
            *slot = x.to_complex();
        }
        self.spectrum[self.block_size..].fill(Complex::new(0.0, 0.0));

        self.forward.process_with_scratch(&mut self.spectrum, &mut self.scratch);
        for (bin, h) in self.spectrum.iter_mut().zip(&self.kernel_spectrum) {
            *bin *= h;
        }
        self.inverse.process_with_scratch(&mut self.spectrum, &mut self.scratch);

        let scale = 1.0 / self.fft_len as f64;
        for (y, bin) in self.output.iter_mut().zip(&self.spectrum) {
            *y = S::from_complex(bin * scale);
        }
    }

    /// Result of the last [`DftConvolver::run_filter`]
    pub fn output(&self) -> &[S] {
        &self.output
    }

    /// Copy `block` in (zero-padding a short block), convolve, return the result
    pub fn convolve(&mut self, block: &[S]) -> Result<&[S]> {
        if block.len() > self.block_size {
            return Err(FilterError::InvalidParameter {
                name: "block",
                reason: format!("{} samples exceed the block size {}", block.len(), self.block_size),
            });
        }
        self.input[..block.len()].copy_from_slice(block);
        self.input[block.len()..].fill(S::zero());
        self.run_filter();
        Ok(&self.output)
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn kernel_len(&self) -> usize {
        self.kernel_len
    }

    /// Transform length (power of two)
    pub fn fft_len(&self) -> usize {
        self.fft_len
    }
}
