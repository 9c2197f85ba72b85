//! Kernel frequency response, for checking designed kernels

use realfft::RealFftPlanner;

use crate::error::{FilterError, Result};

/// Magnitude response of a real kernel in dB
///
/// # Arguments
/// * `kernel` - Real impulse response
/// * `fft_len` - Transform length, at least `kernel.len()`; the kernel is zero-padded
///
/// # Returns
/// `20 log10 |H(k)|` for bins `k = 0..=fft_len/2`, floored at -200 dB
pub fn magnitude_response_db(kernel: &[f64], fft_len: usize) -> Result<Vec<f64>> {
    if kernel.is_empty() {
        return Err(FilterError::EmptyKernel);
    }
    if fft_len < kernel.len() {
        return Err(FilterError::InvalidParameter {
            name: "fft_len",
            reason: format!("{} is shorter than the kernel ({})", fft_len, kernel.len()),
        });
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(fft_len);

    let mut input = r2c.make_input_vec();
    input[..kernel.len()].copy_from_slice(kernel);
    let mut spectrum = r2c.make_output_vec();

    r2c.process(&mut input, &mut spectrum)
        .map_err(|e| FilterError::Fft(e.to_string()))?;

    Ok(spectrum
        .iter()
        .map(|bin| 20.0 * bin.norm().max(1e-10).log10())
        .collect())
}

/// Normalized frequency of bin `bin`, in units of π rad/sample
pub fn bin_frequency(bin: usize, fft_len: usize) -> f64 {
    2.0 * bin as f64 / fft_len as f64
}
