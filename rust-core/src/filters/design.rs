//! Windowed-sinc FIR kernel design

use std::f64::consts::PI;

use super::windows::WindowType;
use crate::error::{FilterError, Result};

/// Design a linear-phase lowpass kernel
///
/// # Arguments
/// * `cutoff` - Cutoff in units of π rad/sample, in `(0, 1)`
/// * `transition_width` - Transition band width in radians (sets the length)
/// * `window` - Window applied to the ideal response
///
/// # Returns
/// Odd-length symmetric kernel `h[0..M]` with unity DC gain (approximately)
pub fn design_lowpass(cutoff: f64, transition_width: f64, window: WindowType) -> Result<Vec<f64>> {
    if !(cutoff > 0.0 && cutoff < 1.0) {
        tracing::warn!(cutoff, "lowpass cutoff outside (0, 1)");
        return Err(FilterError::InvalidParameter {
            name: "cutoff",
            reason: format!("must be in (0, 1), got {}", cutoff),
        });
    }
    if !(transition_width > 0.0) {
        tracing::warn!(transition_width, "lowpass transition width must be positive");
        return Err(FilterError::InvalidParameter {
            name: "transition_width",
            reason: format!("must be positive, got {}", transition_width),
        });
    }

    let length = window.kernel_length(transition_width);
    Ok(windowed_sinc(cutoff, length, window))
}

/// Ideal lowpass response `sin(wc n) / (π n)` centred in `length` taps, windowed
pub fn windowed_sinc(cutoff: f64, length: usize, window: WindowType) -> Vec<f64> {
    let wc = cutoff * PI;
    let centre = (length as f64 - 1.0) / 2.0;

    (0..length)
        .map(|n| {
            let t = n as f64 - centre;
            let ideal = if t.abs() < 1e-12 { cutoff } else { (wc * t).sin() / (PI * t) };
            ideal * window.value(n, length)
        })
        .collect()
}
