//! Window functions for windowed-sinc kernel design

use std::f64::consts::PI;

/// Window applied to a truncated ideal impulse response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    /// `0.5 - 0.5 cos(2πn/(M-1))`, ~44 dB sidelobes
    Hann,
    /// `0.54 - 0.46 cos(2πn/(M-1))`, ~53 dB sidelobes
    Hamming,
    /// `0.42 - 0.5 cos(2πn/(M-1)) + 0.08 cos(4πn/(M-1))`, ~74 dB sidelobes
    Blackman,
    /// Plain truncation, ~21 dB sidelobes
    Rectangular,
}

impl WindowType {
    /// Mainlobe width in units of `π/M`
    pub fn mainlobe_factor(&self) -> f64 {
        match self {
            WindowType::Hann | WindowType::Hamming => 8.0,
            WindowType::Blackman => 12.0,
            WindowType::Rectangular => 4.0,
        }
    }

    /// Approximate peak stopband level of a kernel designed with this window (dB)
    pub fn stopband_attenuation_db(&self) -> f64 {
        match self {
            WindowType::Hann => -44.0,
            WindowType::Hamming => -53.0,
            WindowType::Blackman => -74.0,
            WindowType::Rectangular => -21.0,
        }
    }

    /// Kernel length needed for a transition band of `transition_width` radians
    ///
    /// Always odd, so the kernel has an integer group delay.
    pub fn kernel_length(&self, transition_width: f64) -> usize {
        let m = (self.mainlobe_factor() * PI / transition_width).ceil() as usize;
        m | 1
    }

    /// Window value at index `n` of a length `length` window
    #[inline]
    pub fn value(&self, n: usize, length: usize) -> f64 {
        if length < 2 {
            return 1.0;
        }
        let phase = 2.0 * PI * n as f64 / (length - 1) as f64;
        match self {
            WindowType::Hann => 0.5 - 0.5 * phase.cos(),
            WindowType::Hamming => 0.54 - 0.46 * phase.cos(),
            WindowType::Blackman => 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos(),
            WindowType::Rectangular => 1.0,
        }
    }

    /// All `length` window values
    pub fn generate(&self, length: usize) -> Vec<f64> {
        (0..length).map(|n| self.value(n, length)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_length_is_odd() {
        let width = PI / 64.0;
        assert_eq!(WindowType::Blackman.kernel_length(width), 769);
        assert_eq!(WindowType::Hann.kernel_length(width), 513);
        assert_eq!(WindowType::Rectangular.kernel_length(width), 257);
        assert_eq!(WindowType::Hamming.kernel_length(0.05 * PI) % 2, 1);
    }

    #[test]
    fn test_windows_are_symmetric_with_unit_peak() {
        let length = 101;
        for window in [WindowType::Hann, WindowType::Hamming, WindowType::Blackman] {
            let w = window.generate(length);
            for i in 0..length / 2 {
                assert!((w[i] - w[length - 1 - i]).abs() < 1e-12, "{:?}", window);
            }
            assert!((w[length / 2] - 1.0).abs() < 1e-12, "{:?}", window);
        }
    }

    #[test]
    fn test_window_endpoints() {
        let hamming = WindowType::Hamming.generate(33);
        assert!((hamming[0] - 0.08).abs() < 1e-12);

        let blackman = WindowType::Blackman.generate(33);
        assert!(blackman[0].abs() < 1e-12);

        assert!(WindowType::Rectangular.generate(7).iter().all(|&w| w == 1.0));
        assert_eq!(WindowType::Blackman.generate(1), vec![1.0]);
    }
}
