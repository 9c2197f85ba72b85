//! Scalar sample types
//!
//! Every buffer and coefficient of one filter instance shares a single sample
//! type, chosen at construction. Real (`f32`, `f64`) and complex
//! (`Complex<f32>`, `Complex<f64>`) samples are supported.

use std::fmt::Debug;

use ndarray::LinalgScalar;
use num_complex::Complex;
use num_traits::NumAssign;

/// Scalar type processed by filters and streams
pub trait Sample: LinalgScalar + NumAssign + Debug + Send + Sync {
    /// Build a sample from a real value (imaginary part zero)
    fn from_f64(value: f64) -> Self;

    /// Absolute value (modulus for complex samples)
    fn magnitude(self) -> f64;

    /// Widen to double precision complex for frequency-domain work
    fn to_complex(self) -> Complex<f64>;

    /// Narrow back from double precision complex
    ///
    /// Real sample types keep the real part only.
    fn from_complex(value: Complex<f64>) -> Self;
}

impl Sample for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.abs()
    }

    #[inline]
    fn to_complex(self) -> Complex<f64> {
        Complex::new(self, 0.0)
    }

    #[inline]
    fn from_complex(value: Complex<f64>) -> Self {
        value.re
    }
}

impl Sample for f32 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.abs() as f64
    }

    #[inline]
    fn to_complex(self) -> Complex<f64> {
        Complex::new(self as f64, 0.0)
    }

    #[inline]
    fn from_complex(value: Complex<f64>) -> Self {
        value.re as f32
    }
}

impl Sample for Complex<f64> {
    #[inline]
    fn from_f64(value: f64) -> Self {
        Complex::new(value, 0.0)
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.norm()
    }

    #[inline]
    fn to_complex(self) -> Complex<f64> {
        self
    }

    #[inline]
    fn from_complex(value: Complex<f64>) -> Self {
        value
    }
}

impl Sample for Complex<f32> {
    #[inline]
    fn from_f64(value: f64) -> Self {
        Complex::new(value as f32, 0.0)
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.norm() as f64
    }

    #[inline]
    fn to_complex(self) -> Complex<f64> {
        Complex::new(self.re as f64, self.im as f64)
    }

    #[inline]
    fn from_complex(value: Complex<f64>) -> Self {
        Complex::new(value.re as f32, value.im as f32)
    }
}
