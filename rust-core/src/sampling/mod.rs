//! Multi-rate processing: fixed 4x interpolation/decimation and oversampled stages

pub mod interp_dec;
pub mod oversampled;

pub use interp_dec::{interpolation_kernel, PairedInterpolatorDecimator, RATE_FACTOR};
pub use oversampled::Oversampled;
