//! FFT convolution engine
//!
//! [`DftConvolver`] convolves one block at a time; [`OverlapAddConvolver`]
//! strings blocks together into a streaming FIR filter whose cost per sample
//! grows with the log of the kernel length instead of linearly.

pub mod dft;
pub mod overlap_add;
pub mod response;

pub use dft::DftConvolver;
pub use overlap_add::OverlapAddConvolver;
pub use response::{bin_frequency, magnitude_response_db};
