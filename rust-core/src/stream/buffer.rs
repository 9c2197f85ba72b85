//! Buffer-backed stream adapters
//!
//! Adapts owned vectors, borrowed slices and closures to [`Source`] / [`Sink`].

use super::{Sink, Source};

/// Source that owns its samples
#[derive(Debug, Clone)]
pub struct VecSource<S> {
    samples: Vec<S>,
    position: usize,
}

impl<S: Copy> VecSource<S> {
    pub fn new(samples: Vec<S>) -> Self {
        Self { samples, position: 0 }
    }

    /// Number of samples not read yet
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.position
    }

    /// Total number of samples held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<S: Copy> Source<S> for VecSource<S> {
    fn read_next(&mut self) -> Option<S> {
        let sample = self.samples.get(self.position).copied()?;
        self.position += 1;
        Some(sample)
    }
}

/// Source reading from a borrowed slice
#[derive(Debug, Clone)]
pub struct SliceSource<'a, S> {
    samples: &'a [S],
    position: usize,
}

impl<'a, S: Copy> SliceSource<'a, S> {
    pub fn new(samples: &'a [S]) -> Self {
        Self { samples, position: 0 }
    }

    /// Number of samples not read yet
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.position
    }
}

impl<S: Copy> Source<S> for SliceSource<'_, S> {
    fn read_next(&mut self) -> Option<S> {
        let sample = self.samples.get(self.position).copied()?;
        self.position += 1;
        Some(sample)
    }
}

/// Source pulling from a closure
///
/// Fused: once the closure returns `None` it is never called again.
pub struct FnSource<F> {
    f: F,
    finished: bool,
}

impl<F> FnSource<F> {
    pub fn new(f: F) -> Self {
        Self { f, finished: false }
    }
}

impl<S, F: FnMut() -> Option<S>> Source<S> for FnSource<F> {
    fn read_next(&mut self) -> Option<S> {
        if self.finished {
            return None;
        }
        let sample = (self.f)();
        self.finished = sample.is_none();
        sample
    }
}

/// Growable sink collecting every written sample
#[derive(Debug, Clone, Default)]
pub struct VecSink<S> {
    samples: Vec<S>,
}

impl<S> VecSink<S> {
    pub fn new() -> Self {
        Self { samples: Vec::new() }
    }

    /// Create a sink with room for `capacity` samples before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self { samples: Vec::with_capacity(capacity) }
    }

    /// Samples written so far
    pub fn samples(&self) -> &[S] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.samples
    }
}

impl<S> Sink<S> for VecSink<S> {
    fn write_next(&mut self, sample: S) {
        self.samples.push(sample);
    }
}

/// Fixed-capacity sink writing into a borrowed slice
///
/// # Panics
/// Writing more samples than the slice holds panics.
#[derive(Debug)]
pub struct SliceSink<'a, S> {
    buffer: &'a mut [S],
    position: usize,
}

impl<'a, S> SliceSink<'a, S> {
    pub fn new(buffer: &'a mut [S]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Number of samples written so far
    pub fn written(&self) -> usize {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

impl<S> Sink<S> for SliceSink<'_, S> {
    fn write_next(&mut self, sample: S) {
        assert!(
            self.position < self.buffer.len(),
            "SliceSink overflow: capacity is {} samples",
            self.buffer.len()
        );
        self.buffer[self.position] = sample;
        self.position += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    #[test]
    fn test_vec_source_exhausts_permanently() {
        let mut source = VecSource::new(vec![1, 2, 3, 4]);
        let mut out = Vec::new();
        while let Some(x) = source.read_next() {
            out.push(x);
        }
        assert_eq!(out, vec![1, 2, 3, 4]);
        assert_eq!(source.read_next(), None);
        assert_eq!(source.read_next(), None);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_complex_slice_source() {
        let data = [Complex::new(1.0, 0.0), Complex::new(2.0, 0.0)];
        let mut source = SliceSource::new(&data);
        assert_eq!(source.read_next(), Some(Complex::new(1.0, 0.0)));
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.read_next(), Some(Complex::new(2.0, 0.0)));
        assert_eq!(source.read_next(), None);
    }

    #[test]
    fn test_fn_source_is_fused() {
        let mut calls = 0;
        let mut source = FnSource::new(|| {
            calls += 1;
            if calls <= 2 { Some(calls as f64) } else { None }
        });
        assert_eq!(source.read_next(), Some(1.0));
        assert_eq!(source.read_next(), Some(2.0));
        assert_eq!(source.read_next(), None);
        assert_eq!(source.read_next(), None);
        drop(source);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_sinks_preserve_order() {
        let mut grow = VecSink::with_capacity(2);
        let mut fixed_buf = [0.0; 4];
        let mut fixed = SliceSink::new(&mut fixed_buf);

        for x in [1.0, 2.0, 3.0, 4.0] {
            grow.write_next(x);
            fixed.write_next(x);
        }
        assert_eq!(fixed.written(), 4);
        assert_eq!(grow.into_inner(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(fixed_buf, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    #[should_panic(expected = "SliceSink overflow")]
    fn test_slice_sink_overflow_panics() {
        let mut buf = [0.0; 1];
        let mut sink = SliceSink::new(&mut buf);
        sink.write_next(1.0);
        sink.write_next(2.0);
    }
}
