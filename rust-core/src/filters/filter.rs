//! Common single-input single-output filter contract

/// A stateful filter advancing one sample per call
///
/// Implemented by every filter kind so the drive loop in
/// [`crate::stream::process`] is written once.
pub trait Filter<S: Copy> {
    /// Compute the output for `input` and advance the internal state by one sample
    fn next(&mut self, input: S) -> S;

    /// Number of zero-input samples needed after the input ends to observe the
    /// full response
    ///
    /// Exact for FIR filters. For recursive filters this is the length of one
    /// pass through the longest delay path; callers wanting a longer tail use
    /// [`crate::stream::process_with_transients`].
    fn transient_len(&self) -> usize;

    /// Clear all internal state (delay lines, previous outputs)
    fn reset(&mut self);

    /// Process a block in-place
    fn process_block_inplace(&mut self, buffer: &mut [S]) {
        for sample in buffer.iter_mut() {
            *sample = self.next(*sample);
        }
    }
}

impl<S: Copy, F: Filter<S> + ?Sized> Filter<S> for Box<F> {
    fn next(&mut self, input: S) -> S {
        (**self).next(input)
    }

    fn transient_len(&self) -> usize {
        (**self).transient_len()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
