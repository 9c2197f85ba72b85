//! Fixed-capacity circular delay buffer
//!
//! Write-then-advance semantics: every push overwrites the oldest retained
//! value and moves the cursor forward modulo the capacity. The slot under the
//! cursor therefore always holds the value pushed `capacity` writes ago.

use crate::error::{FilterError, Result};

/// Circular buffer of the last `capacity` pushed values
#[derive(Debug, Clone)]
pub struct DelayBuffer<T> {
    buffer: Vec<T>,
    cursor: usize,
    fill: T,
}

impl<T: Copy> DelayBuffer<T> {
    /// Create a buffer pre-filled with `fill`
    ///
    /// # Arguments
    /// * `capacity` - Number of retained values (the longest readable delay)
    /// * `fill` - Initial value of every slot (zero for signals)
    pub fn new(capacity: usize, fill: T) -> Result<Self> {
        if capacity == 0 {
            return Err(FilterError::InvalidDelay { delay: capacity });
        }
        Ok(Self {
            buffer: vec![fill; capacity],
            cursor: 0,
            fill,
        })
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Current write position, always in `[0, capacity)`
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Write a value and advance the cursor
    #[inline]
    pub fn push(&mut self, value: T) {
        self.buffer[self.cursor] = value;
        self.cursor = (self.cursor + 1) % self.buffer.len();
    }

    /// Value pushed `delay` writes ago
    ///
    /// # Panics
    /// Panics unless `1 <= delay <= capacity`.
    #[inline]
    pub fn tap(&self, delay: usize) -> T {
        assert!(
            delay >= 1 && delay <= self.buffer.len(),
            "delay {} outside [1, {}]",
            delay,
            self.buffer.len()
        );
        let len = self.buffer.len();
        self.buffer[(self.cursor + len - delay) % len]
    }

    /// Checked version of [`DelayBuffer::tap`]
    pub fn get(&self, delay: usize) -> Option<T> {
        if delay >= 1 && delay <= self.buffer.len() {
            Some(self.tap(delay))
        } else {
            None
        }
    }

    /// Value pushed `capacity` writes ago (the next one to be overwritten)
    #[inline]
    pub fn oldest(&self) -> T {
        self.buffer[self.cursor]
    }

    /// Read the oldest value, then push `value` in its place
    #[inline]
    pub fn replace(&mut self, value: T) -> T {
        let oldest = self.oldest();
        self.push(value);
        oldest
    }

    /// Refill with the initial value and rewind the cursor
    pub fn reset(&mut self) {
        self.buffer.fill(self.fill);
        self.cursor = 0;
    }
}
