//! Live streams backed by a lock-free ring buffer
//!
//! Lets samples produced on one thread (a capture callback, a network reader)
//! be driven through a filter on another. The writer marks the end of the
//! stream by closing or dropping its [`LiveSink`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

use super::{Sink, Source};

/// Flags shared by both ends
#[derive(Debug, Default)]
struct LiveState {
    writer_closed: AtomicBool,
    reader_closed: AtomicBool,
}

/// Create a connected live sink/source pair
///
/// # Arguments
/// * `capacity` - Ring buffer capacity in samples
pub fn live_stream<S>(capacity: usize) -> (LiveSink<S>, LiveSource<S>) {
    let rb = HeapRb::<S>::new(capacity);
    let (producer, consumer) = rb.split();
    let state = Arc::new(LiveState::default());

    (
        LiveSink {
            producer,
            state: Arc::clone(&state),
        },
        LiveSource {
            consumer,
            state,
            finished: false,
        },
    )
}

/// Producer end of a live stream
pub struct LiveSink<S> {
    producer: HeapProducer<S>,
    state: Arc<LiveState>,
}

impl<S> LiveSink<S> {
    /// Try to push one sample without waiting
    ///
    /// # Returns
    /// `false` if the buffer is full (the sample is dropped)
    pub fn try_push(&mut self, sample: S) -> bool {
        self.producer.push(sample).is_ok()
    }

    /// Number of free slots
    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }

    /// Mark the end of the stream
    ///
    /// The reader still receives every sample pushed before closing.
    pub fn close(self) {
        // Drop does the work
    }
}

impl<S: Copy> LiveSink<S> {
    /// Write as many samples as fit
    ///
    /// # Returns
    /// Number of samples actually written (may be less if the buffer is full)
    pub fn write(&mut self, samples: &[S]) -> usize {
        self.producer.push_slice(samples)
    }
}

impl<S> Sink<S> for LiveSink<S> {
    /// Blocks (spinning) while the buffer is full
    ///
    /// Samples written after the reader has gone away are discarded.
    fn write_next(&mut self, sample: S) {
        let mut pending = sample;
        loop {
            match self.producer.push(pending) {
                Ok(()) => return,
                Err(rejected) => {
                    if self.state.reader_closed.load(Ordering::Acquire) {
                        tracing::trace!("live reader closed, discarding sample");
                        return;
                    }
                    pending = rejected;
                    std::thread::yield_now();
                }
            }
        }
    }
}

impl<S> Drop for LiveSink<S> {
    fn drop(&mut self) {
        self.state.writer_closed.store(true, Ordering::Release);
    }
}

/// Consumer end of a live stream
pub struct LiveSource<S> {
    consumer: HeapConsumer<S>,
    state: Arc<LiveState>,
    finished: bool,
}

impl<S> LiveSource<S> {
    /// Number of samples ready to read
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }
}

impl<S> Source<S> for LiveSource<S> {
    /// Waits (spinning) for the next sample
    ///
    /// Returns `None` once the sink is closed and every sample it pushed has
    /// been read, and keeps returning `None` afterwards.
    fn read_next(&mut self) -> Option<S> {
        if self.finished {
            return None;
        }
        loop {
            if let Some(sample) = self.consumer.pop() {
                return Some(sample);
            }
            if self.state.writer_closed.load(Ordering::Acquire) {
                // Pushes that happened before the close are visible now
                let last = self.consumer.pop();
                self.finished = last.is_none();
                return last;
            }
            std::thread::yield_now();
        }
    }
}

impl<S> Drop for LiveSource<S> {
    fn drop(&mut self) {
        self.state.reader_closed.store(true, Ordering::Release);
    }
}
