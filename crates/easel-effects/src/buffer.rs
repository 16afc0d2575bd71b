//! Versioned single-writer/single-reader payload cells.
//!
//! The write protocol publishes a monotonically increasing sequence only
//! after the payload is fully written; the reader validates the sequence on
//! both sides of its copy and reports a torn read instead of surfacing a
//! half-written payload. Producer and consumer never block each other; a
//! dropped intermediate frame is fine, a corrupted one is not.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::payload::{AnimationData, ClipPathData};

pub type ClipPathBuffer = EffectBuffer<ClipPathData>;
pub type AnimationBuffer = EffectBuffer<AnimationData>;

/// A seqlock cell for one `(window, layer)` effect channel.
///
/// The sequence is odd while a write is in flight and even once published;
/// `sequence() == seq / 2` counts completed writes. Exactly one producer
/// thread may call [`EffectBuffer::write`]; any number of consumer threads
/// may call [`EffectBuffer::try_read`].
pub struct EffectBuffer<T: Copy> {
    seq: AtomicU64,
    value: UnsafeCell<T>,
}

impl<T: Copy> std::fmt::Debug for EffectBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectBuffer")
            .field("sequence", &self.sequence())
            .finish_non_exhaustive()
    }
}

// Readers copy the value out and discard the copy on a torn sequence check,
// so sharing the cell across threads is sound for Copy payloads with the
// acquire/release pairs below.
unsafe impl<T: Copy + Send> Sync for EffectBuffer<T> {}
unsafe impl<T: Copy + Send> Send for EffectBuffer<T> {}

impl<T: Copy + Default> Default for EffectBuffer<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Copy> EffectBuffer<T> {
    pub fn new(initial: T) -> Self {
        Self {
            seq: AtomicU64::new(0),
            value: UnsafeCell::new(initial),
        }
    }

    /// Number of completed writes.
    pub fn sequence(&self) -> u64 {
        self.seq.load(Ordering::Acquire) / 2
    }

    /// Publish a new payload. Producer side only — one writer at a time.
    pub fn write(&self, value: T) {
        let seq = self.seq.load(Ordering::Relaxed);
        // Odd: write in progress.
        self.seq.store(seq + 1, Ordering::Release);
        unsafe { std::ptr::write_volatile(self.value.get(), value) };
        // Even: published.
        self.seq.store(seq + 2, Ordering::Release);
    }

    /// Copy out the latest published payload with its write sequence.
    ///
    /// Returns `None` when the copy raced a write (torn); the caller keeps
    /// whatever it read last time. Never blocks and never spins.
    pub fn try_read(&self) -> Option<(u64, T)> {
        let before = self.seq.load(Ordering::Acquire);
        if before % 2 == 1 {
            return None;
        }
        let value = unsafe { std::ptr::read_volatile(self.value.get()) };
        let after = self.seq.load(Ordering::Acquire);
        if before == after {
            Some((before / 2, value))
        } else {
            None
        }
    }

    /// Retry `try_read` until it lands. Test/setup convenience; the
    /// compositor path uses `try_read` and skips torn frames.
    pub fn read_latest(&self) -> (u64, T) {
        loop {
            if let Some(read) = self.try_read() {
                return read;
            }
            std::hint::spin_loop();
        }
    }
}
