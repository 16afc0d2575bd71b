//! Lifecycle of effect buffers, keyed by `(window_id, layer_id)`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use easel_common::errors::EffectError;

use crate::buffer::{AnimationBuffer, ClipPathBuffer};
use crate::clock::MonotonicClock;

type Key = (String, i32);

/// Owns every effect buffer and the shared monotonic clock. Explicitly
/// constructed and handed to the producer and consumer sides; holds no
/// global state.
///
/// Buffer handles are `Arc`s: producer and consumer keep their clones after
/// `destroy_*` and simply stop exchanging frames, so neither side ever
/// dereferences freed memory. This registry's locks guard only the lookup
/// tables — the per-frame read/write path goes straight at the buffer and
/// takes no lock here or in the window registry.
#[derive(Default)]
pub struct EffectBufferRegistry {
    clips: Mutex<HashMap<Key, Arc<ClipPathBuffer>>>,
    animations: Mutex<HashMap<Key, Arc<AnimationBuffer>>>,
    clock: MonotonicClock,
}

impl EffectBufferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(&self) -> &MonotonicClock {
        &self.clock
    }

    pub fn create_clip_buffer(
        &self,
        window_id: &str,
        layer_id: i32,
    ) -> Result<Arc<ClipPathBuffer>, EffectError> {
        let mut clips = lock(&self.clips);
        let key = (window_id.to_string(), layer_id);
        if clips.contains_key(&key) {
            return Err(EffectError::AlreadyExists {
                window_id: window_id.to_string(),
                layer_id,
            });
        }
        let buffer = Arc::new(ClipPathBuffer::default());
        clips.insert(key, Arc::clone(&buffer));
        debug!(window_id, layer_id, "clip buffer created");
        Ok(buffer)
    }

    pub fn clip_buffer(&self, window_id: &str, layer_id: i32) -> Option<Arc<ClipPathBuffer>> {
        lock(&self.clips)
            .get(&(window_id.to_string(), layer_id))
            .cloned()
    }

    pub fn destroy_clip_buffer(&self, window_id: &str, layer_id: i32) -> Result<(), EffectError> {
        lock(&self.clips)
            .remove(&(window_id.to_string(), layer_id))
            .map(|_| ())
            .ok_or_else(|| EffectError::NotFound {
                window_id: window_id.to_string(),
                layer_id,
            })
    }

    pub fn create_animation_buffer(
        &self,
        window_id: &str,
        layer_id: i32,
    ) -> Result<Arc<AnimationBuffer>, EffectError> {
        let mut animations = lock(&self.animations);
        let key = (window_id.to_string(), layer_id);
        if animations.contains_key(&key) {
            return Err(EffectError::AlreadyExists {
                window_id: window_id.to_string(),
                layer_id,
            });
        }
        let buffer = Arc::new(AnimationBuffer::default());
        animations.insert(key, Arc::clone(&buffer));
        debug!(window_id, layer_id, "animation buffer created");
        Ok(buffer)
    }

    pub fn animation_buffer(&self, window_id: &str, layer_id: i32) -> Option<Arc<AnimationBuffer>> {
        lock(&self.animations)
            .get(&(window_id.to_string(), layer_id))
            .cloned()
    }

    pub fn destroy_animation_buffer(
        &self,
        window_id: &str,
        layer_id: i32,
    ) -> Result<(), EffectError> {
        lock(&self.animations)
            .remove(&(window_id.to_string(), layer_id))
            .map(|_| ())
            .ok_or_else(|| EffectError::NotFound {
                window_id: window_id.to_string(),
                layer_id,
            })
    }

    /// Drop every buffer belonging to a window. Called when the window is
    /// destroyed.
    pub fn destroy_window_buffers(&self, window_id: &str) {
        lock(&self.clips).retain(|(id, _), _| id.as_str() != window_id);
        lock(&self.animations).retain(|(id, _), _| id.as_str() != window_id);
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
