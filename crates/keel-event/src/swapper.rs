//! Advancing many typed channels in a single step.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::channel::EventChannel;

/// Type-erased view of an [`EventChannel`], exposing only the buffer swap.
///
/// Implemented for every `EventChannel<T>`, so an [`EventSwapper`] can
/// advance channels of arbitrarily different event types without knowing
/// any of them at compile time.
pub trait SwapChannel: Send {
    /// Advance the channel by one tick.
    fn swap_buffers(&mut self);
}

impl<T: Send> SwapChannel for EventChannel<T> {
    fn swap_buffers(&mut self) {
        self.swap();
    }
}

/// Aggregates type-erased event channels and advances them together.
///
/// One swapper typically exists per simulation loop; a module that owns an
/// event channel registers a handle here so the channel participates in the
/// once-per-tick "advance all buffers" step.
#[derive(Default)]
pub struct EventSwapper {
    channels: Vec<Arc<Mutex<dyn SwapChannel>>>,
}

impl EventSwapper {
    /// Create a swapper with no registered channels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel to be advanced by [`swap_all`](Self::swap_all).
    pub fn add(&mut self, channel: Arc<Mutex<dyn SwapChannel>>) {
        self.channels.push(channel);
    }

    /// Advance every registered channel by one tick.
    pub fn swap_all(&mut self) {
        for channel in &self.channels {
            channel.lock().swap_buffers();
        }
    }

    /// Number of registered channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channels are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
