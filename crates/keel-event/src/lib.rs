//! Double-buffered event channels.
//!
//! An [`EventChannel`] holds two buffers: events are emitted into the
//! *current* buffer and read from the *previous* one. A [`swap`] moves
//! current into previous, so every event becomes visible exactly one tick
//! after it was emitted. This lets a consumer system observe a producer
//! system's prior output even when both run in the same ordered pass,
//! without any read-after-write hazard inside a single tick.
//!
//! [`EventSwapper`] advances an arbitrary number of differently-typed
//! channels together, once per tick, through the [`SwapChannel`] trait.
//!
//! [`swap`]: EventChannel::swap

mod channel;
mod swapper;

pub use channel::EventChannel;
pub use swapper::{EventSwapper, SwapChannel};
