//! The keel engine: a serial, ordered simulation loop.
//!
//! An [`Engine`] owns a [`World`](keel_world::World) and an ordered list of
//! per-step systems. Each [`step`](Engine::step) advances the clock, then
//! invokes every tick system and then every frame system exactly once, in
//! registration order. There is no internal parallelism: a tick is a single
//! ordered sequence of callback invocations, which is what makes the
//! one-tick event delay a sufficient synchronization device.
//!
//! Plugins are wired in through [`Engine::install`], which resolves a
//! [`PluginRegistry`](keel_plugin::PluginRegistry), runs init callbacks,
//! and registers each plugin's tick/frame callbacks in resolved order.

mod engine;
mod time;

pub use engine::{Engine, EngineError};
pub use time::{TIME_BINDING, Time};
