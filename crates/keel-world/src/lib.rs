//! The World: a name-keyed, type-checked registry of module-owned state.
//!
//! Independently developed plugins cannot link against each other's types,
//! so they exchange state through the World instead: a module registers a
//! capability name, binds a shared handle to its own state under the
//! resulting key, and other modules look the handle up by key, downcasting
//! back to the concrete type. A failed downcast or a lookup of an unbound
//! key is a loud error, never a silent alias of memory as the wrong type.
//!
//! State lives in `Arc<parking_lot::Mutex<T>>`; the World owns one handle
//! and hands out clones, tying the state's lifetime to the engine run
//! rather than to any static storage duration.

mod registry;

pub use registry::{BindingKey, World, WorldError};
