//! Plugin descriptors and dependency-ordered composition.
//!
//! A plugin is an independently developed module described by a name, the
//! capability names it *defines*, the capability names it *requires*, and
//! up to four optional lifecycle callbacks (init, tick, frame, shutdown).
//! The [`PluginRegistry`] turns the defines/requires sets into a dependency
//! graph, computes a topological order, and drives the lifecycle callbacks
//! against a [`World`](keel_world::World) in that order, so a plugin that
//! defines a capability always runs before every plugin requiring it.
//!
//! Configuration errors (a required capability nobody defines, the same
//! capability defined twice, a dependency cycle) are detected during
//! resolution and reported before any init callback runs.

mod descriptor;
mod error;
mod registry;

pub use descriptor::{Plugin, PluginFn, StepCallback, StepKind};
pub use error::PluginError;
pub use registry::{PluginRegistry, RegistryState};
