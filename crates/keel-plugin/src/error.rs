//! Plugin configuration and lifecycle errors.

use thiserror::Error;

/// Errors raised while resolving or driving plugins.
///
/// Configuration variants are detected during resolution, before any init
/// callback runs; none of them is retried.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Two plugins claim to define the same capability.
    #[error("capability '{capability}' defined by both '{first}' and '{second}'")]
    DuplicateCapability {
        /// The capability name.
        capability: String,
        /// Plugin that defined it first.
        first: String,
        /// Plugin that defined it again.
        second: String,
    },

    /// A plugin requires a capability no registered plugin defines.
    #[error("plugin '{plugin}' requires capability '{capability}' which no plugin defines")]
    UnresolvedCapability {
        /// The requiring plugin.
        plugin: String,
        /// The missing capability.
        capability: String,
    },

    /// The defines/requires edges form a cycle.
    #[error("dependency cycle among plugins: {plugins:?}")]
    DependencyCycle {
        /// Plugins participating in the cycle.
        plugins: Vec<String>,
    },

    /// A lifecycle operation was attempted before resolution.
    #[error("plugin registry has not been resolved")]
    NotResolved,

    /// An init callback failed.
    #[error("plugin '{plugin}' failed to initialize: {reason}")]
    Init {
        /// The failing plugin.
        plugin: String,
        /// The callback's error.
        reason: eyre::Report,
    },

    /// A shutdown callback failed.
    #[error("plugin '{plugin}' failed to shut down: {reason}")]
    Shutdown {
        /// The failing plugin.
        plugin: String,
        /// The callback's error.
        reason: eyre::Report,
    },
}
