//! Plugin descriptors.

use std::fmt;

use keel_world::World;

/// A lifecycle callback. Receives the World so the plugin can register,
/// bind, and look up state; a returned error aborts the surrounding
/// lifecycle operation.
pub type PluginFn = Box<dyn FnMut(&mut World) -> eyre::Result<()> + Send>;

/// Which step phase a callback runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Fixed-step simulation work.
    Tick,
    /// Per-frame work; runs after all tick callbacks within a step.
    Frame,
}

/// A per-step callback extracted from a resolved registry, ready to be
/// wired into an engine in resolved order.
pub struct StepCallback {
    /// Name of the plugin the callback belongs to.
    pub plugin: String,
    /// Phase the callback runs in.
    pub kind: StepKind,
    /// The callback itself.
    pub run: PluginFn,
}

/// Descriptor for one independently developed module.
///
/// Built with a fluent API; all four lifecycle callbacks are optional:
///
/// ```
/// use keel_plugin::Plugin;
///
/// let plugin = Plugin::new("physics")
///     .defines("RigidBodies")
///     .requires("EntityTable")
///     .on_init(|_world| Ok(()))
///     .on_tick(|_world| Ok(()));
/// assert_eq!(plugin.name(), "physics");
/// ```
pub struct Plugin {
    name: String,
    defines: Vec<String>,
    requires: Vec<String>,
    pub(crate) init: Option<PluginFn>,
    pub(crate) tick: Option<PluginFn>,
    pub(crate) frame: Option<PluginFn>,
    pub(crate) shutdown: Option<PluginFn>,
}

impl Plugin {
    /// Create a descriptor with no capabilities and no callbacks.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            defines: Vec::new(),
            requires: Vec::new(),
            init: None,
            tick: None,
            frame: None,
            shutdown: None,
        }
    }

    /// Declare a capability this plugin defines (provides).
    #[must_use]
    pub fn defines(mut self, capability: impl Into<String>) -> Self {
        self.defines.push(capability.into());
        self
    }

    /// Declare a capability this plugin requires (consumes).
    #[must_use]
    pub fn requires(mut self, capability: impl Into<String>) -> Self {
        self.requires.push(capability.into());
        self
    }

    /// Set the init callback, run once in resolved order.
    #[must_use]
    pub fn on_init(
        mut self,
        f: impl FnMut(&mut World) -> eyre::Result<()> + Send + 'static,
    ) -> Self {
        self.init = Some(Box::new(f));
        self
    }

    /// Set the tick callback, run every step in resolved order.
    #[must_use]
    pub fn on_tick(
        mut self,
        f: impl FnMut(&mut World) -> eyre::Result<()> + Send + 'static,
    ) -> Self {
        self.tick = Some(Box::new(f));
        self
    }

    /// Set the frame callback, run every step after all tick callbacks.
    #[must_use]
    pub fn on_frame(
        mut self,
        f: impl FnMut(&mut World) -> eyre::Result<()> + Send + 'static,
    ) -> Self {
        self.frame = Some(Box::new(f));
        self
    }

    /// Set the shutdown callback, run once in reverse resolved order.
    #[must_use]
    pub fn on_shutdown(
        mut self,
        f: impl FnMut(&mut World) -> eyre::Result<()> + Send + 'static,
    ) -> Self {
        self.shutdown = Some(Box::new(f));
        self
    }

    /// The plugin's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capabilities this plugin defines.
    #[must_use]
    pub fn defined_capabilities(&self) -> &[String] {
        &self.defines
    }

    /// Capabilities this plugin requires.
    #[must_use]
    pub fn required_capabilities(&self) -> &[String] {
        &self.requires
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("defines", &self.defines)
            .field("requires", &self.requires)
            .field("init", &self.init.is_some())
            .field("tick", &self.tick.is_some())
            .field("frame", &self.frame.is_some())
            .field("shutdown", &self.shutdown.is_some())
            .finish()
    }
}
