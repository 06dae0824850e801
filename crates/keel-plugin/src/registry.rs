//! Dependency resolution and lifecycle driving.

use keel_world::World;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::descriptor::{Plugin, StepCallback, StepKind};
use crate::error::PluginError;

/// Lifecycle state of a [`PluginRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// Plugins may still be added; no order exists yet.
    Unresolved,
    /// A valid topological order has been computed.
    Ordered,
    /// Init callbacks have run in resolved order.
    Initialized,
    /// Step callbacks have been handed off to an engine.
    Running,
    /// Shutdown callbacks have run in reverse resolved order.
    Shutdown,
}

/// Holds plugin descriptors and computes a dependency-consistent order.
///
/// Plugins may be added in any order; the resolver, not registration order,
/// determines execution order. An edge runs from the plugin defining a
/// capability to every plugin requiring it, and the resolved order is a
/// topological sort of that graph. Among simultaneously-ready plugins the
/// earliest-registered one is placed first, so the order is deterministic.
pub struct PluginRegistry {
    plugins: Vec<Plugin>,
    /// Indices into `plugins`, in resolved order. Empty until resolution.
    order: Vec<usize>,
    state: RegistryState,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            order: Vec::new(),
            state: RegistryState::Unresolved,
        }
    }

    /// Add a plugin descriptor. Invalidates any previously computed order.
    pub fn add(&mut self, plugin: Plugin) {
        debug!(plugin = plugin.name(), "registered plugin");
        self.plugins.push(plugin);
        self.order.clear();
        self.state = RegistryState::Unresolved;
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RegistryState {
        self.state
    }

    /// Plugin names in resolved order. Empty before resolution.
    #[must_use]
    pub fn resolved_names(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(|&idx| self.plugins[idx].name())
            .collect()
    }

    /// Compute the initialization/execution order.
    ///
    /// Builds a capability-name → defining-plugin index, turns every
    /// requirement into an edge, and runs a topological sort. A plugin that
    /// requires a capability it also defines does not depend on itself.
    ///
    /// # Errors
    ///
    /// - [`PluginError::DuplicateCapability`] if two plugins define the
    ///   same capability
    /// - [`PluginError::UnresolvedCapability`] if a requirement is defined
    ///   by no registered plugin
    /// - [`PluginError::DependencyCycle`] if the edges admit no total order
    pub fn resolve(&mut self) -> Result<(), PluginError> {
        let count = self.plugins.len();

        let mut definers: FxHashMap<&str, usize> = FxHashMap::default();
        for (idx, plugin) in self.plugins.iter().enumerate() {
            for capability in plugin.defined_capabilities() {
                if let Some(&first) = definers.get(capability.as_str()) {
                    return Err(PluginError::DuplicateCapability {
                        capability: capability.clone(),
                        first: self.plugins[first].name().to_string(),
                        second: plugin.name().to_string(),
                    });
                }
                definers.insert(capability.as_str(), idx);
            }
        }

        let mut dependents: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); count];
        let mut unmet = vec![0_usize; count];
        for (idx, plugin) in self.plugins.iter().enumerate() {
            for capability in plugin.required_capabilities() {
                let &definer = definers.get(capability.as_str()).ok_or_else(|| {
                    PluginError::UnresolvedCapability {
                        plugin: plugin.name().to_string(),
                        capability: capability.clone(),
                    }
                })?;
                if definer != idx {
                    dependents[definer].push(idx);
                    unmet[idx] += 1;
                }
            }
        }

        let mut order = Vec::with_capacity(count);
        let mut placed = vec![false; count];
        while let Some(next) = (0..count).find(|&idx| !placed[idx] && unmet[idx] == 0) {
            placed[next] = true;
            order.push(next);
            for &dependent in &dependents[next] {
                unmet[dependent] -= 1;
            }
        }

        if order.len() != count {
            let cycle = self
                .plugins
                .iter()
                .enumerate()
                .filter(|&(idx, _)| !placed[idx])
                .map(|(_, plugin)| plugin.name().to_string())
                .collect();
            return Err(PluginError::DependencyCycle { plugins: cycle });
        }

        debug!(order = ?self.names_for(&order), "resolved plugin order");
        self.order = order;
        self.state = RegistryState::Ordered;
        Ok(())
    }

    /// Run every init callback, in resolved order, against the World.
    ///
    /// # Errors
    ///
    /// [`PluginError::NotResolved`] before [`resolve`](Self::resolve);
    /// [`PluginError::Init`] if a callback fails, in which case later
    /// plugins are not initialized.
    pub fn initialize(&mut self, world: &mut World) -> Result<(), PluginError> {
        if self.state != RegistryState::Ordered {
            return Err(PluginError::NotResolved);
        }
        let order = self.order.clone();
        for idx in order {
            let plugin = &mut self.plugins[idx];
            let name = plugin.name().to_string();
            if let Some(init) = plugin.init.as_mut() {
                init(world).map_err(|reason| PluginError::Init {
                    plugin: name.clone(),
                    reason,
                })?;
            }
            info!(plugin = %name, "initialized plugin");
        }
        self.state = RegistryState::Initialized;
        Ok(())
    }

    /// Extract the per-step callbacks in resolved order, tick before frame
    /// per plugin, for wiring into an engine's step loop.
    ///
    /// # Errors
    ///
    /// [`PluginError::NotResolved`] unless the registry is initialized.
    pub fn take_step_callbacks(&mut self) -> Result<Vec<StepCallback>, PluginError> {
        if self.state != RegistryState::Initialized {
            return Err(PluginError::NotResolved);
        }
        let mut callbacks = Vec::new();
        for &idx in &self.order {
            let plugin = &mut self.plugins[idx];
            let name = plugin.name().to_string();
            if let Some(tick) = plugin.tick.take() {
                callbacks.push(StepCallback {
                    plugin: name.clone(),
                    kind: StepKind::Tick,
                    run: tick,
                });
            }
            if let Some(frame) = plugin.frame.take() {
                callbacks.push(StepCallback {
                    plugin: name,
                    kind: StepKind::Frame,
                    run: frame,
                });
            }
        }
        self.state = RegistryState::Running;
        Ok(callbacks)
    }

    /// Run every shutdown callback in reverse resolved order.
    ///
    /// # Errors
    ///
    /// [`PluginError::NotResolved`] unless initialized or running;
    /// [`PluginError::Shutdown`] if a callback fails.
    pub fn shutdown(&mut self, world: &mut World) -> Result<(), PluginError> {
        if !matches!(
            self.state,
            RegistryState::Initialized | RegistryState::Running
        ) {
            return Err(PluginError::NotResolved);
        }
        let order = self.order.clone();
        for idx in order.into_iter().rev() {
            let plugin = &mut self.plugins[idx];
            let name = plugin.name().to_string();
            if let Some(shutdown) = plugin.shutdown.as_mut() {
                shutdown(world).map_err(|reason| PluginError::Shutdown {
                    plugin: name.clone(),
                    reason,
                })?;
            }
            info!(plugin = %name, "shut down plugin");
        }
        self.state = RegistryState::Shutdown;
        Ok(())
    }

    fn names_for(&self, order: &[usize]) -> Vec<&str> {
        order.iter().map(|&idx| self.plugins[idx].name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    fn recording_plugin(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Plugin {
        let init_log = Arc::clone(log);
        let init_name = name.to_string();
        Plugin::new(name).on_init(move |_world| {
            init_log.lock().push(init_name.clone());
            Ok(())
        })
    }

    #[test]
    fn test_resolution_ignores_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));

        // Registered in reverse dependency order on purpose.
        let consumer = recording_plugin("consumer", &log)
            .requires("Middle")
            .defines("Top");
        let middle = recording_plugin("middle", &log)
            .requires("Base")
            .defines("Middle");
        let base = recording_plugin("base", &log).defines("Base");

        let mut registry = PluginRegistry::new();
        registry.add(consumer);
        registry.add(middle);
        registry.add(base);

        registry.resolve().unwrap();
        assert_eq!(registry.resolved_names(), vec!["base", "middle", "consumer"]);

        let mut world = World::new();
        registry.initialize(&mut world).unwrap();
        assert_eq!(*log.lock(), vec!["base", "middle", "consumer"]);
        assert_eq!(registry.state(), RegistryState::Initialized);
    }

    #[test]
    fn test_ready_plugins_keep_registration_order() {
        let mut registry = PluginRegistry::new();
        registry.add(Plugin::new("alpha"));
        registry.add(Plugin::new("beta"));
        registry.add(Plugin::new("gamma"));

        registry.resolve().unwrap();
        assert_eq!(registry.resolved_names(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_unresolved_capability_is_fatal_before_init() {
        let initialized = Arc::new(Mutex::new(Vec::new()));

        let mut registry = PluginRegistry::new();
        registry.add(recording_plugin("orphan", &initialized).requires("Missing"));

        let err = registry.resolve().unwrap_err();
        assert!(matches!(
            err,
            PluginError::UnresolvedCapability { ref plugin, ref capability }
                if plugin == "orphan" && capability == "Missing"
        ));
        assert!(initialized.lock().is_empty());
        assert_eq!(registry.state(), RegistryState::Unresolved);
    }

    #[test]
    fn test_duplicate_capability_definition_is_rejected() {
        let mut registry = PluginRegistry::new();
        registry.add(Plugin::new("first").defines("Positions"));
        registry.add(Plugin::new("second").defines("Positions"));

        let err = registry.resolve().unwrap_err();
        assert!(matches!(
            err,
            PluginError::DuplicateCapability { ref capability, ref first, ref second }
                if capability == "Positions" && first == "first" && second == "second"
        ));
    }

    #[test]
    fn test_dependency_cycle_is_detected() {
        let mut registry = PluginRegistry::new();
        registry.add(Plugin::new("a").defines("A").requires("B"));
        registry.add(Plugin::new("b").defines("B").requires("A"));

        let err = registry.resolve().unwrap_err();
        assert!(matches!(err, PluginError::DependencyCycle { ref plugins } if plugins.len() == 2));
    }

    #[test]
    fn test_self_satisfied_requirement_is_allowed() {
        let mut registry = PluginRegistry::new();
        registry.add(Plugin::new("solo").defines("Thing").requires("Thing"));

        registry.resolve().unwrap();
        assert_eq!(registry.resolved_names(), vec!["solo"]);
    }

    #[test]
    fn test_initialize_requires_resolution() {
        let mut registry = PluginRegistry::new();
        registry.add(Plugin::new("unready"));

        let mut world = World::new();
        assert!(matches!(
            registry.initialize(&mut world),
            Err(PluginError::NotResolved)
        ));
    }

    #[test]
    fn test_failed_init_stops_later_plugins() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut registry = PluginRegistry::new();
        registry.add(recording_plugin("ok", &log).defines("Base"));
        registry.add(
            Plugin::new("broken")
                .requires("Base")
                .defines("Broken")
                .on_init(|_world| eyre::bail!("config file missing")),
        );
        registry.add(recording_plugin("never", &log).requires("Broken"));

        registry.resolve().unwrap();
        let mut world = World::new();
        let err = registry.initialize(&mut world).unwrap_err();

        assert!(matches!(err, PluginError::Init { ref plugin, .. } if plugin == "broken"));
        assert_eq!(*log.lock(), vec!["ok"]);
    }

    #[test]
    fn test_step_callbacks_come_out_in_resolved_order() {
        let mut registry = PluginRegistry::new();
        registry.add(
            Plugin::new("render")
                .requires("Sim")
                .on_frame(|_world| Ok(())),
        );
        registry.add(
            Plugin::new("sim")
                .defines("Sim")
                .on_tick(|_world| Ok(()))
                .on_frame(|_world| Ok(())),
        );

        registry.resolve().unwrap();
        let mut world = World::new();
        registry.initialize(&mut world).unwrap();

        let callbacks = registry.take_step_callbacks().unwrap();
        let summary: Vec<_> = callbacks
            .iter()
            .map(|cb| (cb.plugin.as_str(), cb.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("sim", StepKind::Tick),
                ("sim", StepKind::Frame),
                ("render", StepKind::Frame),
            ]
        );
        assert_eq!(registry.state(), RegistryState::Running);
    }

    #[test]
    fn test_shutdown_runs_in_reverse_order() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let shutdown_plugin = |name: &str| {
            let shutdown_log = Arc::clone(&log);
            let shutdown_name = name.to_string();
            move |_world: &mut World| {
                shutdown_log.lock().push(shutdown_name.clone());
                Ok(())
            }
        };

        let mut registry = PluginRegistry::new();
        registry.add(Plugin::new("base").defines("Base").on_shutdown(shutdown_plugin("base")));
        registry.add(
            Plugin::new("consumer")
                .requires("Base")
                .on_shutdown(shutdown_plugin("consumer")),
        );

        registry.resolve().unwrap();
        let mut world = World::new();
        registry.initialize(&mut world).unwrap();
        registry.shutdown(&mut world).unwrap();

        assert_eq!(*log.lock(), vec!["consumer", "base"]);
        assert_eq!(registry.state(), RegistryState::Shutdown);
    }
}
