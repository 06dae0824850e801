//! The step loop.

use std::sync::Arc;

use keel_plugin::{PluginError, PluginFn, PluginRegistry, StepKind};
use keel_world::World;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, trace};

use crate::time::{TIME_BINDING, Time};

/// Engine failures.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Plugin resolution or lifecycle failed while installing a registry.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// A system returned an error, terminating the step. No retry or
    /// rollback is attempted; partial-tick state is not a supported notion.
    #[error("system '{system}' failed: {reason}")]
    System {
        /// The failing system's name.
        system: String,
        /// The callback's error.
        reason: eyre::Report,
    },
}

/// A named per-step callback.
struct System {
    name: String,
    run: PluginFn,
}

/// Owns a World and drives the simulation in discrete steps.
pub struct Engine {
    world: World,
    time: Arc<Mutex<Time>>,
    tick_systems: Vec<System>,
    frame_systems: Vec<System>,
    /// Kept after install so shutdown callbacks can run in reverse order.
    registry: Option<PluginRegistry>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with an empty World and the clock bound under
    /// [`TIME_BINDING`].
    #[must_use]
    pub fn new() -> Self {
        let mut world = World::new();
        let time = Arc::new(Mutex::new(Time::default()));
        let key = world.register(TIME_BINDING);
        world
            .bind(key, Arc::clone(&time))
            .expect("freshly registered key is valid");
        Self {
            world,
            time,
            tick_systems: Vec::new(),
            frame_systems: Vec::new(),
            registry: None,
        }
    }

    /// The owned World.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the owned World.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// A handle to the engine clock.
    #[must_use]
    pub fn time(&self) -> Arc<Mutex<Time>> {
        Arc::clone(&self.time)
    }

    /// Append a tick system. Ordering is the caller's responsibility;
    /// [`install`](Self::install) appends in plugin-resolved order.
    pub fn add_tick_system(
        &mut self,
        name: impl Into<String>,
        run: impl FnMut(&mut World) -> eyre::Result<()> + Send + 'static,
    ) {
        self.tick_systems.push(System {
            name: name.into(),
            run: Box::new(run),
        });
    }

    /// Append a frame system; frame systems run after all tick systems
    /// within a step.
    pub fn add_frame_system(
        &mut self,
        name: impl Into<String>,
        run: impl FnMut(&mut World) -> eyre::Result<()> + Send + 'static,
    ) {
        self.frame_systems.push(System {
            name: name.into(),
            run: Box::new(run),
        });
    }

    /// Resolve a plugin registry, run its init callbacks against the owned
    /// World, and wire its tick/frame callbacks into the step loop in
    /// resolved order.
    ///
    /// # Errors
    ///
    /// Any [`PluginError`] from resolution or initialization; nothing is
    /// wired if resolution fails, and no later plugin is initialized after
    /// a failing one.
    pub fn install(&mut self, mut registry: PluginRegistry) -> Result<(), EngineError> {
        registry.resolve()?;
        registry.initialize(&mut self.world)?;
        for callback in registry.take_step_callbacks()? {
            let system = System {
                name: callback.plugin,
                run: callback.run,
            };
            match callback.kind {
                StepKind::Tick => self.tick_systems.push(system),
                StepKind::Frame => self.frame_systems.push(system),
            }
        }
        debug!(
            ticks = self.tick_systems.len(),
            frames = self.frame_systems.len(),
            "installed plugin registry"
        );
        self.registry = Some(registry);
        Ok(())
    }

    /// Advance the simulation by one step: update the clock, then run every
    /// tick system and every frame system once, in order. The first failing
    /// system terminates the step.
    pub fn step(&mut self, delta_seconds: f64) -> Result<(), EngineError> {
        let tick = {
            let mut time = self.time.lock();
            time.delta_seconds = delta_seconds;
            time.elapsed_seconds += delta_seconds;
            time.tick += 1;
            time.tick
        };

        for system in &mut self.tick_systems {
            (system.run)(&mut self.world).map_err(|reason| EngineError::System {
                system: system.name.clone(),
                reason,
            })?;
        }
        for system in &mut self.frame_systems {
            (system.run)(&mut self.world).map_err(|reason| EngineError::System {
                system: system.name.clone(),
                reason,
            })?;
        }

        trace!(tick, "step complete");
        Ok(())
    }

    /// Run plugin shutdown callbacks in reverse resolved order.
    ///
    /// # Errors
    ///
    /// A [`PluginError::Shutdown`] from the first failing callback.
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        if let Some(mut registry) = self.registry.take() {
            registry.shutdown(&mut self.world)?;
        }
        Ok(())
    }
}
