//! The engine clock, reachable by plugins through the World.

/// Capability name the engine binds its clock under.
pub const TIME_BINDING: &str = "Time";

/// Simulation time, updated at the start of every step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    /// Seconds covered by the current step.
    pub delta_seconds: f64,
    /// Seconds elapsed since the engine was created.
    pub elapsed_seconds: f64,
    /// Number of completed and in-progress steps.
    pub tick: u64,
}
