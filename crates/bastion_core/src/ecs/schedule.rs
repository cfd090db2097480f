//! # Schedule
//!
//! Explicit per-tick execution order. Systems run in the order they were
//! added, never in an order derived from their signatures.

use std::any::type_name;

use super::registry::Registry;
use super::system::System;
use crate::error::EcsResult;

type Runner = fn(&mut Registry, f32) -> EcsResult<()>;

fn run_one<T: System>(registry: &mut Registry, dt: f32) -> EcsResult<()> {
    registry.run_system::<T>(dt)
}

/// Ordered list of systems to run each tick.
///
/// # Example
///
/// ```rust,ignore
/// let schedule = Schedule::new().with::<ResourceSystem>().with::<MovementSystem>();
/// schedule.run(&mut registry, 1.0 / 60.0)?;
/// ```
#[derive(Clone, Default)]
pub struct Schedule {
    steps: Vec<(&'static str, Runner)>,
}

impl Schedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends `T`, builder style.
    #[must_use]
    pub fn with<T: System>(mut self) -> Self {
        self.push::<T>();
        self
    }

    /// Appends `T`.
    pub fn push<T: System>(&mut self) {
        let runner: Runner = run_one::<T>;
        self.steps.push((type_name::<T>(), runner));
    }

    /// Runs every step once, in order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failing step; later steps do not run.
    pub fn run(&self, registry: &mut Registry, dt: f32) -> EcsResult<()> {
        for (name, runner) in &self.steps {
            tracing::trace!(system = *name, "schedule step");
            runner(registry, dt)?;
        }
        Ok(())
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if there are no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|(name, _)| *name)
    }
}
