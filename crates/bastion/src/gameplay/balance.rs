//! # Light/Shadow Balance
//!
//! A single world-wide value in `[0, 1]`. Killing enemies shifts it toward
//! light, losing buildings toward shadow. The balance scales resource income.

use bastion_core::{EcsResult, Registry, System};

/// Balance at the start of a game.
pub const INITIAL_BALANCE: f32 = 0.5;

/// Shift toward light per enemy killed.
pub const ENEMY_KILLED_SHIFT: f32 = 0.05;

/// Shift toward shadow per building lost.
pub const BUILDING_DESTROYED_SHIFT: f32 = 0.1;

/// Tracks the light/shadow balance. Has no signature and matches nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSystem {
    balance: f32,
}

impl BalanceSystem {
    /// Creates a system at the initial balance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balance: INITIAL_BALANCE,
        }
    }

    /// Current balance, `0.0` is full shadow and `1.0` full light.
    #[inline]
    #[must_use]
    pub fn balance(&self) -> f32 {
        self.balance
    }

    /// Overwrites the balance, e.g. when loading a save.
    pub fn set_balance(&mut self, balance: f32) {
        self.balance = balance.clamp(0.0, 1.0);
    }

    /// Multiplier applied to resource income, `0.5..=1.5`.
    #[inline]
    #[must_use]
    pub fn resource_modifier(&self) -> f32 {
        0.5 + self.balance
    }

    /// Records an enemy kill.
    pub fn on_enemy_killed(&mut self) {
        self.set_balance(self.balance + ENEMY_KILLED_SHIFT);
        tracing::debug!(balance = self.balance, "light energy increased");
    }

    /// Records a lost building.
    pub fn on_building_destroyed(&mut self) {
        self.set_balance(self.balance - BUILDING_DESTROYED_SHIFT);
        tracing::debug!(balance = self.balance, "shadow energy increased");
    }

    /// Back to the initial balance.
    pub fn reset(&mut self) {
        self.balance = INITIAL_BALANCE;
    }
}

impl Default for BalanceSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BalanceSystem {
    fn update(&mut self, _registry: &mut Registry, _dt: f32) -> EcsResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "BalanceSystem"
    }
}
