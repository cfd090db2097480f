//! # Resource Income

use bastion_core::{EcsResult, Registry, System};

use super::balance::BalanceSystem;
use super::components::ResourceGenerator;

/// Banks income from every [`ResourceGenerator`], scaled by the balance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSystem {
    resources: f64,
}

impl ResourceSystem {
    /// Creates a system holding `starting` resources.
    #[must_use]
    pub fn new(starting: f64) -> Self {
        Self { resources: starting }
    }

    /// Resources currently banked.
    #[inline]
    #[must_use]
    pub fn resources(&self) -> f64 {
        self.resources
    }

    /// Deducts `amount` if affordable.
    ///
    /// Returns false, spending nothing, when the bank holds less than `amount`.
    pub fn spend(&mut self, amount: f64) -> bool {
        if self.resources < amount {
            return false;
        }
        self.resources -= amount;
        tracing::debug!(amount, remaining = self.resources, "spent resources");
        true
    }

    /// Adds `amount` to the bank.
    pub fn add(&mut self, amount: f64) {
        self.resources += amount;
    }

    /// Replaces the bank with `starting`.
    pub fn reset(&mut self, starting: f64) {
        self.resources = starting;
    }
}

impl System for ResourceSystem {
    fn update(&mut self, registry: &mut Registry, dt: f32) -> EcsResult<()> {
        let modifier = registry.get_system::<BalanceSystem>()?.resource_modifier();

        let mut income = 0.0_f64;
        for &entity in registry.system_entities::<Self>()? {
            let generator = registry.get_component::<ResourceGenerator>(entity)?;
            income += f64::from(generator.per_second * modifier * dt);
        }
        self.resources += income;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ResourceSystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::Signature;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        let generator = registry.register_component::<ResourceGenerator>().unwrap();
        registry.register_system(BalanceSystem::new()).unwrap();
        registry.register_system(ResourceSystem::new(0.0)).unwrap();
        registry
            .set_system_signature::<ResourceSystem>(Signature::EMPTY.with(generator))
            .unwrap();
        registry
    }

    #[test]
    fn test_spend() {
        let mut resources = ResourceSystem::new(100.0);
        assert!(resources.spend(60.0));
        assert!(!resources.spend(60.0));
        assert!((resources.resources() - 40.0).abs() < 1e-9);
        resources.add(20.0);
        assert!(resources.spend(60.0));
        assert_eq!(resources.resources(), 0.0);
    }

    #[test]
    fn test_income_scales_with_balance() {
        let mut registry = registry();
        for _ in 0..2 {
            let node = registry.create_entity().unwrap();
            registry
                .add_component(node, ResourceGenerator { per_second: 2.0 })
                .unwrap();
        }

        // Neutral balance: 2 nodes * 2/s * 1.0 * 1s
        registry.run_system::<ResourceSystem>(1.0).unwrap();
        let banked = registry.get_system::<ResourceSystem>().unwrap().resources();
        assert!((banked - 4.0).abs() < 1e-6);

        registry.get_system_mut::<BalanceSystem>().unwrap().set_balance(1.0);
        registry.run_system::<ResourceSystem>(1.0).unwrap();
        let banked = registry.get_system::<ResourceSystem>().unwrap().resources();
        assert!((banked - 10.0).abs() < 1e-6);
    }
}
