//! Demo component definitions.
//!
//! These show how a component crate plugs into the registry: implement
//! [`Component`] for each type, optionally override its per-frame rule, and
//! expose a [`register`] function that queues every type on a
//! [`RegistryBuilder`].

use engine_component::{Component, Frame};
use engine_system::RegistryBuilder;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Queue every demo component type, in update order.
#[must_use]
pub fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register::<Position>()
        .register::<Velocity>()
        .register::<Health>()
        .register::<Name>()
}

/// A point in world space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec3);

impl Position {
    /// The world origin.
    pub const ORIGIN: Self = Self(Vec3::ZERO);

    /// Create a new position.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// A 3D velocity that decays over time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Velocity {
    /// Linear velocity in world units per second.
    pub linear: Vec3,
    /// Fraction of the velocity lost per second, in `[0, 1]`.
    pub damping: f32,
}

impl Velocity {
    /// Zero velocity.
    pub const ZERO: Self = Self {
        linear: Vec3::ZERO,
        damping: 0.0,
    };

    /// Create an undamped velocity.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            linear: Vec3::new(x, y, z),
            damping: 0.0,
        }
    }

    /// Set the per-second damping factor.
    #[must_use]
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(0.0, 1.0);
        self
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }

    fn update(&mut self, frame: &Frame) {
        self.linear *= (1.0 - self.damping * frame.dt).max(0.0);
    }
}

/// A health component with current and maximum hit points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Health {
    /// Current hit points.
    pub current: f32,
    /// Maximum hit points.
    pub max: f32,
    /// Hit points regained per second.
    pub regen: f32,
}

impl Health {
    /// Create a new health component at full HP with no regeneration.
    #[must_use]
    pub fn full(max: f32) -> Self {
        Self {
            current: max,
            max,
            regen: 0.0,
        }
    }

    /// Set the regeneration rate.
    #[must_use]
    pub fn with_regen(mut self, regen: f32) -> Self {
        self.regen = regen;
        self
    }

    /// Returns `true` if the entity is alive (HP > 0).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Apply damage, clamping to zero.
    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Heal, clamping to max.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

impl Component for Health {
    fn type_name() -> &'static str {
        "Health"
    }

    fn update(&mut self, frame: &Frame) {
        // The dead stay dead.
        if self.is_alive() {
            self.heal(self.regen * frame.dt);
        }
    }
}

/// A simple name tag component for debugging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Name {
    /// The entity's display name.
    pub value: String,
}

impl Name {
    /// Create a new name component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { value: name.into() }
    }
}

impl Component for Name {
    fn type_name() -> &'static str {
        "Name"
    }
}

#[cfg(test)]
mod tests {
    use engine_component::ComponentTypeId;

    use super::*;

    const SECOND: Frame = Frame::new(1, 1.0);

    #[test]
    fn test_register_all() {
        let registry = register(RegistryBuilder::new()).start().unwrap();
        let names: Vec<_> = registry.registered().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["Position", "Velocity", "Health", "Name"]);
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys = vec![
            ComponentTypeId::of::<Position>(),
            ComponentTypeId::of::<Velocity>(),
            ComponentTypeId::of::<Health>(),
            ComponentTypeId::of::<Name>(),
        ];
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_velocity_damping() {
        let mut v = Velocity::new(2.0, 0.0, 0.0).with_damping(0.5);
        v.update(&SECOND);
        assert_eq!(v.linear, Vec3::new(1.0, 0.0, 0.0));

        let mut undamped = Velocity::new(1.0, 0.0, 0.0);
        undamped.update(&SECOND);
        assert_eq!(undamped.linear, Vec3::X);
    }

    #[test]
    fn test_health_damage_and_heal() {
        let mut h = Health::full(100.0);
        assert!(h.is_alive());
        h.damage(60.0);
        assert_eq!(h.current, 40.0);
        h.heal(30.0);
        assert_eq!(h.current, 70.0);
        h.damage(200.0);
        assert_eq!(h.current, 0.0);
        assert!(!h.is_alive());
    }

    #[test]
    fn test_health_regen_clamps_and_skips_dead() {
        let mut h = Health::full(10.0).with_regen(4.0);
        h.damage(5.0);
        h.update(&SECOND);
        assert_eq!(h.current, 9.0);
        h.update(&SECOND);
        assert_eq!(h.current, 10.0);

        h.damage(10.0);
        h.update(&SECOND);
        assert_eq!(h.current, 0.0);
    }

    #[test]
    fn test_disabled_velocity_is_not_damped() {
        let mut registry = register(RegistryBuilder::new()).start().unwrap();
        let id = registry
            .add(Velocity::new(1.0, 0.0, 0.0).with_damping(1.0))
            .unwrap();
        registry.set_enabled(id, false).unwrap();
        registry.update();
        let v = registry.read(id, |v: &Velocity| v.linear).unwrap();
        assert_eq!(v, Vec3::X);
    }

    #[test]
    fn test_name_snapshot() {
        let mut registry = register(RegistryBuilder::new()).start().unwrap();
        let id = registry.add(Name::new("Player")).unwrap();
        let record = registry.snapshot(id).unwrap();
        assert_eq!(record.decode::<Name>().unwrap(), Name::new("Player"));
    }
}
