//! Startup registration.
//!
//! Component types are never discovered by scanning. Each component crate
//! exposes a plain registration function that queues its types on a
//! [`RegistryBuilder`]; [`RegistryBuilder::start`] then builds one storage per
//! type and hands back a running [`Registry`].
//!
//! ```rust
//! use engine_component::Component;
//! use engine_system::RegistryBuilder;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Position { x: f32, y: f32, z: f32 }
//!
//! impl Component for Position {
//!     fn type_name() -> &'static str { "Position" }
//! }
//!
//! fn register(builder: RegistryBuilder) -> RegistryBuilder {
//!     builder.register::<Position>()
//! }
//!
//! let registry = RegistryBuilder::new().include(register).start().unwrap();
//! assert_eq!(registry.system_count(), 1);
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use engine_component::{
    AddErasedFn, Component, ComponentSystem, ComponentTypeId, add_erased, boxed_storage,
};
use tracing::info;

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::registry::{Registry, SystemEntry};

/// One queued component type.
#[derive(Clone, Copy)]
struct Registration {
    type_id: ComponentTypeId,
    rust_type: TypeId,
    name: &'static str,
    make: fn() -> Box<dyn ComponentSystem>,
    add: AddErasedFn,
}

/// Collects component types before the registry starts.
#[derive(Default)]
pub struct RegistryBuilder {
    config: RegistryConfig,
    registrations: Vec<Registration>,
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("config", &self.config)
            .field(
                "registrations",
                &self.registrations.iter().map(|r| r.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl RegistryBuilder {
    /// Create a builder with the default [`RegistryConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry configuration.
    #[must_use]
    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Queue component type `T`. Storages are created in queue order, which
    /// is also the order they are updated in every frame.
    #[must_use]
    pub fn register<T: Component>(mut self) -> Self {
        self.registrations.push(Registration {
            type_id: ComponentTypeId::of::<T>(),
            rust_type: TypeId::of::<T>(),
            name: T::type_name(),
            make: boxed_storage::<T>,
            add: add_erased::<T>,
        });
        self
    }

    /// Apply a crate's static registration function.
    #[must_use]
    pub fn include(self, register: fn(Self) -> Self) -> Self {
        register(self)
    }

    /// Number of queued component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` if nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Build one storage per queued type and start the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRegistration`] if two queued types
    /// share a [`ComponentTypeId`]. Nothing is partially started in that case.
    pub fn start(self) -> Result<Registry, RegistryError> {
        let mut index: HashMap<ComponentTypeId, usize> =
            HashMap::with_capacity(self.registrations.len());

        for (position, registration) in self.registrations.iter().enumerate() {
            if let Some(&existing) = index.get(&registration.type_id) {
                let first = &self.registrations[existing];
                return Err(RegistryError::DuplicateRegistration {
                    type_id: registration.type_id,
                    first: first.name,
                    second: registration.name,
                    same_type: first.rust_type == registration.rust_type,
                });
            }
            index.insert(registration.type_id, position);
        }

        let entries: Vec<SystemEntry> = self
            .registrations
            .iter()
            .map(|registration| {
                info!(
                    component = registration.name,
                    type_id = %registration.type_id,
                    "registered component system"
                );
                SystemEntry {
                    name: registration.name,
                    rust_type: registration.rust_type,
                    system: (registration.make)(),
                    add: registration.add,
                }
            })
            .collect();

        info!(systems = entries.len(), "component registry started");
        Ok(Registry::from_parts(self.config, entries, index))
    }
}
