//! The component-type registry.
//!
//! A [`Registry`] owns exactly one storage per registered component type and
//! routes every operation on a [`ComponentId`] to the storage named by its
//! `system` key. Entries are fixed once the registry has started: the set of
//! types, and the order they are updated in, never changes afterward.
//!
//! Keys are derived from type names, so typed operations also compare the
//! caller's [`TypeId`] with the registered one. A type that merely shares a
//! name with a registered type is treated as unregistered.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use engine_component::{
    AddErasedFn, Component, ComponentError, ComponentId, ComponentRecord, ComponentStorage,
    ComponentSystem, ComponentTypeId, ErasedComponent, Frame, Result, downcast_mut, downcast_ref,
};
use tracing::{debug, info, warn};

use crate::builder::RegistryBuilder;
use crate::config::RegistryConfig;
use crate::report::{SystemTiming, UpdateReport};

/// A registered component type: its storage plus the bound add operation.
pub(crate) struct SystemEntry {
    pub(crate) name: &'static str,
    pub(crate) rust_type: TypeId,
    pub(crate) system: Box<dyn ComponentSystem>,
    pub(crate) add: AddErasedFn,
}

/// Routes component operations to per-type storages and drives their
/// per-frame update.
///
/// Created by [`RegistryBuilder::start`], consumed by [`Registry::shutdown`].
pub struct Registry {
    config: RegistryConfig,
    /// Entries in registration order.
    entries: Vec<SystemEntry>,
    /// Maps each key to its position in `entries`.
    index: HashMap<ComponentTypeId, usize>,
    /// Index of the last frame processed.
    frame: u64,
}

impl Registry {
    /// Start collecting component types.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(
        config: RegistryConfig,
        entries: Vec<SystemEntry>,
        index: HashMap<ComponentTypeId, usize>,
    ) -> Self {
        Self {
            config,
            entries,
            index,
            frame: 0,
        }
    }

    /// The configuration the registry was started with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of registered component types.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.entries.len()
    }

    /// Index of the last processed frame (0 before the first update).
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// Registered component types in registration order.
    pub fn registered(&self) -> impl Iterator<Item = (ComponentTypeId, &'static str)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.system.component_type(), entry.name))
    }

    /// Returns `true` if `T` itself was registered.
    #[must_use]
    pub fn is_registered<T: Component>(&self) -> bool {
        self.typed_position::<T>().is_ok()
    }

    fn entry(&self, key: ComponentTypeId) -> Result<&SystemEntry> {
        self.index
            .get(&key)
            .map(|&i| &self.entries[i])
            .ok_or(ComponentError::UnknownComponentType(key))
    }

    fn entry_mut(&mut self, key: ComponentTypeId) -> Result<&mut SystemEntry> {
        match self.index.get(&key) {
            Some(&i) => Ok(&mut self.entries[i]),
            None => Err(ComponentError::UnknownComponentType(key)),
        }
    }

    /// Position of the entry registered for `T`, checked by [`TypeId`].
    fn typed_position<T: Component>(&self) -> Result<usize> {
        let key = ComponentTypeId::of::<T>();
        self.index
            .get(&key)
            .copied()
            .filter(|&i| self.entries[i].rust_type == TypeId::of::<T>())
            .ok_or(ComponentError::UnknownComponentType(key))
    }

    /// Position of the entry `id` belongs to, once `T` is known to be the
    /// type stored there.
    fn resolve<T: Component>(&self, id: ComponentId) -> Result<usize> {
        let &position = self
            .index
            .get(&id.system)
            .ok_or(ComponentError::UnknownComponentType(id.system))?;
        let typed = self.typed_position::<T>()?;
        if typed != position {
            return Err(ComponentError::TypeMismatch {
                expected: self.entries[position].name,
                found: T::type_name(),
            });
        }
        Ok(position)
    }

    /// Store a component and return its handle.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownComponentType`] if `T` was never registered,
    /// [`ComponentError::StorageFull`] if its storage has no index left.
    pub fn add<T: Component>(&mut self, item: T) -> Result<ComponentId> {
        self.typed_position::<T>()?;
        self.add_erased(ComponentTypeId::of::<T>(), ErasedComponent::new(item))
    }

    /// Store an erased component under `key` without static knowledge of its
    /// type.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownComponentType`] if `key` is not registered,
    /// [`ComponentError::TypeMismatch`] if `value` is not of the key's type,
    /// [`ComponentError::StorageFull`] if the storage has no index left.
    pub fn add_erased(
        &mut self,
        key: ComponentTypeId,
        value: ErasedComponent,
    ) -> Result<ComponentId> {
        let entry = self.entry_mut(key)?;
        if value.value_type() != entry.rust_type {
            return Err(ComponentError::TypeMismatch {
                expected: entry.name,
                found: value.type_name(),
            });
        }
        let index = (entry.add)(entry.system.as_mut(), value)?;
        Ok(ComponentId::new(key, index))
    }

    /// Run `f` against a component in place and return its result.
    ///
    /// # Errors
    ///
    /// - [`ComponentError::UnknownComponentType`] if `id.system` or `T` is not
    ///   registered.
    /// - [`ComponentError::TypeMismatch`] if `id` does not belong to `T`.
    /// - [`ComponentError::InvalidComponentId`] if the slot is not live.
    ///
    /// `f` is only called on success.
    pub fn with<T: Component, R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R> {
        let position = self.resolve::<T>(id)?;
        downcast_mut::<T>(self.entries[position].system.as_mut())?.with(id.index, f)
    }

    /// Shared counterpart of [`Registry::with`].
    ///
    /// # Errors
    ///
    /// Same as [`Registry::with`].
    pub fn read<T: Component, R>(&self, id: ComponentId, f: impl FnOnce(&T) -> R) -> Result<R> {
        let position = self.resolve::<T>(id)?;
        downcast_ref::<T>(self.entries[position].system.as_ref())?
            .get(id.index)
            .map(f)
            .ok_or(ComponentError::InvalidComponentId(id))
    }

    /// Typed access to the whole storage for `T`, e.g. for iteration.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownComponentType`] if `T` was never registered.
    pub fn storage<T: Component>(&self) -> Result<&ComponentStorage<T>> {
        let position = self.typed_position::<T>()?;
        downcast_ref::<T>(self.entries[position].system.as_ref())
    }

    /// Enable or disable a component. Disabled components keep their value
    /// but are skipped by [`Registry::update`].
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownComponentType`] or
    /// [`ComponentError::InvalidComponentId`].
    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) -> Result<()> {
        self.entry_mut(id.system)?
            .system
            .set_enabled(id.index, enabled)
            .map_err(|_| ComponentError::InvalidComponentId(id))
    }

    /// Whether a component is currently enabled.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownComponentType`] or
    /// [`ComponentError::InvalidComponentId`].
    pub fn is_enabled(&self, id: ComponentId) -> Result<bool> {
        self.entry(id.system)?
            .system
            .is_enabled(id.index)
            .map_err(|_| ComponentError::InvalidComponentId(id))
    }

    /// Drop a component and free its slot. `id` and every copy of it become
    /// invalid, even after the slot is reused.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownComponentType`] or
    /// [`ComponentError::InvalidComponentId`].
    pub fn remove(&mut self, id: ComponentId) -> Result<()> {
        self.entry_mut(id.system)?
            .system
            .remove(id.index)
            .map_err(|_| ComponentError::InvalidComponentId(id))
    }

    /// Returns `true` if `id` refers to a live component.
    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.entry(id.system)
            .is_ok_and(|entry| entry.system.contains(id.index))
    }

    /// Number of live components of the type keyed by `key`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownComponentType`] if `key` is not registered.
    pub fn len_of(&self, key: ComponentTypeId) -> Result<usize> {
        Ok(self.entry(key)?.system.len())
    }

    /// Encode a component as MessagePack without knowing its type.
    ///
    /// # Errors
    ///
    /// [`ComponentError::UnknownComponentType`],
    /// [`ComponentError::InvalidComponentId`], or [`ComponentError::Encode`].
    pub fn snapshot(&self, id: ComponentId) -> Result<ComponentRecord> {
        let system = &self.entry(id.system)?.system;
        let enabled = system
            .is_enabled(id.index)
            .map_err(|_| ComponentError::InvalidComponentId(id))?;
        let data = system.encode(id.index)?;
        Ok(ComponentRecord { id, enabled, data })
    }

    /// Run one frame: every system's update, once each, in registration order.
    pub fn update(&mut self) -> UpdateReport {
        self.frame += 1;
        let frame = Frame::new(self.frame, self.config.timestep.as_secs_f32());
        let start = Instant::now();

        let systems: Vec<SystemTiming> = self
            .entries
            .iter_mut()
            .map(|entry| {
                let system_start = Instant::now();
                let processed = entry.system.update(&frame);
                SystemTiming {
                    type_id: entry.system.component_type(),
                    name: entry.name,
                    processed,
                    elapsed: system_start.elapsed(),
                }
            })
            .collect();

        let report = UpdateReport {
            frame,
            elapsed: start.elapsed(),
            systems,
        };

        debug!(
            frame = frame.index,
            elapsed_us = report.elapsed.as_micros() as u64,
            systems = report.systems.len(),
            processed = report.processed(),
            "registry update"
        );

        if let Some(threshold) = self.config.slow_update_threshold
            && report.elapsed > threshold
        {
            warn!(
                frame = frame.index,
                elapsed_ms = report.elapsed.as_millis() as u64,
                budget_ms = threshold.as_millis() as u64,
                slowest = report.slowest().map(|s| s.name),
                "registry update exceeded time budget"
            );
        }

        report
    }

    /// Shut every system down once, in registration order, and consume the
    /// registry.
    pub fn shutdown(mut self) {
        for entry in &mut self.entries {
            let released = entry.system.len();
            entry.system.shutdown();
            debug!(component = entry.name, released, "component system shut down");
        }
        info!(
            systems = self.entries.len(),
            frames = self.frame,
            "component registry shut down"
        );
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field(
                "systems",
                &self
                    .entries
                    .iter()
                    .map(|e| (e.name, e.system.len()))
                    .collect::<Vec<_>>(),
            )
            .field("frame", &self.frame)
            .finish()
    }
}
