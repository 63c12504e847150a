//! Type-erased view of a component storage.
//!
//! A registry holds one storage per component type but cannot name those
//! types. [`ComponentSystem`] is the object-safe capability set every
//! [`ComponentStorage<T>`] exposes, and [`AddErasedFn`] is the single typed
//! entry point that gets bound once per type at registration.

use std::any::{Any, TypeId};
use std::fmt;

use crate::component::{Component, ComponentTypeId, Frame};
use crate::error::{ComponentError, Result};
use crate::id::SlotIndex;
use crate::storage::ComponentStorage;

/// Operations a registry can perform on a storage without knowing its type.
pub trait ComponentSystem: Send + 'static {
    /// Name of the stored component type.
    fn type_name(&self) -> &'static str;

    /// Key of the stored component type.
    fn component_type(&self) -> ComponentTypeId;

    /// Number of live components.
    fn len(&self) -> usize;

    /// Returns `true` if no component is live.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `index` refers to a live component.
    fn contains(&self, index: SlotIndex) -> bool;

    /// Toggle a component's enabled flag without removing it.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidComponentId`] if the slot is not live.
    fn set_enabled(&mut self, index: SlotIndex, enabled: bool) -> Result<()>;

    /// Read a component's enabled flag.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidComponentId`] if the slot is not live.
    fn is_enabled(&self, index: SlotIndex) -> Result<bool>;

    /// Drop a component and free its slot.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidComponentId`] if the slot is not live.
    fn remove(&mut self, index: SlotIndex) -> Result<()>;

    /// Encode a component as named MessagePack.
    ///
    /// # Errors
    ///
    /// [`ComponentError::InvalidComponentId`] if the slot is not live, or
    /// [`ComponentError::Encode`] if serialisation fails.
    fn encode(&self, index: SlotIndex) -> Result<Vec<u8>>;

    /// Apply the per-frame rule to every enabled component. Returns how many
    /// components were processed.
    fn update(&mut self, frame: &Frame) -> usize;

    /// Release every component. Calling it again is a no-op.
    fn shutdown(&mut self);

    /// Upcast for downcasting back to the concrete storage.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting back to the concrete storage.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A component value whose type is only known at runtime.
///
/// Keeps the value's Rust type name so a rejected value can be reported by
/// name.
pub struct ErasedComponent {
    value: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl ErasedComponent {
    /// Erase `value`.
    pub fn new<V: Any + Send>(value: V) -> Self {
        Self {
            value: Box::new(value),
            type_name: std::any::type_name::<V>(),
        }
    }

    /// Rust type name of the erased value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// [`TypeId`] of the erased value.
    #[must_use]
    pub fn value_type(&self) -> TypeId {
        (*self.value).type_id()
    }

    /// Returns `true` if the erased value is a `V`.
    #[must_use]
    pub fn is<V: Any>(&self) -> bool {
        self.value.is::<V>()
    }
}

impl fmt::Debug for ErasedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedComponent")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Bound add operation: takes an erased value of the storage's component
/// type and stores it.
pub type AddErasedFn = fn(&mut dyn ComponentSystem, ErasedComponent) -> Result<SlotIndex>;

/// The [`AddErasedFn`] for component type `T`.
///
/// # Errors
///
/// [`ComponentError::TypeMismatch`] if `system` is not a
/// `ComponentStorage<T>` or `value` is not a `T`, and
/// [`ComponentError::StorageFull`] if the storage has no index left.
pub fn add_erased<T: Component>(
    system: &mut dyn ComponentSystem,
    value: ErasedComponent,
) -> Result<SlotIndex> {
    let expected = system.type_name();
    let storage = system
        .as_any_mut()
        .downcast_mut::<ComponentStorage<T>>()
        .ok_or(ComponentError::TypeMismatch {
            expected,
            found: T::type_name(),
        })?;
    let found = value.type_name;
    let value = value
        .value
        .downcast::<T>()
        .map_err(|_| ComponentError::TypeMismatch {
            expected: T::type_name(),
            found,
        })?;
    storage.add(*value)
}

/// Allocate an empty storage for `T` behind the erased interface.
#[must_use]
pub fn boxed_storage<T: Component>() -> Box<dyn ComponentSystem> {
    Box::new(ComponentStorage::<T>::new())
}

/// Downcast an erased storage to `ComponentStorage<T>`.
///
/// # Errors
///
/// [`ComponentError::TypeMismatch`] if the storage holds another type.
pub fn downcast_mut<T: Component>(
    system: &mut dyn ComponentSystem,
) -> Result<&mut ComponentStorage<T>> {
    let expected = system.type_name();
    system
        .as_any_mut()
        .downcast_mut::<ComponentStorage<T>>()
        .ok_or(ComponentError::TypeMismatch {
            expected,
            found: T::type_name(),
        })
}

/// Shared counterpart of [`downcast_mut`].
///
/// # Errors
///
/// [`ComponentError::TypeMismatch`] if the storage holds another type.
pub fn downcast_ref<T: Component>(system: &dyn ComponentSystem) -> Result<&ComponentStorage<T>> {
    system
        .as_any()
        .downcast_ref::<ComponentStorage<T>>()
        .ok_or(ComponentError::TypeMismatch {
            expected: system.type_name(),
            found: T::type_name(),
        })
}
