//! # engine_component
//!
//! The "C" in ECS. Defines what a component is, how one component type is
//! stored, and how a storage is driven without knowing its type.
//!
//! This crate provides:
//!
//! - [`Component`] trait: the contract all component data must satisfy.
//! - [`ComponentTypeId`]: stable, name-derived key for a component type.
//! - [`ComponentId`] / [`SlotIndex`]: `Copy` handles to stored components.
//! - [`ComponentStorage`]: dense slot storage with free-list reuse.
//! - [`ComponentSystem`]: the type-erased storage interface used by registries.

pub mod component;
pub mod error;
pub mod id;
pub mod storage;
pub mod system;

pub use component::{Component, ComponentRecord, ComponentTypeId, Frame};
pub use error::{ComponentError, Result};
pub use id::{ComponentId, SlotIndex};
pub use storage::ComponentStorage;
pub use system::{
    AddErasedFn, ComponentSystem, ErasedComponent, add_erased, boxed_storage, downcast_mut,
    downcast_ref,
};
