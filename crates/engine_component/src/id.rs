//! Component handles.
//!
//! A [`ComponentId`] is a lightweight `Copy` handle pairing the
//! [`ComponentTypeId`] of the storage that owns a component with the
//! [`SlotIndex`] of the component inside that storage. The two halves only
//! have meaning together.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::ComponentTypeId;

/// Position of a component inside its storage.
///
/// The `generation` is bumped every time the slot is freed, so a handle to a
/// removed component stays detectably stale after the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotIndex {
    /// Dense index into the storage's slot vector.
    pub index: u32,
    /// Generation of the slot at the time the handle was issued.
    pub generation: u32,
}

impl SlotIndex {
    /// Create a slot index from its raw parts.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Handle to one component instance, returned by the registry on add.
///
/// Handles confer no ownership. They remain valid until the component they
/// refer to is removed or its registry is shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId {
    /// The component type, and therefore the storage, this handle belongs to.
    pub system: ComponentTypeId,
    /// The slot within that storage.
    pub index: SlotIndex,
}

impl ComponentId {
    /// Pair a storage key with a slot index.
    #[must_use]
    pub const fn new(system: ComponentTypeId, index: SlotIndex) -> Self {
        Self { system, index }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({}:{})", self.system, self.index)
    }
}
