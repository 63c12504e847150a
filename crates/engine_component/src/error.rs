//! Component-layer error types.

use crate::component::ComponentTypeId;
use crate::id::ComponentId;

/// Errors returned by component storages and the operations routed to them.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// No storage is registered for this component type.
    #[error("unknown component type {0}")]
    UnknownComponentType(ComponentTypeId),

    /// The slot is out of range, empty, or was reused since the handle was issued.
    #[error("invalid component id {0}")]
    InvalidComponentId(ComponentId),

    /// A typed access or an erased value did not match the storage's type.
    #[error("component type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type of the storage being addressed.
        expected: &'static str,
        /// Type supplied by the caller.
        found: &'static str,
    },

    /// Every addressable slot index of this storage is in use.
    #[error("no free slot left in {0} storage")]
    StorageFull(&'static str),

    /// Failed to encode a component to MessagePack.
    #[error("failed to encode component: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}

/// Convenience alias used throughout the component layer.
pub type Result<T, E = ComponentError> = std::result::Result<T, E>;
