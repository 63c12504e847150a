//! Registry startup errors.

use engine_component::ComponentTypeId;

/// Errors raised while building a [`Registry`](crate::Registry).
///
/// Operations on a running registry report
/// [`ComponentError`](engine_component::ComponentError) instead.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two registrations resolved to the same [`ComponentTypeId`].
    ///
    /// `same_type` is `true` when one Rust type was registered twice, and
    /// `false` when two distinct types share a name (or an FNV-1a hash).
    #[error(
        "duplicate registration for component type {type_id}: '{first}' and '{second}' (same type: {same_type})"
    )]
    DuplicateRegistration {
        /// The colliding key.
        type_id: ComponentTypeId,
        /// Name of the type registered first.
        first: &'static str,
        /// Name of the type that collided with it.
        second: &'static str,
        /// Whether both registrations were for the same Rust type.
        same_type: bool,
    },
}
