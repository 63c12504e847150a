//! Core [`Component`] trait and associated metadata.
//!
//! Every piece of data managed by a component system must implement
//! [`Component`]. The trait requires `Send + Sync + 'static` so storages can be
//! owned by a registry that is handed between threads, and `serde` support so
//! any stored value can be snapshotted without static type knowledge.
//!
//! ## Type Identity
//!
//! [`ComponentTypeId`] is derived from the component's **string name** using
//! the FNV-1a 64-bit hash algorithm. The ID is deterministic across runs and
//! builds, unlike `std::any::TypeId`. The price is that two types declaring the
//! same name share an ID; the registry rejects such collisions at startup.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::id::ComponentId;

/// A unique identifier for a component type, derived from its string name
/// using the FNV-1a 64-bit hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute the [`ComponentTypeId`] from a component's string name.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Compute the [`ComponentTypeId`] for a Rust component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::from_name(T::type_name())
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Per-frame information handed to [`Component::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Monotonically increasing frame counter, starting at 1 for the first update.
    pub index: u64,
    /// Fixed timestep of this frame, in seconds.
    pub dt: f32,
}

impl Frame {
    /// Create a frame descriptor.
    #[must_use]
    pub const fn new(index: u64, dt: f32) -> Self {
        Self { index, dt }
    }
}

/// The core component trait.
///
/// Implementing this trait is how a type declares "I am a component". The
/// registry never discovers implementors on its own: each type must also be
/// registered once at startup.
///
/// # Examples
///
/// ```rust
/// use serde::{Serialize, Deserialize};
/// use engine_component::{Component, Frame};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
///
///     fn update(&mut self, frame: &Frame) {
///         self.current = (self.current + frame.dt).min(self.max);
///     }
/// }
/// ```
pub trait Component: Send + Sync + 'static + Serialize + DeserializeOwned {
    /// A human-readable name for this component type.
    fn type_name() -> &'static str;

    /// Returns the [`ComponentTypeId`] for this component.
    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }

    /// Per-frame rule, applied by the owning storage to every enabled instance.
    ///
    /// The default does nothing; pure data components need not override it.
    fn update(&mut self, frame: &Frame) {
        let _ = frame;
    }
}

/// A stored component encoded as MessagePack, for inspection without
/// static knowledge of its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// The component this record was taken from.
    pub id: ComponentId,
    /// Whether the component was enabled at snapshot time.
    pub enabled: bool,
    /// MessagePack-encoded component bytes.
    pub data: Vec<u8>,
}

impl ComponentRecord {
    /// Decode the record payload back into its concrete type.
    ///
    /// # Errors
    ///
    /// Returns the `rmp-serde` decode error if the bytes are not a valid `T`.
    pub fn decode<T: Component>(&self) -> Result<T, rmp_serde::decode::Error> {
        rmp_serde::from_slice(&self.data)
    }
}
