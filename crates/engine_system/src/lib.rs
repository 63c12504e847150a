//! # engine_system
//!
//! The component-type registry: one storage per registered component type,
//! reachable through untyped [`ComponentId`](engine_component::ComponentId)
//! handles.
//!
//! ## Lifecycle
//!
//! 1. **Start**: queue every component type on a [`RegistryBuilder`] (usually
//!    through each component crate's registration function) and call
//!    [`RegistryBuilder::start`].
//! 2. **Run**: call [`Registry::add`], [`Registry::with`],
//!    [`Registry::set_enabled`] and friends from the frame thread, and
//!    [`Registry::update`] once per frame.
//! 3. **Shutdown**: [`Registry::shutdown`] releases every storage and
//!    consumes the registry.
//!
//! ## Usage
//!
//! ```rust
//! use engine_component::{Component, Frame};
//! use engine_system::Registry;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Spin { turns: u32 }
//!
//! impl Component for Spin {
//!     fn type_name() -> &'static str { "Spin" }
//!     fn update(&mut self, _frame: &Frame) { self.turns += 1; }
//! }
//!
//! let mut registry = Registry::builder().register::<Spin>().start().unwrap();
//! let id = registry.add(Spin { turns: 0 }).unwrap();
//! registry.update();
//! assert_eq!(registry.with(id, |s: &mut Spin| s.turns).unwrap(), 1);
//! registry.shutdown();
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod registry;
pub mod report;

pub use builder::RegistryBuilder;
pub use config::RegistryConfig;
pub use error::RegistryError;
pub use registry::Registry;
pub use report::{SystemTiming, UpdateReport};
