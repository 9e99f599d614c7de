//! Cellmap - view-model mapping for list and grid views.
//!
//! This is the facade crate. It re-exports the mapping engine from
//! `cellmap-core` and adds what a host needs around it: a registry that owns
//! mappings, section storage, and file-based configuration.
//!
//! # Example
//!
//! ```
//! use cellmap::prelude::*;
//!
//! #[derive(Default)]
//! struct TitleView {
//!     title: String,
//! }
//!
//! impl ReusableView for TitleView {
//!     fn create() -> Self {
//!         Self::default()
//!     }
//! }
//!
//! let mut registry = MappingRegistry::new();
//! registry.register(ViewModelMapping::header::<TitleView, String>(|view, title, section| {
//!     view.title = format!("{section}. {title}");
//! }));
//!
//! let storage = SectionedStorage::new()
//!     .with_section(Section::new().with_supplementary(ViewType::HEADER, String::from("Fruit")));
//! let pool = ViewPool::new();
//!
//! let view = registry
//!     .supplementary_at(&storage, &pool, ViewType::HEADER, 0)
//!     .unwrap();
//! assert_eq!(view.downcast_ref::<TitleView>().unwrap().title, "0. Fruit");
//! ```

pub use cellmap_core::*;

mod config;
mod error;
pub mod prelude;
mod registry;
mod storage;

pub use config::{AmbiguityPolicy, RegistryConfig};
/// Errors raised by view containers.
pub use cellmap_core::Error as ContainerError;
pub use error::{Error, Result};
pub use registry::{MappingId, MappingRegistry};
pub use storage::{Section, SectionedStorage, Storage};
