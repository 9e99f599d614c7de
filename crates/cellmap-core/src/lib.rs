//! Core view-model mapping engine for cellmap.
//!
//! This crate decides which view renders a model in a list or grid control:
//!
//! - **Model tags**: reflection-free type discriminators with conformance
//! - **Model values**: explicit present/absent wrapping and unwrapping
//! - **View types**: cells and supplementary views of a kind
//! - **Conditions**: section-scoped or custom gates on a mapping
//! - **Mappings**: typed rules that produce, bind and update views
//! - **Resolution**: filtering registered mappings down to candidates
//! - **Reactions**: per-mapping closures for location-scoped events
//! - **Containers**: the pooling contract views are dequeued through
//!
//! Storage of sections and items, and the registry that owns mappings, live
//! in the `cellmap` facade crate.
//!
//! # Example
//!
//! ```
//! use cellmap_core::{
//!     Dequeue, IndexPath, MappingCondition, ModelValue, ReusableView, ViewModelMapping,
//!     ViewPool, ViewType,
//! };
//!
//! #[derive(Default)]
//! struct PriceCell {
//!     label: String,
//! }
//!
//! impl ReusableView for PriceCell {
//!     fn create() -> Self {
//!         Self::default()
//!     }
//! }
//!
//! let mappings = vec![
//!     ViewModelMapping::cell::<PriceCell, f64>(|cell, price, _| {
//!         cell.label = format!("${price:.2}");
//!     })
//!     .with_condition(MappingCondition::Section(0)),
//! ];
//!
//! let model = ModelValue::new(9.5f64);
//! let path = IndexPath::new(0, 0);
//! let candidates = ViewType::Cell.mapping_candidates(&mappings, &model, &path);
//! assert_eq!(candidates.len(), 1);
//!
//! let pool = ViewPool::new();
//! let view = candidates[0]
//!     .dequeue_configured_cell(&pool, &model, &path)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(view.downcast_ref::<PriceCell>().unwrap().label, "$9.50");
//! ```

mod condition;
mod container;
mod error;
mod index_path;
pub mod logging;
mod mapping;
mod model;
mod reaction;
mod resolver;
mod unwrap;
mod view_type;

pub use condition::{ConditionFn, MappingCondition};
pub use container::{AnyView, ReusableView, ViewContainer, ViewFactory, ViewPool, ViewTemplate};
pub use error::{Error, Result};
pub use index_path::IndexPath;
pub use mapping::{BindFn, Dequeue, MappingVariant, ModelTransfer, UpdateFn, ViewModelMapping};
pub use model::{Model, ModelTag, ModelType, ModelTypeInfo};
pub use reaction::{EventReaction, ReactionOutput};
pub use resolver::mapping_candidates;
pub use unwrap::{recursively_unwrap, ModelValue};
pub use view_type::ViewType;
