//! Prelude module for cellmap.
//!
//! ```ignore
//! use cellmap::prelude::*;
//! ```
//!
//! This provides access to:
//! - Model types and values (`ModelType`, `ModelValue`, `ModelTag`)
//! - Views and containers (`ReusableView`, `ModelTransfer`, `ViewPool`)
//! - Mappings (`ViewModelMapping`, `MappingCondition`, `EventReaction`)
//! - The registry and storage (`MappingRegistry`, `SectionedStorage`)

// ============================================================================
// Models
// ============================================================================

pub use crate::{IndexPath, Model, ModelTag, ModelType, ModelTypeInfo, ModelValue};

// ============================================================================
// Views and Containers
// ============================================================================

pub use crate::{
    AnyView, ModelTransfer, ReusableView, ViewContainer, ViewPool, ViewTemplate, ViewType,
};

// ============================================================================
// Mappings
// ============================================================================

pub use crate::{Dequeue, EventReaction, MappingCondition, MappingVariant, ViewModelMapping};

// ============================================================================
// Registry and Storage
// ============================================================================

pub use crate::{
    AmbiguityPolicy, MappingId, MappingRegistry, RegistryConfig, Section, SectionedStorage,
    Storage,
};
