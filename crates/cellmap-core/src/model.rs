//! Model type tags.
//!
//! Mappings do not inspect model types through reflection. Every model type
//! declares a [`ModelTag`] and, optionally, the tags of the abstractions it
//! conforms to (an `Animal` tag for a `Dog`, for example). A mapping targets
//! exactly one tag. Manual and conforming mappings accept any model that
//! answers to it; typed mappings accept only the concrete type they bind.
//!
//! # Example
//!
//! ```
//! use cellmap_core::{Model, ModelTag, ModelType};
//!
//! const ANIMAL: ModelTag = ModelTag::new("Animal");
//!
//! struct Dog {
//!     name: String,
//! }
//!
//! impl ModelType for Dog {
//!     const TAG: ModelTag = ModelTag::new("Dog");
//!     const CONFORMS_TO: &'static [ModelTag] = &[ANIMAL];
//! }
//!
//! let dog = Dog { name: "Rex".into() };
//! assert!(dog.conforms_to(ANIMAL));
//! assert_eq!(dog.model_tag(), Dog::TAG);
//! ```

use std::any::{Any, TypeId};
use std::fmt;

/// A reflection-free discriminator for a model type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelTag(&'static str);

impl ModelTag {
    /// Creates a tag with the given name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the tag name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for ModelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelTag({})", self.0)
    }
}

impl fmt::Display for ModelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Static tag declaration for a model type.
///
/// Implementing this trait makes the type usable as a [`Model`].
pub trait ModelType: Any + Send + Sync {
    /// The tag identifying this exact type.
    const TAG: ModelTag;

    /// Tags of the abstractions this type also answers to.
    const CONFORMS_TO: &'static [ModelTag] = &[];
}

/// A model value as seen by mappings: a tagged, type-erased object.
///
/// Implemented for every [`ModelType`]; there is no need to implement it by
/// hand.
pub trait Model: Any + Send + Sync {
    /// The tag of the concrete type.
    fn model_tag(&self) -> ModelTag;

    /// Returns `true` if this model answers to `tag`, either as its own tag
    /// or as one it conforms to.
    fn conforms_to(&self, tag: ModelTag) -> bool;

    /// Returns `self` as `Any` for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl<T: ModelType> Model for T {
    fn model_tag(&self) -> ModelTag {
        T::TAG
    }

    fn conforms_to(&self, tag: ModelTag) -> bool {
        ModelTypeInfo::of::<T>().conforms_to(tag)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Model {
    /// Downcasts to a concrete model type.
    pub fn downcast_ref<M: ModelType>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }

    /// The `TypeId` of the concrete model type behind this object.
    pub fn concrete_type_id(&self) -> TypeId {
        Any::type_id(self.as_any())
    }
}

impl fmt::Debug for dyn Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model({})", self.model_tag())
    }
}

/// A type token: the tags of a model type, available without an instance.
///
/// Used for lookups that only know a type, such as attaching an event
/// reaction to every mapping that would accept models of that type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelTypeInfo {
    tag: ModelTag,
    conforms_to: &'static [ModelTag],
    type_id: TypeId,
}

impl ModelTypeInfo {
    /// Returns the type token for `M`.
    pub fn of<M: ModelType>() -> Self {
        Self {
            tag: M::TAG,
            conforms_to: M::CONFORMS_TO,
            type_id: TypeId::of::<M>(),
        }
    }

    /// The tag of the type itself.
    #[inline]
    pub fn tag(&self) -> ModelTag {
        self.tag
    }

    /// The `TypeId` of the type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns `true` if values of this type answer to `tag`.
    pub fn conforms_to(&self, tag: ModelTag) -> bool {
        self.tag == tag || self.conforms_to.contains(&tag)
    }
}

/// Implements [`ModelType`] for types whose tag is just a name.
///
/// ```
/// use cellmap_core::{impl_model_type, ModelType};
///
/// struct Invoice;
/// impl_model_type!(Invoice => "Invoice");
///
/// assert_eq!(Invoice::TAG.name(), "Invoice");
/// ```
#[macro_export]
macro_rules! impl_model_type {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl $crate::ModelType for $ty {
                const TAG: $crate::ModelTag = $crate::ModelTag::new($name);
            }
        )+
    };
}

impl_model_type!(
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    String => "String",
    &'static str => "str",
);
