//! Present/absent model values and recursive unwrapping.
//!
//! Generic storage frequently hands out values wrapped in one or more
//! optional layers. [`ModelValue`] makes those layers explicit and
//! [`recursively_unwrap`] strips them so type checks see the model itself.

use std::fmt;
use std::sync::Arc;

use crate::model::{Model, ModelType};

/// A possibly absent, possibly wrapped model value.
///
/// # Example
///
/// ```
/// use cellmap_core::{recursively_unwrap, ModelValue};
///
/// let value = ModelValue::new(5i32).wrapped().wrapped();
/// let model = recursively_unwrap(&value).unwrap();
/// assert_eq!(model.downcast_ref::<i32>(), Some(&5));
///
/// assert!(recursively_unwrap(&ModelValue::Absent.wrapped()).is_none());
/// ```
#[derive(Clone, Default)]
pub enum ModelValue {
    /// No value.
    #[default]
    Absent,
    /// One optional layer around another value.
    Wrapped(Box<ModelValue>),
    /// A concrete model.
    Present(Arc<dyn Model>),
}

impl ModelValue {
    /// Creates a present value.
    pub fn new<M: ModelType>(model: M) -> Self {
        Self::Present(Arc::new(model))
    }

    /// Creates a present value from a shared model.
    pub fn from_shared(model: Arc<dyn Model>) -> Self {
        Self::Present(model)
    }

    /// Wraps this value in one more optional layer.
    pub fn wrapped(self) -> Self {
        Self::Wrapped(Box::new(self))
    }

    /// Returns the innermost present model, if any.
    #[inline]
    pub fn unwrapped(&self) -> Option<&dyn Model> {
        recursively_unwrap(self)
    }

    /// Returns `true` if every layer is absent.
    pub fn is_absent(&self) -> bool {
        self.unwrapped().is_none()
    }

    /// Strips every wrapping layer, leaving `Present` or `Absent`.
    pub fn flattened(&self) -> ModelValue {
        let mut current = self;
        loop {
            match current {
                Self::Absent => return Self::Absent,
                Self::Wrapped(inner) => current = inner.as_ref(),
                Self::Present(model) => return Self::Present(Arc::clone(model)),
            }
        }
    }
}

/// Returns the innermost present model of `value`, or `None` if every layer
/// is absent. Terminates for any finite nesting depth.
pub fn recursively_unwrap(value: &ModelValue) -> Option<&dyn Model> {
    let mut current = value;
    loop {
        match current {
            ModelValue::Absent => return None,
            ModelValue::Wrapped(inner) => current = inner.as_ref(),
            ModelValue::Present(model) => return Some(model.as_ref()),
        }
    }
}

impl PartialEq for ModelValue {
    /// Present values are equal when they share the same model allocation.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) => true,
            (Self::Wrapped(a), Self::Wrapped(b)) => a == b,
            (Self::Present(a), Self::Present(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ModelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Wrapped(inner) => f.debug_tuple("Wrapped").field(inner).finish(),
            Self::Present(model) => write!(f, "Present({})", model.model_tag()),
        }
    }
}

impl<M: ModelType> From<Option<M>> for ModelValue {
    /// `None` becomes `Absent`; `Some` becomes a one-layer wrapped value.
    fn from(value: Option<M>) -> Self {
        match value {
            Some(model) => Self::new(model).wrapped(),
            None => Self::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_present() {
        let value = ModelValue::new(7u32);
        let model = recursively_unwrap(&value).unwrap();
        assert_eq!(model.downcast_ref::<u32>(), Some(&7));
    }

    #[test]
    fn test_unwrap_nested() {
        let mut value = ModelValue::new(String::from("deep"));
        for _ in 0..64 {
            value = value.wrapped();
        }
        let model = recursively_unwrap(&value).unwrap();
        assert_eq!(model.downcast_ref::<String>().map(String::as_str), Some("deep"));
    }

    #[test]
    fn test_unwrap_absent() {
        assert!(recursively_unwrap(&ModelValue::Absent).is_none());
        assert!(ModelValue::Absent.wrapped().wrapped().is_absent());
    }

    #[test]
    fn test_flatten_idempotent() {
        let values = [
            ModelValue::new(1i64).wrapped().wrapped(),
            ModelValue::Absent.wrapped(),
            ModelValue::new(2i64),
        ];
        for value in &values {
            let once = value.flattened();
            assert_eq!(once.flattened(), once);
            assert!(!matches!(once, ModelValue::Wrapped(_)));
        }
    }

    #[test]
    fn test_unwrap_idempotent() {
        let value = ModelValue::new(3i32).wrapped();
        let once = recursively_unwrap(&value).unwrap();
        let flat = value.flattened();
        let twice = recursively_unwrap(&flat).unwrap();
        assert!(std::ptr::addr_eq(once as *const dyn Model, twice as *const dyn Model));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(ModelValue::from(None::<i32>), ModelValue::Absent);
        let value = ModelValue::from(Some(9i32));
        assert!(matches!(value, ModelValue::Wrapped(_)));
        assert!(!value.is_absent());
    }
}
