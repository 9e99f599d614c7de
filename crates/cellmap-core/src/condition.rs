//! Conditions that narrow where a mapping applies.

use std::fmt;
use std::sync::Arc;

use crate::index_path::IndexPath;
use crate::unwrap::ModelValue;

/// Predicate signature for [`MappingCondition::Custom`].
pub type ConditionFn = Arc<dyn Fn(&IndexPath, &ModelValue) -> bool + Send + Sync>;

/// A gate evaluated against an index path and model during resolution.
///
/// # Example
///
/// ```
/// use cellmap_core::{IndexPath, MappingCondition, ModelValue};
///
/// let first_section = MappingCondition::Section(0);
/// assert!(first_section.is_compatible(&IndexPath::new(0, 3), &ModelValue::Absent));
///
/// let even_rows = MappingCondition::custom(|path, _| path.item() % 2 == 0);
/// assert!(!even_rows.is_compatible(&IndexPath::new(0, 1), &ModelValue::Absent));
/// ```
#[derive(Clone, Default)]
pub enum MappingCondition {
    /// Always compatible.
    #[default]
    None,
    /// Compatible only within the given section.
    Section(usize),
    /// Compatible when the predicate returns `true`.
    ///
    /// The predicate receives the model exactly as the host passed it, still
    /// wrapped. It must be total; a panic inside it is not caught.
    Custom(ConditionFn),
}

impl MappingCondition {
    /// Creates a custom condition from a closure.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&IndexPath, &ModelValue) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(predicate))
    }

    /// Evaluates the condition.
    pub fn is_compatible(&self, index_path: &IndexPath, model: &ModelValue) -> bool {
        match self {
            Self::None => true,
            Self::Section(section) => index_path.section() == *section,
            Self::Custom(predicate) => predicate(index_path, model),
        }
    }
}

impl fmt::Debug for MappingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Section(section) => f.debug_tuple("Section").field(section).finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}
