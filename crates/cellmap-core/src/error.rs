//! Error types for the mapping core.

use crate::view_type::ViewType;

/// Result type alias for mapping core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while producing views through a [`ViewContainer`](crate::ViewContainer).
///
/// Type mismatches between a mapping and a model are not errors; they produce
/// no view. Only failures of the container itself are reported here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A view template refers to a resource the container does not know.
    #[error("view resource '{name}' not found")]
    ResourceNotFound { name: String },

    /// A view was requested for a reuse identifier that has no template.
    #[error("no template registered for '{reuse_identifier}' ({view_type})")]
    TemplateNotRegistered {
        view_type: ViewType,
        reuse_identifier: String,
    },
}

impl Error {
    /// Create a missing-resource error.
    pub fn resource_not_found(name: impl Into<String>) -> Self {
        Self::ResourceNotFound { name: name.into() }
    }

    /// Create a missing-template error.
    pub fn template_not_registered(view_type: &ViewType, reuse_identifier: &str) -> Self {
        Self::TemplateNotRegistered {
            view_type: view_type.clone(),
            reuse_identifier: reuse_identifier.to_owned(),
        }
    }
}
