//! Error types for the mapping registry.

use std::path::PathBuf;

use cellmap_core::{IndexPath, ModelTag, ViewType};

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or using a registry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No registered mapping can render the model.
    #[error("no {view_type} mapping for model '{model}' at {index_path}")]
    NoMapping {
        view_type: ViewType,
        model: ModelTag,
        index_path: IndexPath,
    },

    /// More than one mapping matched under the strict ambiguity policy.
    #[error("{count} {view_type} mappings match model '{model}' at {index_path}")]
    AmbiguousMapping {
        view_type: ViewType,
        model: ModelTag,
        index_path: IndexPath,
        count: usize,
    },

    /// The resolved mapping could not bind the view its container produced.
    #[error("{view_type} mapping '{reuse_identifier}' rejected the view for model '{model}' at {index_path}")]
    BindRejected {
        view_type: ViewType,
        reuse_identifier: String,
        model: ModelTag,
        index_path: IndexPath,
    },

    /// The model to render is absent.
    #[error("absent model for {view_type} at {index_path}")]
    AbsentModel {
        view_type: ViewType,
        index_path: IndexPath,
    },

    /// The storage has no item at the index path.
    #[error("no item at {index_path}")]
    ItemNotFound { index_path: IndexPath },

    /// A reaction could not be attached to any mapping.
    #[error("no {view_type} mapping accepts model '{model}' for reaction '{event}'")]
    NoMappingForReaction {
        event: String,
        view_type: ViewType,
        model: ModelTag,
    },

    /// A view container failure.
    #[error(transparent)]
    Container(#[from] cellmap_core::Error),

    /// Invalid registry configuration.
    #[error("invalid registry configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file I/O error.
    #[error("failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
