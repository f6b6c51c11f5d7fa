//! Error types for document normalization.

use thiserror::Error;

/// Errors raised while emitting a document as YAML text.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Mapping keys must be scalars in block style.
    #[error("cannot emit non-scalar mapping key at {location}")]
    ComplexKey {
        /// Dotted location of the mapping holding the key.
        location: String,
    },

    /// The document has no JSON representation.
    #[error("failed to emit JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the normalization pipeline.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The (preprocessed) source text is not a valid document.
    #[error("failed to parse OpenAPI document: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// The transformed document could not be written back as text.
    #[error("failed to emit OpenAPI document: {0}")]
    Emit(#[from] EmitError),

    /// An override table source is malformed.
    #[error("invalid operation id overrides: {0}")]
    Overrides(#[source] serde_yaml::Error),
}
