use std::io;
use std::path::PathBuf;

use oasfix_core::TransformError;
use thiserror::Error;

use crate::location::Location;

/// Failures of a single `oasfix` invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// The source could not be read.
    #[error("failed to read {location}: {source}")]
    Read {
        /// Where the document was read from.
        location: Location,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The destination could not be written.
    #[error("failed to write {location}: {source}")]
    Write {
        /// Where the document was written to.
        location: Location,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The overrides file could not be read.
    #[error("failed to read overrides file {}: {source}", path.display())]
    OverridesRead {
        /// Path given to `--overrides`.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Parsing, transforming or emitting failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// `--strict` was given and some references could not be inlined.
    #[error("unresolved parameter references: {}", references.join(", "))]
    UnresolvedReferences {
        /// `method path -> $ref` for each unresolved reference.
        references: Vec<String>,
    },

    /// `--check` found differences.
    #[error("{location} is not normalized")]
    NotNormalized {
        /// The checked source.
        location: Location,
    },
}
