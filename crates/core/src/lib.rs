//! OpenAPI document normalization for client code generators.
//!
//! The pipeline is:
//! 1. Preprocess: raw text -> text with unquoted `description:` values repaired
//! 2. Parse: text -> [`Document`] (order-preserving YAML tree)
//! 3. Transform: inline parameter refs -> assign operation ids -> sanitize descriptions
//! 4. Emit: [`Document`] -> YAML text under a [`QuotingPolicy`]
//!
//! Each stage is usable on its own; [`normalize_text`] runs all of them.

mod document;
mod emit;
mod error;
mod naming;
mod overrides;
mod preprocess;
mod refs;
mod sanitize;
mod transform;

pub use document::{Document, EXTENSION_PREFIX, for_each_operation_mut};
pub use emit::{OutputFormat, QuotingPolicy, render, to_json_string, to_yaml_string};
pub use error::{EmitError, TransformError};
pub use naming::{
    MethodPrefixes, NamingReport, OperationNamer, assign_operation_ids, generate_operation_id,
};
pub use overrides::{OverrideEntry, OverrideFile, OverrideTable};
pub use preprocess::repair_description_quoting;
pub use refs::{InlineReport, PARAMETER_REF_PREFIX, UnresolvedRef, inline_parameter_refs};
pub use sanitize::{SanitizeReport, sanitize_descriptions};
pub use transform::{
    Normalized, TransformConfig, TransformReport, Transformed, normalize_text, transform,
};
