//! Deterministic `operationId` assignment.
//!
//! Names come from the override table when the exact `(method, path)` pair is
//! listed there, otherwise from the path:
//!
//! - the method maps to a verb prefix (`post` -> `create`, unknown methods use themselves)
//! - `{placeholder}` segments are dropped
//! - remaining segments split on `-` and `_`, each word capitalized
//! - a path with no words left becomes `<prefix>Root`
//!
//! Generated names are not checked for uniqueness; collisions are reported.

use std::collections::{BTreeMap, HashMap};

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use crate::document::for_each_operation_mut;
use crate::overrides::OverrideTable;

const OPERATION_ID_KEY: &str = "operationId";
const ROOT_WORD: &str = "Root";

/// HTTP method -> verb prefix.
#[derive(Debug, Clone)]
pub struct MethodPrefixes {
    prefixes: BTreeMap<String, String>,
}

impl Default for MethodPrefixes {
    fn default() -> Self {
        let mut prefixes = Self::empty();
        for (method, prefix) in [
            ("get", "get"),
            ("post", "create"),
            ("put", "update"),
            ("patch", "update"),
            ("delete", "delete"),
        ] {
            prefixes.insert(method, prefix);
        }
        prefixes
    }
}

impl MethodPrefixes {
    /// A map with no entries; every method is its own prefix.
    pub fn empty() -> Self {
        Self {
            prefixes: BTreeMap::new(),
        }
    }

    /// Set the prefix used for `method` (case-insensitive).
    pub fn insert(&mut self, method: &str, prefix: impl Into<String>) {
        self.prefixes
            .insert(method.to_ascii_lowercase(), prefix.into());
    }

    /// The prefix for `method`, falling back to the lower-cased method itself.
    pub fn prefix_for(&self, method: &str) -> String {
        let method = method.to_ascii_lowercase();
        match self.prefixes.get(&method) {
            Some(prefix) => prefix.clone(),
            None => method,
        }
    }
}

/// Build an operation id from `method` and `path` alone, ignoring overrides.
pub fn generate_operation_id(method: &str, path: &str, prefixes: &MethodPrefixes) -> String {
    let mut name = prefixes.prefix_for(method);
    let mut has_words = false;

    for segment in path.trim_matches('/').split('/') {
        if is_placeholder(segment) {
            continue;
        }
        for word in segment.split(['-', '_']).filter(|word| !word.is_empty()) {
            push_capitalized(&mut name, word);
            has_words = true;
        }
    }

    if !has_words {
        name.push_str(ROOT_WORD);
    }
    name
}

fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Upper-case the first character, keep the rest as written.
fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}

/// Resolves operation ids against an override table and a prefix map.
#[derive(Debug, Clone, Copy)]
pub struct OperationNamer<'a> {
    overrides: &'a OverrideTable,
    prefixes: &'a MethodPrefixes,
}

impl<'a> OperationNamer<'a> {
    /// Create a namer over the given tables.
    pub fn new(overrides: &'a OverrideTable, prefixes: &'a MethodPrefixes) -> Self {
        Self {
            overrides,
            prefixes,
        }
    }

    /// The id for `method` on `path`: the override if one exists, otherwise generated.
    pub fn operation_id(&self, method: &str, path: &str) -> String {
        self.overrides.get(method, path).map_or_else(
            || generate_operation_id(method, path, self.prefixes),
            str::to_string,
        )
    }
}

/// Outcome of [`assign_operation_ids`].
#[derive(Debug, Clone, Default)]
pub struct NamingReport {
    /// Operations that received a new id.
    pub assigned: usize,
    /// Operations whose existing id was kept.
    pub kept: usize,
    /// Ids used by more than one operation after assignment, sorted.
    pub duplicates: Vec<String>,
}

/// Give every operation without an `operationId` one from `namer`.
///
/// A missing key, `null`, or a blank string (empty or only whitespace) counts
/// as no id. Any other existing value is left as it is, so a second run
/// changes nothing.
pub fn assign_operation_ids(root: &mut Value, namer: &OperationNamer<'_>) -> NamingReport {
    let mut report = NamingReport::default();
    let mut usage: HashMap<String, usize> = HashMap::new();

    for_each_operation_mut(root, |path, method, operation| {
        let id = if has_operation_id(operation) {
            report.kept += 1;
            operation
                .get(OPERATION_ID_KEY)
                .and_then(Value::as_str)
                .map(str::to_string)
        } else {
            let id = namer.operation_id(method, path);
            debug!(%path, %method, operation_id = %id, "Assigned operationId");
            operation.insert(Value::from(OPERATION_ID_KEY), Value::from(id.clone()));
            report.assigned += 1;
            Some(id)
        };

        if let Some(id) = id {
            *usage.entry(id).or_default() += 1;
        }
    });

    report.duplicates = usage
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect();
    report.duplicates.sort();

    for id in &report.duplicates {
        warn!(operation_id = %id, "operationId is used by more than one operation");
    }
    info!(
        assigned = report.assigned,
        kept = report.kept,
        "Assigned operation ids"
    );

    report
}

fn has_operation_id(operation: &Mapping) -> bool {
    match operation.get(OPERATION_ID_KEY) {
        None | Some(Value::Null) => false,
        Some(Value::String(id)) => !id.trim().is_empty(),
        Some(_) => true,
    }
}
