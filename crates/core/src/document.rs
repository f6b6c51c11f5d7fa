//! Order-preserving document tree and the operation walk shared by the passes.

use serde_yaml::{Mapping, Value};

use crate::emit::{OutputFormat, QuotingPolicy, render, to_yaml_string};
use crate::error::{EmitError, TransformError};

/// Method-level keys starting with this prefix are vendor extensions, not operations.
pub const EXTENSION_PREFIX: &str = "x-";

/// A parsed OpenAPI document.
///
/// Mappings keep their insertion order, so a parse/emit cycle changes only
/// what the passes mutate.
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Parse a document from YAML (or JSON) text.
    pub fn from_yaml_str(text: &str) -> Result<Self, TransformError> {
        serde_yaml::from_str(text)
            .map(Self::from_value)
            .map_err(TransformError::Parse)
    }

    /// Wrap an already-built tree.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// The root node.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// The root node, mutably.
    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    /// Consume the document and return the root node.
    pub fn into_value(self) -> Value {
        self.root
    }

    /// Render the document as YAML text.
    pub fn to_yaml_string(&self, policy: &QuotingPolicy) -> Result<String, EmitError> {
        to_yaml_string(&self.root, policy)
    }

    /// Render the document in `format`.
    pub fn render(
        &self,
        format: OutputFormat,
        policy: &QuotingPolicy,
    ) -> Result<String, EmitError> {
        render(&self.root, format, policy)
    }

    /// Look up the operation mapping for `method` on `path`.
    pub fn operation(&self, path: &str, method: &str) -> Option<&Mapping> {
        self.root
            .get("paths")?
            .get(path)?
            .get(method)?
            .as_mapping()
    }

    /// The `operationId` of an operation, if it is a string.
    pub fn operation_id(&self, path: &str, method: &str) -> Option<&str> {
        self.operation(path, method)?.get("operationId")?.as_str()
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::from_value(root)
    }
}

/// Visit every operation under `paths` as `(path, method, operation)`.
///
/// Skips non-string keys, path items that are not mappings, method keys with
/// the [`EXTENSION_PREFIX`], and method values that are not mappings. Path-level
/// fields such as `parameters` or `summary` are never mappings and fall out of
/// the last rule.
pub fn for_each_operation_mut<F>(root: &mut Value, mut visit: F)
where
    F: FnMut(&str, &str, &mut Mapping),
{
    let Some(paths) = root.get_mut("paths").and_then(Value::as_mapping_mut) else {
        return;
    };

    for (path, item) in paths.iter_mut() {
        let (Some(path), Some(item)) = (path.as_str(), item.as_mapping_mut()) else {
            continue;
        };
        for (method, operation) in item.iter_mut() {
            let Some(method) = method.as_str() else {
                continue;
            };
            if method.starts_with(EXTENSION_PREFIX) {
                continue;
            }
            if let Some(operation) = operation.as_mapping_mut() {
                visit(path, method, operation);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_skips_extensions_and_scalars() {
        let mut doc = Document::from_yaml_str(
            r"
paths:
  /items:
    summary: Items
    parameters:
      - name: q
    x-internal:
      note: skipped
    get:
      summary: list
    post:
      summary: create
  /broken: just a string
",
        )
        .unwrap();

        let mut seen = Vec::new();
        for_each_operation_mut(doc.root_mut(), |path, method, _| {
            seen.push(format!("{method} {path}"));
        });

        assert_eq!(seen, vec!["get /items", "post /items"]);
    }

    #[test]
    fn test_walk_without_paths_is_noop() {
        let mut doc = Document::from_yaml_str("openapi: 3.0.0\n").unwrap();
        let mut calls = 0;
        for_each_operation_mut(doc.root_mut(), |_, _, _| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = Document::from_yaml_str("paths: [unclosed").unwrap_err();
        assert!(matches!(err, TransformError::Parse(_)));
    }

    #[test]
    fn test_operation_lookup() {
        let doc =
            Document::from_yaml_str("paths:\n  /a:\n    get:\n      operationId: getA\n").unwrap();
        assert_eq!(doc.operation_id("/a", "get"), Some("getA"));
        assert!(doc.operation("/a", "post").is_none());
    }

    #[test]
    fn test_into_value_returns_mutated_root() {
        let root: Value = serde_yaml::from_str("openapi: 3.0.0\n").unwrap();
        let mut doc = Document::from(root);
        doc.root_mut()["info"] = Value::from("added");

        let root = doc.into_value();

        assert_eq!(root["openapi"].as_str(), Some("3.0.0"));
        assert_eq!(root["info"].as_str(), Some("added"));
    }
}
