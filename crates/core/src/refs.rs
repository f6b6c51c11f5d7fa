//! Inlining of `#/components/parameters/*` references in operation parameter lists.

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use crate::document::for_each_operation_mut;

/// References starting with this prefix point into the parameter registry.
pub const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";

const REF_KEY: &str = "$ref";

/// A parameter reference whose target is missing from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRef {
    /// Path template of the operation.
    pub path: String,
    /// Method key of the operation, as written.
    pub method: String,
    /// The `$ref` value.
    pub reference: String,
}

/// Outcome of [`inline_parameter_refs`].
#[derive(Debug, Clone, Default)]
pub struct InlineReport {
    /// Parameter entries replaced by their registry definition.
    pub inlined: usize,
    /// References left in place because the target does not exist.
    pub unresolved: Vec<UnresolvedRef>,
}

/// Replace parameter references in every operation with a copy of their definition.
///
/// The registry (`components.parameters`) is cloned up front and never
/// modified, so each inlined entry is an independent copy. References into
/// other categories and inline parameters are left untouched; references to
/// unknown identifiers are left untouched and reported.
pub fn inline_parameter_refs(root: &mut Value) -> InlineReport {
    let registry = parameter_registry(root);
    if registry.is_empty() {
        debug!("No components.parameters registry, parameter refs cannot be resolved");
    }

    let mut report = InlineReport::default();

    for_each_operation_mut(root, |path, method, operation| {
        let Some(parameters) = operation
            .get_mut("parameters")
            .and_then(Value::as_sequence_mut)
        else {
            return;
        };

        for parameter in parameters.iter_mut() {
            let Some(reference) = reference_of(parameter).map(str::to_string) else {
                continue;
            };
            let Some(name) = registry_name(&reference) else {
                debug!(%path, %method, %reference, "Skipping non-parameter reference");
                continue;
            };

            if let Some(definition) = registry.get(name.as_str()) {
                *parameter = definition.clone();
                report.inlined += 1;
            } else {
                warn!(%path, %method, %reference, "Unresolved parameter reference");
                report.unresolved.push(UnresolvedRef {
                    path: path.to_string(),
                    method: method.to_string(),
                    reference,
                });
            }
        }
    });

    info!(
        inlined = report.inlined,
        unresolved = report.unresolved.len(),
        "Inlined parameter references"
    );
    report
}

fn parameter_registry(root: &Value) -> Mapping {
    root.get("components")
        .and_then(|components| components.get("parameters"))
        .and_then(Value::as_mapping)
        .cloned()
        .unwrap_or_default()
}

fn reference_of(parameter: &Value) -> Option<&str> {
    parameter.as_mapping()?.get(REF_KEY)?.as_str()
}

/// Registry key for a parameter reference: the last pointer segment, unescaped.
fn registry_name(reference: &str) -> Option<String> {
    let pointer = reference.strip_prefix(PARAMETER_REF_PREFIX)?;
    let segment = pointer.rsplit('/').next().unwrap_or(pointer);
    Some(segment.replace("~1", "/").replace("~0", "~"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::document::Document;

    const DOC: &str = r"
paths:
  /domains/{domain_id}:
    parameters:
      - $ref: '#/components/parameters/DomainId'
    get:
      parameters:
        - $ref: '#/components/parameters/DomainId'
        - name: expand
          in: query
    delete:
      parameters:
        - $ref: '#/components/parameters/DomainId'
        - $ref: '#/components/parameters/Missing'
        - $ref: '#/components/schemas/Domain'
    x-draft:
      parameters:
        - $ref: '#/components/parameters/DomainId'
components:
  parameters:
    DomainId:
      name: domain_id
      in: path
      required: true
      schema:
        type: string
";

    fn params<'a>(doc: &'a Document, path: &str, method: &str) -> &'a Vec<Value> {
        doc.operation(path, method)
            .unwrap()
            .get("parameters")
            .unwrap()
            .as_sequence()
            .unwrap()
    }

    #[test]
    fn test_inlines_known_references() {
        let mut doc = Document::from_yaml_str(DOC).unwrap();
        let report = inline_parameter_refs(doc.root_mut());

        assert_eq!(report.inlined, 2);
        let get = params(&doc, "/domains/{domain_id}", "get");
        assert_eq!(get[0]["name"].as_str(), Some("domain_id"));
        assert_eq!(get[0]["in"].as_str(), Some("path"));
        assert!(get[0].get(REF_KEY).is_none());
        assert_eq!(get[1]["name"].as_str(), Some("expand"));
    }

    #[test]
    fn test_unresolved_reference_is_left_and_reported() {
        let mut doc = Document::from_yaml_str(DOC).unwrap();
        let report = inline_parameter_refs(doc.root_mut());

        assert_eq!(
            report.unresolved,
            vec![UnresolvedRef {
                path: "/domains/{domain_id}".to_string(),
                method: "delete".to_string(),
                reference: "#/components/parameters/Missing".to_string(),
            }]
        );
        let delete = params(&doc, "/domains/{domain_id}", "delete");
        assert_eq!(
            delete[1][REF_KEY].as_str(),
            Some("#/components/parameters/Missing")
        );
    }

    #[test]
    fn test_other_categories_and_extensions_untouched() {
        let mut doc = Document::from_yaml_str(DOC).unwrap();
        inline_parameter_refs(doc.root_mut());

        let delete = params(&doc, "/domains/{domain_id}", "delete");
        assert_eq!(
            delete[2][REF_KEY].as_str(),
            Some("#/components/schemas/Domain")
        );

        let draft = params(&doc, "/domains/{domain_id}", "x-draft");
        assert!(draft[0].get(REF_KEY).is_some());

        let path_level = doc.root()["paths"]["/domains/{domain_id}"]["parameters"][0].clone();
        assert!(path_level.get(REF_KEY).is_some());
    }

    #[test]
    fn test_inlined_copies_are_independent() {
        let mut doc = Document::from_yaml_str(DOC).unwrap();
        inline_parameter_refs(doc.root_mut());
        let registry_before = doc.root()["components"]["parameters"]["DomainId"].clone();

        doc.root_mut()["paths"]["/domains/{domain_id}"]["get"]["parameters"][0]["required"] =
            Value::Bool(false);

        let delete = params(&doc, "/domains/{domain_id}", "delete");
        assert_eq!(delete[0]["required"].as_bool(), Some(true));
        assert_eq!(
            doc.root()["components"]["parameters"]["DomainId"],
            registry_before
        );
        assert_eq!(registry_before["required"].as_bool(), Some(true));
    }

    #[test]
    fn test_registry_is_kept() {
        let mut doc = Document::from_yaml_str(DOC).unwrap();
        inline_parameter_refs(doc.root_mut());
        assert!(doc.root()["components"]["parameters"].get("DomainId").is_some());
    }

    #[test]
    fn test_without_registry_document_is_unchanged() {
        let source = "\
paths:
  /a:
    get:
      parameters:
        - $ref: '#/components/parameters/X'
";
        let mut doc = Document::from_yaml_str(source).unwrap();
        let before = doc.root().clone();

        let report = inline_parameter_refs(doc.root_mut());

        assert_eq!(doc.root(), &before);
        assert_eq!(report.inlined, 0);
        assert_eq!(report.unresolved.len(), 1);
    }

    #[test]
    fn test_registry_name_unescapes_pointer() {
        assert_eq!(
            registry_name("#/components/parameters/a~1b~0c").as_deref(),
            Some("a/b~c")
        );
        assert_eq!(registry_name("#/components/schemas/A"), None);
        assert_eq!(registry_name("other.yaml#/x").as_deref(), None);
    }
}
