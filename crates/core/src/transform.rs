//! Fixed composition of the normalization passes.

use tracing::info;

use crate::document::Document;
use crate::emit::{OutputFormat, QuotingPolicy};
use crate::error::TransformError;
use crate::naming::{MethodPrefixes, NamingReport, OperationNamer, assign_operation_ids};
use crate::overrides::OverrideTable;
use crate::preprocess::repair_description_quoting;
use crate::refs::{InlineReport, inline_parameter_refs};
use crate::sanitize::{SanitizeReport, sanitize_descriptions};

/// Inputs that shape the output besides the document itself.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Hand-picked operation ids.
    pub overrides: OverrideTable,
    /// Verb prefix per HTTP method for generated ids.
    pub prefixes: MethodPrefixes,
    /// Strings forced into single quotes when emitting YAML.
    pub quoting: QuotingPolicy,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            overrides: OverrideTable::builtin(),
            prefixes: MethodPrefixes::default(),
            quoting: QuotingPolicy::default(),
        }
    }
}

/// What each pass did.
#[derive(Debug, Clone, Default)]
pub struct TransformReport {
    /// Reference inlining.
    pub inline: InlineReport,
    /// Operation id assignment.
    pub naming: NamingReport,
    /// Description inspection.
    pub descriptions: SanitizeReport,
}

impl TransformReport {
    /// Whether any parameter reference was left unresolved.
    pub fn has_unresolved(&self) -> bool {
        !self.inline.unresolved.is_empty()
    }
}

/// A transformed document and its report.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// The mutated document.
    pub document: Document,
    /// What the passes did.
    pub report: TransformReport,
}

/// Normalized text and its report.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// The emitted document.
    pub text: String,
    /// Format of the source, reused for the output.
    pub format: OutputFormat,
    /// What the passes did.
    pub report: TransformReport,
}

/// Run inline refs -> assign operation ids -> sanitize descriptions.
///
/// Refs are inlined first so that anything counting or naming parameters
/// downstream sees the full definitions.
pub fn transform(mut document: Document, config: &TransformConfig) -> Transformed {
    let root = document.root_mut();

    let inline = inline_parameter_refs(root);
    let namer = OperationNamer::new(&config.overrides, &config.prefixes);
    let naming = assign_operation_ids(root, &namer);
    let descriptions = sanitize_descriptions(root);

    Transformed {
        document,
        report: TransformReport {
            inline,
            naming,
            descriptions,
        },
    }
}

/// Repair, parse, transform and re-emit `source`.
///
/// Nothing is returned unless every step succeeds.
pub fn normalize_text(
    source: &str,
    config: &TransformConfig,
) -> Result<Normalized, TransformError> {
    let format = OutputFormat::detect(source);
    let repaired = repair_description_quoting(source);
    let document = Document::from_yaml_str(&repaired)?;

    let Transformed { document, report } = transform(document, config);
    let text = document.render(format, &config.quoting)?;

    info!(
        ?format,
        inlined = report.inline.inlined,
        assigned = report.naming.assigned,
        bytes = text.len(),
        "Normalized document"
    );

    Ok(Normalized {
        text,
        format,
        report,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SOURCE: &str = r"openapi: 3.0.3
info:
  title: Mail
  description: Send mail. Note: rate limited
paths:
  /emails/{email_id}/cancel:
    post:
      parameters:
        - $ref: '#/components/parameters/EmailId'
  /widgets/{id}/frobnicate:
    post:
      summary: Frobnicate
  /domains:
    get:
      description: Deprecated listing
components:
  parameters:
    EmailId:
      name: email_id
      in: path
      required: true
";

    #[test]
    fn test_transform_runs_all_passes() {
        let document = Document::from_yaml_str(&repair_description_quoting(SOURCE)).unwrap();
        let Transformed { document, report } = transform(document, &TransformConfig::default());

        assert_eq!(report.inline.inlined, 1);
        assert_eq!(report.naming.assigned, 3);
        assert_eq!(report.descriptions.visited, 2);
        assert_eq!(report.descriptions.flagged, 1);
        assert!(!report.has_unresolved());

        assert_eq!(
            document.operation_id("/emails/{email_id}/cancel", "post"),
            Some("cancelScheduledEmail")
        );
        assert_eq!(document.operation_id("/domains", "get"), Some("listDomains"));
        assert_eq!(
            document.operation_id("/widgets/{id}/frobnicate", "post"),
            Some("createWidgetsFrobnicate")
        );
    }

    #[test]
    fn test_normalize_text_end_to_end() {
        let config = TransformConfig::default();
        let normalized = normalize_text(SOURCE, &config).unwrap();
        let text = &normalized.text;

        assert_eq!(normalized.format, OutputFormat::Yaml);
        assert!(text.starts_with("openapi: 3.0.3\ninfo:\n"));
        for expected in [
            "  description: 'Send mail. Note: rate limited'\n",
            "      description: 'Deprecated listing'\n      operationId: listDomains\n",
            "      parameters:\n      - name: email_id\n        in: path\n        required: true\n",
        ] {
            assert!(text.contains(expected), "missing {expected:?} in\n{text}");
        }
    }

    #[test]
    fn test_normalize_text_is_stable() {
        let config = TransformConfig::default();
        let once = normalize_text(SOURCE, &config).unwrap();
        let twice = normalize_text(&once.text, &config).unwrap();

        assert_eq!(once.text, twice.text);
        assert_eq!(twice.report.naming.assigned, 0);
        assert_eq!(twice.report.inline.inlined, 0);
    }

    #[test]
    fn test_json_in_json_out() {
        let source = r#"{"paths": {"/": {"get": {"summary": "Root: index"}}}}"#;
        let config = TransformConfig::default();
        let normalized = normalize_text(source, &config).unwrap();

        assert_eq!(normalized.format, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&normalized.text).unwrap();
        assert_eq!(value["paths"]["/"]["get"]["operationId"], "getRoot");
        assert_eq!(value["paths"]["/"]["get"]["summary"], "Root: index");
    }

    #[test]
    fn test_malformed_input_fails() {
        let config = TransformConfig::default();
        let err = normalize_text("paths:\n  /a: [\n", &config).unwrap_err();
        assert!(matches!(err, TransformError::Parse(_)));
    }
}
