//! Inspection of `description` fields before re-serialization.
//!
//! Descriptions are not rewritten here. A value that would be unsafe as a
//! plain scalar (contains `: `) is counted, and the emitter's
//! [`QuotingPolicy`](crate::QuotingPolicy) quotes it on output.

use serde_yaml::Value;
use tracing::debug;

const DESCRIPTION_KEY: &str = "description";

/// Outcome of [`sanitize_descriptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// String-valued `description` fields seen.
    pub visited: usize,
    /// Descriptions that need quoting on output.
    pub flagged: usize,
}

/// Walk the whole tree and check every string `description` field.
///
/// The tree is left unchanged.
pub fn sanitize_descriptions(root: &mut Value) -> SanitizeReport {
    let mut report = SanitizeReport::default();
    walk(root, &mut report);
    debug!(
        visited = report.visited,
        flagged = report.flagged,
        "Checked descriptions"
    );
    report
}

fn walk(node: &mut Value, report: &mut SanitizeReport) {
    match node {
        Value::Mapping(mapping) => {
            for (key, value) in mapping.iter_mut() {
                if key.as_str() == Some(DESCRIPTION_KEY)
                    && let Some(text) = value.as_str()
                {
                    report.visited += 1;
                    if needs_quoting(text) {
                        report.flagged += 1;
                    }
                } else {
                    walk(value, report);
                }
            }
        }
        Value::Sequence(items) => {
            for item in items {
                walk(item, report);
            }
        }
        Value::Tagged(tagged) => walk(&mut tagged.value, report),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn needs_quoting(text: &str) -> bool {
    text.contains(": ") && !text.starts_with('\'') && !text.starts_with('"')
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptions_are_counted_and_left_alone() {
        let mut root: Value = serde_yaml::from_str(
            r#"
info:
  description: "Mail API: v1"
paths:
  /a:
    get:
      description: plain
      parameters:
        - description: "Id: opaque"
        - description: "'quoted: already'"
      responses:
        '200':
          description:
            nested: mapping
"#,
        )
        .unwrap();
        let before = root.clone();

        let report = sanitize_descriptions(&mut root);

        assert_eq!(
            report,
            SanitizeReport {
                visited: 4,
                flagged: 2,
            }
        );
        assert_eq!(root, before);
    }

    #[test]
    fn test_non_mapping_root() {
        let mut root = Value::String("description: x".to_string());
        assert_eq!(sanitize_descriptions(&mut root), SanitizeReport::default());
    }
}
