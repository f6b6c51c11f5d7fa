//! `--check` support: show what normalization would change.

use similar::TextDiff;

/// Lines of unchanged context around each hunk.
const CONTEXT_LINES: usize = 3;

/// Unified diff from `current` to `normalized`, or `None` when they match.
///
/// Both sides are labelled with `label`, so the output reads like
/// `diff -u` run against the file and its normalized form.
pub fn render_diff(label: &str, current: &str, normalized: &str) -> Option<String> {
    if current == normalized {
        return None;
    }

    let old_header = format!("{label} (current)");
    let new_header = format!("{label} (normalized)");
    let diff = TextDiff::from_lines(current, normalized);

    Some(
        diff.unified_diff()
            .context_radius(CONTEXT_LINES)
            .header(&old_header, &new_header)
            .to_string(),
    )
}
