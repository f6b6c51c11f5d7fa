//! Lexical repair of `description:` lines that YAML cannot parse.
//!
//! Some published specs carry lines like `description: Note: ids are opaque`.
//! A plain scalar may not contain `: `, so the parser rejects the whole file.
//! This pass wraps such values in single quotes before parsing. Detection is
//! line based and does not understand YAML structure: only a `description`
//! key at the start of a line or of a sequence entry is considered.

use std::borrow::Cow;

const DESCRIPTION_KEY: &str = "description:";
const SEQUENCE_ENTRY: &str = "- ";

/// Quote every unquoted `description:` value that contains `: `.
///
/// Other lines are returned byte-for-byte, and running the pass again on its
/// own output changes nothing.
pub fn repair_description_quoting(text: &str) -> String {
    text.split('\n')
        .map(repair_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn repair_line(line: &str) -> Cow<'_, str> {
    let (body, line_end) = match line.strip_suffix('\r') {
        Some(body) => (body, "\r"),
        None => (line, ""),
    };

    let mut entry = body.trim_start();
    while let Some(item) = entry.strip_prefix(SEQUENCE_ENTRY) {
        entry = item.trim_start();
    }
    let Some(rest) = entry.strip_prefix(DESCRIPTION_KEY) else {
        return Cow::Borrowed(line);
    };
    if !rest.contains(": ") {
        return Cow::Borrowed(line);
    }

    let value = rest.trim();
    if value.starts_with('\'') || value.starts_with('"') {
        return Cow::Borrowed(line);
    }

    // Indent plus any `- ` marker, kept byte-for-byte.
    let lead = &body[..body.len() - entry.len()];
    let escaped = value.replace('\'', "''");

    Cow::Owned(format!("{lead}{DESCRIPTION_KEY} '{escaped}'{line_end}"))
}
