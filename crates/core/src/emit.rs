//! Document emission with explicit control over string quoting.
//!
//! `serde_yaml` picks scalar styles on its own. Generators downstream choke on
//! plain scalars containing `: `, so YAML is emitted here by hand:
//!
//! - block style, two-space indent, sequences under a key are not indented
//! - mapping keys in insertion order
//! - strings matching the [`QuotingPolicy`] are single-quoted
//! - other strings are plain when they read back as the same string, quoted otherwise
//! - non-ASCII text is written as-is

use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};

use crate::error::EmitError;

const INDENT: usize = 2;

/// Characters that cannot start a plain scalar.
const INDICATORS: &str = "-?:,[]{}#&*!|>'\"%@`";

/// Words that YAML 1.1 readers resolve to booleans or merge keys.
const YAML11_WORDS: &[&str] = &["y", "n", "yes", "no", "on", "off", "<<"];

/// Which strings must be written in single-quoted style.
#[derive(Debug, Clone)]
pub struct QuotingPolicy {
    substrings: Vec<String>,
    prefixes: Vec<String>,
}

impl Default for QuotingPolicy {
    /// Quote strings containing `": "` or starting with `Deprecated`.
    fn default() -> Self {
        Self::none().with_substring(": ").with_prefix("Deprecated")
    }
}

impl QuotingPolicy {
    /// A policy that forces nothing; every string gets its natural style.
    pub fn none() -> Self {
        Self {
            substrings: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    /// Also force quoting of strings containing `needle`.
    pub fn with_substring(mut self, needle: impl Into<String>) -> Self {
        self.substrings.push(needle.into());
        self
    }

    /// Also force quoting of strings starting with `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Whether `text` must be emitted quoted.
    pub fn forces_quotes(&self, text: &str) -> bool {
        self.substrings.iter().any(|needle| text.contains(needle.as_str()))
            || self
                .prefixes
                .iter()
                .any(|prefix| text.starts_with(prefix.as_str()))
    }
}

/// Text format of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Block-style YAML under a [`QuotingPolicy`].
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Guess the format of source text: a leading `{` means JSON.
    pub fn detect(text: &str) -> Self {
        if text.trim_start_matches('\u{feff}').trim_start().starts_with('{') {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

/// Render `root` in `format`. The policy only applies to YAML.
pub fn render(
    root: &Value,
    format: OutputFormat,
    policy: &QuotingPolicy,
) -> Result<String, EmitError> {
    match format {
        OutputFormat::Yaml => to_yaml_string(root, policy),
        OutputFormat::Json => to_json_string(root),
    }
}

/// Render `root` as YAML text ending in a newline.
pub fn to_yaml_string(root: &Value, policy: &QuotingPolicy) -> Result<String, EmitError> {
    let mut emitter = Emitter {
        out: String::new(),
        policy,
        location: Vec::new(),
    };
    emitter.document(root)?;
    Ok(emitter.out)
}

/// Render `root` as pretty-printed JSON ending in a newline.
pub fn to_json_string(root: &Value) -> Result<String, EmitError> {
    let mut out = serde_json::to_string_pretty(root)?;
    out.push('\n');
    Ok(out)
}

struct Emitter<'a> {
    out: String,
    policy: &'a QuotingPolicy,
    location: Vec<String>,
}

impl Emitter<'_> {
    fn document(&mut self, root: &Value) -> Result<(), EmitError> {
        match root {
            Value::Mapping(mapping) if !mapping.is_empty() => self.block_mapping(mapping, 0, false),
            Value::Sequence(items) if !items.is_empty() => self.block_sequence(items, 0, false),
            Value::Tagged(tagged) => self.tagged(tagged, 0),
            _ => self.scalar_line(root),
        }
    }

    /// Entries at `indent`; with `inline_first` the first entry continues the current line.
    fn block_mapping(
        &mut self,
        mapping: &Mapping,
        indent: usize,
        inline_first: bool,
    ) -> Result<(), EmitError> {
        for (index, (key, value)) in mapping.iter().enumerate() {
            if index > 0 || !inline_first {
                self.write_indent(indent);
            }
            let key = self.key(key)?;
            self.out.push_str(&key);
            self.out.push(':');

            self.location.push(key);
            match value {
                Value::Mapping(nested) if !nested.is_empty() => {
                    self.out.push('\n');
                    self.block_mapping(nested, indent + INDENT, false)?;
                }
                Value::Sequence(items) if !items.is_empty() => {
                    self.out.push('\n');
                    self.block_sequence(items, indent, false)?;
                }
                Value::Tagged(tagged) => {
                    self.out.push(' ');
                    self.tagged(tagged, indent)?;
                }
                _ => {
                    self.out.push(' ');
                    self.scalar_line(value)?;
                }
            }
            self.location.pop();
        }
        Ok(())
    }

    fn block_sequence(
        &mut self,
        items: &[Value],
        indent: usize,
        inline_first: bool,
    ) -> Result<(), EmitError> {
        for (index, item) in items.iter().enumerate() {
            if index > 0 || !inline_first {
                self.write_indent(indent);
            }
            self.out.push_str("- ");

            self.location.push(format!("[{index}]"));
            match item {
                Value::Mapping(mapping) if !mapping.is_empty() => {
                    self.block_mapping(mapping, indent + INDENT, true)?;
                }
                Value::Sequence(nested) if !nested.is_empty() => {
                    self.block_sequence(nested, indent + INDENT, true)?;
                }
                Value::Tagged(tagged) => self.tagged(tagged, indent)?,
                _ => self.scalar_line(item)?,
            }
            self.location.pop();
        }
        Ok(())
    }

    fn tagged(&mut self, tagged: &TaggedValue, indent: usize) -> Result<(), EmitError> {
        self.out.push_str(&tagged.tag.to_string());
        match &tagged.value {
            Value::Mapping(mapping) if !mapping.is_empty() => {
                self.out.push('\n');
                self.block_mapping(mapping, indent + INDENT, false)
            }
            Value::Sequence(items) if !items.is_empty() => {
                self.out.push('\n');
                self.block_sequence(items, indent + INDENT, false)
            }
            value => {
                self.out.push(' ');
                self.scalar_line(value)
            }
        }
    }

    fn scalar_line(&mut self, value: &Value) -> Result<(), EmitError> {
        let text = self.scalar(value);
        self.out.push_str(&text);
        self.out.push('\n');
        Ok(())
    }

    fn key(&self, key: &Value) -> Result<String, EmitError> {
        match key {
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                Ok(self.scalar(key))
            }
            Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
                Err(EmitError::ComplexKey {
                    location: self.location(),
                })
            }
        }
    }

    /// Inline form of a scalar. Collections only reach here when empty.
    fn scalar(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number.to_string(),
            Value::String(text) => self.string(text),
            Value::Sequence(_) => "[]".to_string(),
            Value::Mapping(_) => "{}".to_string(),
            Value::Tagged(tagged) => format!("{} {}", tagged.tag, self.scalar(&tagged.value)),
        }
    }

    fn string(&self, text: &str) -> String {
        if !self.policy.forces_quotes(text) && is_plain_safe(text) {
            text.to_string()
        } else if can_single_quote(text) {
            single_quoted(text)
        } else {
            double_quoted(text)
        }
    }

    fn write_indent(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat_n(' ', indent));
    }

    fn location(&self) -> String {
        if self.location.is_empty() {
            "<root>".to_string()
        } else {
            self.location.join(".")
        }
    }
}

fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}')
}

fn is_plain_safe(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    if INDICATORS.contains(first) || text.trim() != text || text.chars().any(needs_escape) {
        return false;
    }
    if text.contains(": ") || text.contains(" #") || text.ends_with(':') {
        return false;
    }
    if YAML11_WORDS.contains(&text.to_ascii_lowercase().as_str()) {
        return false;
    }
    // Dates and sexagesimal numbers in YAML 1.1.
    if first.is_ascii_digit() && text.contains(['-', ':']) {
        return false;
    }
    // Anything the parser would read as a number, bool, null or structure is quoted.
    matches!(serde_yaml::from_str::<Value>(text), Ok(Value::String(parsed)) if parsed == text)
}

fn can_single_quote(text: &str) -> bool {
    !text.chars().any(needs_escape)
}

fn single_quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if needs_escape(c) => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
