//! Record frontmatter: rendering, splitting, and metadata parsing
//!
//! A record is a `---` delimited block of `key: value` lines followed by the
//! Markdown body. Metadata is parsed with two strategies in a fixed order:
//! 1. structured YAML
//! 2. a manual `key: value` line parser, for blocks that are not valid YAML
//!    (records written by older tools quote titles without escaping them)

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Metadata stored in a record header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMetadata {
    pub title: String,
    pub date: String,
    pub category: Option<String>,
    pub id: String,
    pub url: String,
}

/// Renders the header block, including the trailing blank line
pub fn render_frontmatter(meta: &RecordMetadata) -> String {
    let mut out = String::from("---\n");
    out.push_str(&format!("title: {}\n", quote(&meta.title)));
    out.push_str(&format!("date: {}\n", quote(&meta.date)));
    if let Some(category) = &meta.category {
        out.push_str(&format!("category: {}\n", quote(category)));
    }
    out.push_str(&format!("id: {}\n", meta.id));
    out.push_str(&format!("url: {}\n", quote(&meta.url)));
    out.push_str("---\n\n");
    out
}

/// Double-quotes a value, escaping what YAML requires
fn quote(value: &str) -> String {
    let single_line = value.replace(['\r', '\n'], " ");
    format!(
        "\"{}\"",
        single_line.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

fn delimiter() -> &'static Regex {
    static DELIMITER: OnceLock<Regex> = OnceLock::new();
    DELIMITER.get_or_init(|| Regex::new(r"(?m)^---[ \t]*\r?$").expect("delimiter pattern is valid"))
}

/// Splits a record into (metadata block, body)
///
/// The content is split on delimiter lines into at most three parts: whatever
/// precedes the header, the header, and the remainder as body. A body that
/// itself contains `---` lines is kept whole. Returns `None` without a header.
pub fn split_record(content: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = delimiter().splitn(content, 3).collect();
    if parts.len() < 3 || !parts[0].trim().is_empty() {
        return None;
    }
    let body = parts[2].trim_start_matches(['\r', '\n']);
    Some((parts[1], body))
}

/// Parses a metadata block into a key/value map
///
/// Structured YAML parsing is tried first; if the block is not a valid YAML
/// mapping, the manual line parser is used instead.
pub fn parse_metadata(text: &str) -> BTreeMap<String, String> {
    match parse_metadata_structured(text) {
        Some(map) => map,
        None => {
            tracing::debug!("Metadata is not valid YAML, falling back to line parsing");
            parse_metadata_lines(text)
        }
    }
}

/// Strategy 1: YAML mapping with scalar values rendered as strings
pub fn parse_metadata_structured(text: &str) -> Option<BTreeMap<String, String>> {
    let mapping: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(text).ok()?;
    Some(
        mapping
            .into_iter()
            .map(|(key, value)| (key, yaml_scalar_to_string(value)))
            .collect(),
    )
}

fn yaml_scalar_to_string(value: serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Strategy 2: split each line on its first colon and strip one pair of quotes
pub fn parse_metadata_lines(text: &str) -> BTreeMap<String, String> {
    let mut meta = BTreeMap::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        meta.insert(key.to_string(), unquote(value.trim()));
    }
    meta
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1]
            .replace("\\\"", "\"")
            .replace("\\\\", "\\")
    } else if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}
