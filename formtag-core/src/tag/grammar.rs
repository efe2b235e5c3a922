//! `{{TYPE:NAME|OPTION...}}` grammar

use super::normalize::{
    collapse_whitespace, normalize_option_key, normalize_text, remove_whitespace,
    trailing_keyword,
};
use crate::error::{FormError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

lazy_static! {
    static ref SPACED_OPEN: Regex = Regex::new(r"^\{\s*\{").unwrap();
    static ref SPACED_CLOSE: Regex = Regex::new(r"\}\s*\}$").unwrap();
}

/// Keys whose values are viewer scripts and may hold a `/regex/` literal
const SCRIPT_KEYS: &[&str] = &["calculation", "validation"];
/// Keys whose values are human-readable text
const TEXT_KEYS: &[&str] = &["value", "default", "label", "tooltip", "data", "url", "options"];

/// One `|`-separated option token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawOption {
    /// Bare token such as `required`
    Flag(String),
    /// `KEY:VALUE` pair
    Pair { key: String, value: String },
}

impl RawOption {
    pub fn key(&self) -> &str {
        match self {
            RawOption::Flag(key) => key,
            RawOption::Pair { key, .. } => key,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            RawOption::Flag(_) => None,
            RawOption::Pair { value, .. } => Some(value),
        }
    }
}

impl fmt::Display for RawOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawOption::Flag(key) => f.write_str(key),
            RawOption::Pair { key, value } => write!(f, "{key}:{value}"),
        }
    }
}

/// Parsed tag before any semantic resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Lowercased type keyword
    pub field_type: String,
    /// Field name, case preserved
    pub name: String,
    /// Options in source order
    pub options: Vec<RawOption>,
}

impl FieldDescriptor {
    pub fn new(field_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into().to_lowercase(),
            name: name.into(),
            options: Vec::new(),
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.options.push(RawOption::Flag(flag.into().to_lowercase()));
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(RawOption::Pair {
            key: key.into().to_lowercase(),
            value: value.into(),
        });
        self
    }

    /// Tag text that parses back into this descriptor
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}:{}", self.field_type, self.name)?;
        for option in &self.options {
            write!(f, "|{option}")?;
        }
        f.write_str("}}")
    }
}

/// Parse raw matched text into a [`FieldDescriptor`].
///
/// TYPE and option keys are case-insensitive; NAME and values keep their case.
pub fn parse_tag(raw: &str) -> Result<FieldDescriptor> {
    let cleaned = normalize_text(raw.trim());
    let cleaned = SPACED_OPEN.replace(&cleaned, "{{");
    let cleaned = SPACED_CLOSE.replace(&cleaned, "}}");

    if !cleaned.starts_with("{{") {
        return Err(FormError::malformed(raw, "missing opening '{{'"));
    }
    if cleaned.len() < 4 || !cleaned.ends_with("}}") {
        return Err(FormError::malformed(raw, "unterminated tag"));
    }
    let inner = &cleaned[2..cleaned.len() - 2];
    if inner.contains("{{") || inner.contains("}}") {
        return Err(FormError::malformed(raw, "nested tag delimiter"));
    }

    let colon = inner
        .find(':')
        .ok_or_else(|| FormError::malformed(raw, "missing ':' between type and name"))?;
    let field_type = remove_whitespace(&inner[..colon]).to_lowercase();
    if field_type.contains('|') {
        return Err(FormError::malformed(raw, "missing ':' between type and name"));
    }
    if field_type.is_empty() {
        return Err(FormError::malformed(raw, "empty field type"));
    }

    let mut segments = split_options(&inner[colon + 1..]).into_iter();
    let head = remove_whitespace(&segments.next().unwrap_or_default());
    let mut options = Vec::new();

    let name = match head.split_once(':') {
        None => head,
        Some((before, after)) => {
            // A lost '|' glues the first option onto the name: `countryoptions:A,B`
            match trailing_keyword(before) {
                Some(key) if before.len() > key.len() => {
                    let name = before[..before.len() - key.len()].to_string();
                    options.push(parse_option(raw, &format!("{key}:{after}"))?);
                    name
                }
                _ => return Err(FormError::malformed(raw, "field name may not contain ':'")),
            }
        }
    };
    if name.is_empty() {
        return Err(FormError::malformed(raw, "empty field name"));
    }

    for segment in segments {
        if segment.trim().is_empty() {
            continue;
        }
        options.push(parse_option(raw, &segment)?);
    }

    Ok(FieldDescriptor {
        field_type,
        name,
        options,
    })
}

fn parse_option(raw: &str, segment: &str) -> Result<RawOption> {
    match segment.split_once(':') {
        None => Ok(RawOption::Flag(normalize_option_key(segment))),
        Some((key, value)) => {
            let key = normalize_option_key(key);
            if key.is_empty() {
                return Err(FormError::malformed(raw, "empty option key"));
            }
            let value = if SCRIPT_KEYS.contains(&key.as_str()) {
                value.trim().to_string()
            } else if TEXT_KEYS.contains(&key.as_str()) {
                collapse_whitespace(value)
            } else {
                remove_whitespace(value)
            };
            Ok(RawOption::Pair { key, value })
        }
    }
}

/// Split on `|`, keeping a script value's `/regex/` literal in one piece.
fn split_options(rest: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut open_literal = false;

    for piece in rest.split('|') {
        if open_literal {
            if let Some(last) = segments.last_mut() {
                last.push('|');
                last.push_str(piece);
                open_literal = !regex_literal_closed(script_value(last).unwrap_or_default());
                continue;
            }
        }
        segments.push(piece.to_string());
        if let Some(value) = segments.last().and_then(|s| script_value(s)) {
            open_literal = value.starts_with('/') && !regex_literal_closed(value);
        }
    }

    segments
}

fn script_value(segment: &str) -> Option<&str> {
    let (key, value) = segment.split_once(':')?;
    let key = normalize_option_key(key);
    SCRIPT_KEYS
        .contains(&key.as_str())
        .then(|| value.trim_start())
}

/// Whether a value starting with `/` already contains its closing slash.
fn regex_literal_closed(value: &str) -> bool {
    let mut slashes = 0;
    let mut escaped = false;
    for c in value.chars() {
        match c {
            '\\' if !escaped => escaped = true,
            '/' if !escaped => {
                slashes += 1;
                escaped = false;
            }
            _ => escaped = false,
        }
    }
    slashes >= 2
}
