//! Option resolution against a category's option schema

use super::registry::FieldCategory;
use crate::error::FormError;
use crate::tag::{FieldDescriptor, RawOption};
use serde::Serialize;
use std::collections::BTreeMap;

/// Values accepted by `format:`
pub const FORMAT_NAMES: &[&str] = &[
    "date", "time", "datetime", "number", "numeric", "decimal", "currency", "percent", "email",
    "phone",
];

/// Typed option value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Number(f64),
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

/// Shape each known key's value must take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueShape {
    Number,
    Bool,
    Text,
    List,
    Format,
}

fn shape_of(key: &str) -> Option<ValueShape> {
    let shape = match key {
        "width" | "height" | "cellwidth" | "columnwidth" | "rowheight" => ValueShape::Number,
        "required" | "readonly" | "multi" | "checked" => ValueShape::Bool,
        "options" => ValueShape::List,
        "format" => ValueShape::Format,
        "value" | "default" | "tooltip" | "label" | "url" | "data" | "calculation"
        | "validation" => ValueShape::Text,
        _ => return None,
    };
    Some(shape)
}

/// Resolved option mapping, keyed by normalised option key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedOptions {
    values: BTreeMap<String, OptionValue>,
}

impl ResolvedOptions {
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        self.values.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(OptionValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Boolean option, false when absent
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(OptionValue::Bool(true)))
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(OptionValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key) {
            Some(OptionValue::List(items)) => Some(items),
            _ => None,
        }
    }

    /// Width override: `cellwidth`, then `columnwidth`, then `width`
    pub fn width_override(&self) -> Option<f64> {
        self.number("cellwidth")
            .or_else(|| self.number("columnwidth"))
            .or_else(|| self.number("width"))
    }

    /// Height override: `rowheight`, then `height`
    pub fn height_override(&self) -> Option<f64> {
        self.number("rowheight").or_else(|| self.number("height"))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.values.iter()
    }
}

/// Outcome of resolving one descriptor's options
#[derive(Debug, Default)]
pub struct Resolution {
    pub options: ResolvedOptions,
    /// `InvalidOptionValue` errors for options that were dropped
    pub issues: Vec<FormError>,
    /// Keys the category does not accept
    pub ignored: Vec<String>,
}

/// Interpret `descriptor`'s options against `category`'s schema.
///
/// Later duplicates override earlier ones. Invalid values are dropped and
/// reported; keys outside the schema are ignored.
pub fn resolve(descriptor: &FieldDescriptor, category: FieldCategory) -> Resolution {
    let schema = category.schema();
    let mut resolution = Resolution::default();

    for option in &descriptor.options {
        let key = option.key();
        let shape = match shape_of(key) {
            Some(shape) if schema.accepts(key) => shape,
            _ => {
                tracing::debug!(field = %descriptor.name, key, "ignoring option");
                if !resolution.ignored.iter().any(|k| k == key) {
                    resolution.ignored.push(key.to_string());
                }
                continue;
            }
        };

        match convert(option, shape) {
            Ok(value) => resolution.options.insert(key, value),
            Err(reason) => resolution.issues.push(FormError::InvalidOptionValue {
                field: descriptor.name.clone(),
                key: key.to_string(),
                value: option.value().unwrap_or_default().to_string(),
                reason,
            }),
        }
    }

    resolution
}

fn convert(option: &RawOption, shape: ValueShape) -> std::result::Result<OptionValue, String> {
    let raw = match (option, shape) {
        (RawOption::Flag(_), ValueShape::Bool) => return Ok(OptionValue::Bool(true)),
        (RawOption::Flag(_), _) => return Err("expects a value".to_string()),
        (RawOption::Pair { value, .. }, _) => value.as_str(),
    };

    match shape {
        ValueShape::Number => parse_dimension(raw).map(OptionValue::Number),
        ValueShape::Bool => parse_bool(raw).map(OptionValue::Bool),
        ValueShape::List => {
            let items = split_list(raw);
            if items.is_empty() {
                Err("option list is empty".to_string())
            } else {
                Ok(OptionValue::List(items))
            }
        }
        ValueShape::Format => {
            let format = raw.trim().to_lowercase();
            if FORMAT_NAMES.contains(&format.as_str()) {
                Ok(OptionValue::Text(format))
            } else {
                Err(format!("unknown format, expected one of {}", FORMAT_NAMES.join(", ")))
            }
        }
        ValueShape::Text => Ok(OptionValue::Text(raw.to_string())),
    }
}

/// Positive finite number; a decimal comma is accepted
pub fn parse_dimension(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| "not a number".to_string())?;
    if !value.is_finite() || value <= 0.0 {
        return Err("must be a positive number".to_string());
    }
    Ok(value)
}

fn parse_bool(raw: &str) -> std::result::Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "" | "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}

/// Comma-separated list, trimmed, empty items dropped, order kept
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn descriptor(options: &[(&str, Option<&str>)]) -> FieldDescriptor {
        options
            .iter()
            .fold(FieldDescriptor::new("textbox", "f"), |d, (k, v)| match v {
                Some(v) => d.with_option(*k, *v),
                None => d.with_flag(*k),
            })
    }

    #[test]
    fn test_numeric_and_flag_options() {
        let d = descriptor(&[("required", None), ("width", Some("200"))]);
        let resolution = resolve(&d, FieldCategory::Text);
        assert!(resolution.issues.is_empty());
        assert!(resolution.options.flag("required"));
        assert_eq!(resolution.options.number("width"), Some(200.0));
        assert_eq!(resolution.options.width_override(), Some(200.0));
        assert_eq!(resolution.options.height_override(), None);
    }

    #[test]
    fn test_decimal_comma() {
        let d = descriptor(&[("height", Some("12,5"))]);
        assert_eq!(resolve(&d, FieldCategory::Text).options.number("height"), Some(12.5));
    }

    #[test]
    fn test_invalid_numbers_are_dropped() {
        for bad in ["-3", "0", "wide", "NaN", "inf"] {
            let d = descriptor(&[("width", Some(bad))]);
            let resolution = resolve(&d, FieldCategory::Text);
            assert!(resolution.options.is_empty(), "{bad}");
            match &resolution.issues[..] {
                [FormError::InvalidOptionValue { key, value, .. }] => {
                    assert_eq!(key, "width");
                    assert_eq!(value, bad);
                }
                other => panic!("{bad}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_last_duplicate_wins() {
        let d = descriptor(&[("width", Some("100")), ("width", Some("150"))]);
        assert_eq!(resolve(&d, FieldCategory::Text).options.number("width"), Some(150.0));
    }

    #[test]
    fn test_invalid_duplicate_keeps_earlier_value() {
        let d = descriptor(&[("width", Some("100")), ("width", Some("-1"))]);
        let resolution = resolve(&d, FieldCategory::Text);
        assert_eq!(resolution.options.number("width"), Some(100.0));
        assert_eq!(resolution.issues.len(), 1);
    }

    #[test]
    fn test_option_list() {
        let d = descriptor(&[("options", Some(" USA, Canada ,,Mexico "))]);
        let resolution = resolve(&d, FieldCategory::Choice);
        assert_eq!(
            resolution.options.list("options"),
            Some(&["USA".to_string(), "Canada".to_string(), "Mexico".to_string()][..])
        );
    }

    #[test]
    fn test_empty_option_list_rejected() {
        let d = descriptor(&[("options", Some(" , "))]);
        let resolution = resolve(&d, FieldCategory::Choice);
        assert!(!resolution.options.contains("options"));
        assert_eq!(resolution.issues.len(), 1);
    }

    #[test]
    fn test_keys_outside_schema_are_ignored() {
        let d = descriptor(&[("options", Some("A,B")), ("colour", Some("red"))]);
        let resolution = resolve(&d, FieldCategory::Text);
        assert!(resolution.options.is_empty());
        assert!(resolution.issues.is_empty());
        assert_eq!(resolution.ignored, vec!["options".to_string(), "colour".to_string()]);
    }

    #[test]
    fn test_boolean_spellings() {
        let d = descriptor(&[("required", Some("no")), ("readonly", Some("Yes"))]);
        let resolution = resolve(&d, FieldCategory::Text);
        assert!(!resolution.options.flag("required"));
        assert!(resolution.options.flag("readonly"));
    }

    #[test]
    fn test_flag_on_valued_key_is_invalid() {
        let d = descriptor(&[("width", None)]);
        let resolution = resolve(&d, FieldCategory::Text);
        assert_eq!(resolution.issues.len(), 1);
    }

    #[test]
    fn test_width_precedence() {
        let d = descriptor(&[
            ("width", Some("10")),
            ("columnwidth", Some("20")),
            ("cellwidth", Some("30")),
            ("height", Some("5")),
            ("rowheight", Some("7")),
        ]);
        let options = resolve(&d, FieldCategory::Text).options;
        assert_eq!(options.width_override(), Some(30.0));
        assert_eq!(options.height_override(), Some(7.0));
    }

    #[test]
    fn test_format_names() {
        let d = descriptor(&[("format", Some("Currency"))]);
        assert_eq!(resolve(&d, FieldCategory::Text).options.text("format"), Some("currency"));

        let d = descriptor(&[("format", Some("roman"))]);
        assert_eq!(resolve(&d, FieldCategory::Text).issues.len(), 1);
    }

    #[test]
    fn test_scripts_are_captured_verbatim() {
        let d = descriptor(&[("calculation", Some("price * qty"))]);
        let options = resolve(&d, FieldCategory::Text).options;
        assert_eq!(options.text("calculation"), Some("price * qty"));
    }
}
