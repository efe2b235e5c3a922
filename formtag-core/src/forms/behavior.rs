//! Viewer scripts attached to text widgets
//!
//! Scripts are opaque text for the reading application. Nothing here runs
//! or checks them beyond recognising a `/regex/` literal.

use super::registry::BehaviorTemplate;
use crate::actions::ScriptTrigger;
use crate::geometry::Rectangle;
use serde::Serialize;

/// Average glyph advance as a fraction of the font size
const CHAR_WIDTH_FACTOR: f64 = 0.55;
/// Line height as a multiple of the font size
const LINE_HEIGHT_FACTOR: f64 = 1.3;

/// Scripts bound to one field, at most one per trigger
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Behavior {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculate: Option<String>,
}

impl Behavior {
    pub fn is_empty(&self) -> bool {
        self.scripts().next().is_none()
    }

    /// Scripts in trigger order
    pub fn scripts(&self) -> impl Iterator<Item = (ScriptTrigger, &str)> {
        [
            (ScriptTrigger::Keystroke, &self.keystroke),
            (ScriptTrigger::Format, &self.format),
            (ScriptTrigger::Validate, &self.validate),
            (ScriptTrigger::Calculate, &self.calculate),
        ]
        .into_iter()
        .filter_map(|(trigger, script)| script.as_deref().map(|s| (trigger, s)))
    }

    /// Append `script` to the keystroke handler
    pub fn add_keystroke(&mut self, script: &str) {
        self.keystroke = Some(match self.keystroke.take() {
            Some(existing) => format!("{existing}\n{script}"),
            None => script.to_string(),
        });
    }

    /// Format and keystroke scripts for a template
    pub fn from_template(template: BehaviorTemplate) -> Self {
        let (format, keystroke) = match template {
            BehaviorTemplate::Date => date_scripts("yyyy-mm-dd"),
            BehaviorTemplate::Time => date_scripts("HH:MM"),
            BehaviorTemplate::DateTime => date_scripts("yyyy-mm-dd HH:MM"),
            BehaviorTemplate::Integer => number_scripts(0, ""),
            BehaviorTemplate::Decimal => number_scripts(2, ""),
            BehaviorTemplate::Currency => number_scripts(2, "$"),
            BehaviorTemplate::Percent => (
                Some("AFPercent_Format(2, 0);".to_string()),
                Some("AFPercent_Keystroke(2, 0);".to_string()),
            ),
            BehaviorTemplate::Email => {
                return Self {
                    validate: Some(pattern_check(r"/^\S+@\S+\.\S+$/.test(event.value)")),
                    ..Self::default()
                }
            }
            BehaviorTemplate::Phone => {
                return Self {
                    validate: Some(pattern_check(
                        r#"/^\d{10}$/.test(event.value.replace(/\D/g, ""))"#,
                    )),
                    ..Self::default()
                }
            }
            BehaviorTemplate::None | BehaviorTemplate::Calculation | BehaviorTemplate::Validation => {
                (None, None)
            }
        };
        Self {
            format,
            keystroke,
            ..Self::default()
        }
    }
}

fn date_scripts(pattern: &str) -> (Option<String>, Option<String>) {
    (
        Some(format!("AFDate_FormatEx(\"{pattern}\");")),
        Some(format!("AFDate_KeystrokeEx(\"{pattern}\");")),
    )
}

fn number_scripts(decimals: u8, currency: &str) -> (Option<String>, Option<String>) {
    let prepend = !currency.is_empty();
    let args = format!("{decimals}, 0, 0, 0, \"{currency}\", {prepend}");
    (
        Some(format!("AFNumber_Format({args});")),
        Some(format!("AFNumber_Keystroke({args});")),
    )
}

fn pattern_check(test: &str) -> String {
    format!("event.rc = {test} || event.value == \"\";")
}

/// Template named by a `format:` option value
pub fn template_for_format(format: &str) -> Option<BehaviorTemplate> {
    let template = match format {
        "date" => BehaviorTemplate::Date,
        "time" => BehaviorTemplate::Time,
        "datetime" => BehaviorTemplate::DateTime,
        "number" | "numeric" => BehaviorTemplate::Integer,
        "decimal" => BehaviorTemplate::Decimal,
        "currency" => BehaviorTemplate::Currency,
        "percent" => BehaviorTemplate::Percent,
        "email" => BehaviorTemplate::Email,
        "phone" => BehaviorTemplate::Phone,
        _ => return None,
    };
    Some(template)
}

/// Calculate script for `fragment`, with `$self` bound to the field name
pub fn calculation_script(fragment: &str, field_name: &str) -> String {
    let body = fragment.trim().replace("$self", field_name);
    if body.contains("event.value") {
        body
    } else {
        format!("event.value = ({body});")
    }
}

/// Validate script for `fragment`; a `/regex/flags` literal becomes a pattern test
pub fn validation_script(fragment: &str) -> String {
    let fragment = fragment.trim();
    match regex_literal(fragment) {
        Some(literal) => pattern_check(&format!("{literal}.test(event.value)")),
        None => fragment.to_string(),
    }
}

fn regex_literal(fragment: &str) -> Option<&str> {
    let body = fragment.strip_prefix('/')?;
    let close = body.rfind('/')?;
    let flags = &body[close + 1..];
    if close == 0 || !flags.chars().all(|c| "gimsuy".contains(c)) {
        return None;
    }
    Some(fragment)
}

/// Characters that fit in `rect` at `font_size`, `None` without a usable font size
pub fn estimate_max_length(rect: &Rectangle, font_size: f64, multiline: bool) -> Option<usize> {
    if !font_size.is_finite() || font_size <= 0.0 {
        return None;
    }
    let usable = (rect.width - 2.0).max(font_size);
    let per_line = ((usable / (font_size * CHAR_WIDTH_FACTOR)) as usize).max(1);
    if multiline {
        let lines = ((rect.height / (font_size * LINE_HEIGHT_FACTOR)) as usize).max(1);
        Some(per_line * lines)
    } else {
        Some(per_line)
    }
}

/// Keystroke guard rejecting input past `max_length` characters
pub fn length_guard(max_length: usize) -> String {
    format!(
        "if (!event.willCommit) {{ var selection = event.selEnd - event.selStart; \
         var replacement = event.change ? event.change.length : 0; \
         var projected = event.value.length - selection + replacement; \
         if (projected > {max_length}) {{ event.rc = false; }} }}"
    )
}
