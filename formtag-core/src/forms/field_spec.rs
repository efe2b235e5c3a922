//! Fully resolved field, ready to render

use super::behavior::{calculation_script, template_for_format, validation_script, Behavior};
use super::field::FieldFlags;
use super::options::{resolve, ResolvedOptions};
use super::registry::{self, BehaviorTemplate, FieldCategory, FieldKind, KindTraits, WidgetKind};
use crate::error::{FormError, Result};
use crate::tag::FieldDescriptor;
use serde::Serialize;

/// Descriptor plus everything the registry and option resolver derived from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub descriptor: FieldDescriptor,
    #[serde(skip)]
    pub kind: FieldKind,
    pub category: FieldCategory,
    pub widget: WidgetKind,
    pub options: ResolvedOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<Behavior>,
}

/// A resolved field together with the tolerant problems found on the way
#[derive(Debug)]
pub struct ResolvedField {
    pub spec: FieldSpec,
    /// Options that were dropped as invalid
    pub issues: Vec<FormError>,
    /// Non-error observations worth reporting
    pub notes: Vec<String>,
}

impl FieldSpec {
    /// Classify and resolve a parsed descriptor.
    ///
    /// Fails only for an unknown type keyword; bad option values are
    /// returned in [`ResolvedField::issues`].
    pub fn resolve(descriptor: FieldDescriptor) -> Result<ResolvedField> {
        let kind = *registry::lookup(&descriptor.field_type)?;
        let resolution = resolve(&descriptor, kind.category);

        let mut notes: Vec<String> = resolution
            .ignored
            .iter()
            .map(|key| format!("option '{key}' is not used by {} fields", kind.category))
            .collect();

        let options = resolution.options;
        let behavior = match kind.widget {
            WidgetKind::Text => build_behavior(&descriptor.name, &kind, &options, &mut notes),
            _ => None,
        };

        match kind.widget {
            WidgetKind::ComboBox | WidgetKind::ListBox if options.list("options").is_none() => {
                notes.push("no options given; the choice list is empty".to_string())
            }
            WidgetKind::SubmitButton if options.text("url").is_none() => {
                notes.push("submit button has no url and will not submit".to_string())
            }
            _ => {}
        }

        Ok(ResolvedField {
            spec: FieldSpec {
                category: kind.category,
                widget: kind.widget,
                descriptor,
                kind,
                options,
                behavior,
            },
            issues: resolution.issues,
            notes,
        })
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn keyword(&self) -> &str {
        self.kind.keyword
    }

    pub fn has_trait(&self, traits: KindTraits) -> bool {
        self.kind.traits.contains(traits)
    }

    pub fn required(&self) -> bool {
        self.has_trait(KindTraits::REQUIRED) || self.options.flag("required")
    }

    pub fn read_only(&self) -> bool {
        self.widget != WidgetKind::Signature
            && (self.has_trait(KindTraits::READ_ONLY) || self.options.flag("readonly"))
    }

    pub fn multiline(&self) -> bool {
        self.has_trait(KindTraits::MULTILINE)
    }

    pub fn hidden(&self) -> bool {
        self.has_trait(KindTraits::HIDDEN)
    }

    /// Flags shared by every field type
    pub fn common_flags(&self) -> FieldFlags {
        let mut flags = FieldFlags::empty();
        flags.set(FieldFlags::REQUIRED, self.required());
        flags.set(FieldFlags::READ_ONLY, self.read_only());
        flags
    }

    /// Initial value: `value`, or `data` for barcode kinds
    pub fn value(&self) -> Option<&str> {
        self.options.text("value").or_else(|| {
            if self.has_trait(KindTraits::BARCODE) {
                self.options.text("data")
            } else {
                None
            }
        })
    }

    pub fn default_value(&self) -> Option<&str> {
        self.options.text("default")
    }

    pub fn tooltip(&self) -> Option<&str> {
        match self.options.text("tooltip") {
            Some(tooltip) => Some(tooltip),
            None if self.widget == WidgetKind::Signature => Some("Sign here"),
            None => None,
        }
    }

    pub fn choices(&self) -> &[String] {
        self.options.list("options").unwrap_or(&[])
    }

    /// Value a choice widget starts with: `default`, else `value`, else the first option
    pub fn initial_choice(&self) -> Option<&str> {
        self.default_value()
            .or_else(|| self.options.text("value"))
            .or_else(|| self.choices().first().map(String::as_str))
    }

    /// On-state name for checkbox and radio widgets
    pub fn export_value(&self) -> String {
        normalize_export_value(self.options.text("value").unwrap_or_default())
    }

    pub fn checked(&self) -> bool {
        self.options.flag("checked")
    }

    /// Caption for button widgets
    pub fn caption(&self) -> String {
        if let Some(label) = self.options.text("label") {
            return label.to_string();
        }
        match self.widget {
            WidgetKind::SubmitButton => "Submit",
            WidgetKind::ResetButton => "Reset",
            _ => "Button",
        }
        .to_string()
    }

    pub fn url(&self) -> Option<&str> {
        self.options.text("url").filter(|url| !url.is_empty())
    }
}

fn build_behavior(
    name: &str,
    kind: &FieldKind,
    options: &ResolvedOptions,
    notes: &mut Vec<String>,
) -> Option<Behavior> {
    let template = options
        .text("format")
        .and_then(template_for_format)
        .unwrap_or(kind.template);
    let mut behavior = Behavior::from_template(template);

    match options.text("calculation") {
        Some(fragment) if !fragment.is_empty() => {
            behavior.calculate = Some(calculation_script(fragment, name))
        }
        _ if kind.template == BehaviorTemplate::Calculation => {
            notes.push("calculated field has no calculation".to_string())
        }
        _ => {}
    }

    match options.text("validation") {
        Some(fragment) if !fragment.is_empty() => {
            behavior.validate = Some(validation_script(fragment))
        }
        _ if kind.template == BehaviorTemplate::Validation => {
            notes.push("validation field has no validation".to_string())
        }
        _ => {}
    }

    (!behavior.is_empty()).then_some(behavior)
}

/// Alphanumeric token with a capitalised first letter; `Yes` when nothing is left
pub fn normalize_export_value(raw: &str) -> String {
    let token: String = raw.chars().filter(|c| c.is_alphanumeric()).collect();
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Yes".to_string(),
    }
}
