//! Form actions and additional-action triggers

use crate::objects::{Dictionary, Object};
use bitflags::bitflags;
use serde::Serialize;

/// PDF action types used by form widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    /// Submit form data
    SubmitForm,
    /// Reset form fields
    ResetForm,
    /// Execute JavaScript
    JavaScript,
}

impl ActionType {
    /// Convert to PDF name
    pub fn to_name(&self) -> &'static str {
        match self {
            ActionType::SubmitForm => "SubmitForm",
            ActionType::ResetForm => "ResetForm",
            ActionType::JavaScript => "JavaScript",
        }
    }
}

bitflags! {
    /// SubmitForm flags (ISO 32000-1 Table 237)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SubmitFlags: u32 {
        const INCLUDE_NO_VALUE_FIELDS = 1 << 1;
        const EXPORT_FORMAT = 1 << 2;
        const GET_METHOD = 1 << 3;
        const XFDF = 1 << 5;
        const SUBMIT_PDF = 1 << 8;
    }
}

/// Form action
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Run a viewer script
    JavaScript { script: String },
    /// Post field values to a URL
    SubmitForm { url: String, flags: SubmitFlags },
    /// Restore every field to its default value
    ResetForm,
}

impl Action {
    pub fn javascript(script: impl Into<String>) -> Self {
        Action::JavaScript {
            script: script.into(),
        }
    }

    /// Submit as HTML form data
    pub fn submit(url: impl Into<String>) -> Self {
        Action::SubmitForm {
            url: url.into(),
            flags: SubmitFlags::EXPORT_FORMAT,
        }
    }

    pub fn reset() -> Self {
        Action::ResetForm
    }

    pub fn action_type(&self) -> ActionType {
        match self {
            Action::JavaScript { .. } => ActionType::JavaScript,
            Action::SubmitForm { .. } => ActionType::SubmitForm,
            Action::ResetForm => ActionType::ResetForm,
        }
    }

    /// Convert to dictionary
    pub fn to_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("Action"));
        dict.set("S", Object::name(self.action_type().to_name()));

        match self {
            Action::JavaScript { script } => {
                dict.set("JS", Object::String(script.clone()));
            }
            Action::SubmitForm { url, flags } => {
                let mut file_spec = Dictionary::new();
                file_spec.set("FS", Object::name("URL"));
                file_spec.set("F", Object::String(url.clone()));
                dict.set("F", file_spec);
                dict.set("Flags", Object::Integer(flags.bits() as i64));
            }
            Action::ResetForm => {}
        }

        dict
    }
}

/// Field event that runs a script (`/AA` entries, ISO 32000-1 Table 196)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptTrigger {
    /// Each keystroke and on commit
    Keystroke,
    /// Before the value is displayed
    Format,
    /// After the value changes
    Validate,
    /// When another field changes
    Calculate,
}

impl ScriptTrigger {
    /// Key inside the additional-actions dictionary
    pub fn aa_key(&self) -> &'static str {
        match self {
            ScriptTrigger::Keystroke => "K",
            ScriptTrigger::Format => "F",
            ScriptTrigger::Validate => "V",
            ScriptTrigger::Calculate => "C",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_names() {
        assert_eq!(ActionType::SubmitForm.to_name(), "SubmitForm");
        assert_eq!(ActionType::ResetForm.to_name(), "ResetForm");
        assert_eq!(ActionType::JavaScript.to_name(), "JavaScript");
    }

    #[test]
    fn test_javascript_action() {
        let dict = Action::javascript("event.rc = true;").to_dict();
        assert_eq!(dict.get("Type"), Some(&Object::name("Action")));
        assert_eq!(dict.get("S"), Some(&Object::name("JavaScript")));
        assert_eq!(
            dict.get("JS"),
            Some(&Object::String("event.rc = true;".to_string()))
        );
    }

    #[test]
    fn test_submit_action() {
        let dict = Action::submit("https://example.com/submit").to_dict();
        assert_eq!(dict.get("S"), Some(&Object::name("SubmitForm")));
        let file_spec = dict.get_dict("F").unwrap();
        assert_eq!(file_spec.get("FS"), Some(&Object::name("URL")));
        assert_eq!(
            file_spec.get("F"),
            Some(&Object::String("https://example.com/submit".to_string()))
        );
        assert_eq!(dict.get("Flags"), Some(&Object::Integer(4)));
    }

    #[test]
    fn test_reset_action() {
        let dict = Action::reset().to_dict();
        assert_eq!(dict.get("S"), Some(&Object::name("ResetForm")));
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_trigger_keys() {
        assert_eq!(ScriptTrigger::Keystroke.aa_key(), "K");
        assert_eq!(ScriptTrigger::Format.aa_key(), "F");
        assert_eq!(ScriptTrigger::Validate.aa_key(), "V");
        assert_eq!(ScriptTrigger::Calculate.aa_key(), "C");
    }
}
