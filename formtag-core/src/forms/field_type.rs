//! Form field types according to ISO 32000-1 Section 12.7.4

use super::field::FieldFlags;
use crate::objects::{Dictionary, Object};

/// Type of form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Button field (push button, checkbox, radio button)
    Button,
    /// Text field
    Text,
    /// Choice field (list box, combo box)
    Choice,
    /// Signature field
    Signature,
}

impl FieldType {
    /// Get the PDF field type name
    pub fn pdf_name(&self) -> &'static str {
        match self {
            FieldType::Button => "Btn",
            FieldType::Text => "Tx",
            FieldType::Choice => "Ch",
            FieldType::Signature => "Sig",
        }
    }
}

fn base_dict(field_type: FieldType, name: &str, flags: FieldFlags) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("FT", Object::name(field_type.pdf_name()));
    dict.set("T", Object::String(name.to_string()));
    if !flags.is_empty() {
        dict.set("Ff", Object::Integer(flags.to_flags()));
    }
    dict
}

/// Text field for entering text
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub name: String,
    pub default_value: Option<String>,
    pub value: Option<String>,
    pub max_length: Option<usize>,
    pub flags: FieldFlags,
}

impl TextField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: None,
            value: None,
            max_length: None,
            flags: FieldFlags::empty(),
        }
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn multiline(self) -> Self {
        self.with_flags(FieldFlags::MULTILINE)
    }

    pub fn password(self) -> Self {
        self.with_flags(FieldFlags::PASSWORD)
    }

    /// Convert to field dictionary
    pub fn to_dict(&self) -> Dictionary {
        let mut dict = base_dict(FieldType::Text, &self.name, self.flags);

        if let Some(ref default) = self.default_value {
            dict.set("DV", Object::String(default.clone()));
        }
        if let Some(ref value) = self.value {
            dict.set("V", Object::String(value.clone()));
        }
        if let Some(max_len) = self.max_length {
            dict.set("MaxLen", Object::Integer(max_len as i64));
        }

        dict
    }
}

/// Push button field (also used for submit and reset buttons)
#[derive(Debug, Clone, PartialEq)]
pub struct PushButton {
    pub name: String,
    pub caption: Option<String>,
    pub flags: FieldFlags,
}

impl PushButton {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            caption: None,
            flags: FieldFlags::PUSHBUTTON,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Convert to field dictionary; the caption lives on the widget
    pub fn to_dict(&self) -> Dictionary {
        base_dict(FieldType::Button, &self.name, self.flags)
    }
}

/// Checkbox field
#[derive(Debug, Clone, PartialEq)]
pub struct CheckBox {
    pub name: String,
    pub checked: bool,
    /// Export value when checked
    pub export_value: String,
    pub flags: FieldFlags,
}

impl CheckBox {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checked: false,
            export_value: "Yes".to_string(),
            flags: FieldFlags::empty(),
        }
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    pub fn with_export_value(mut self, value: impl Into<String>) -> Self {
        self.export_value = value.into();
        self
    }

    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn to_dict(&self) -> Dictionary {
        let mut dict = base_dict(FieldType::Button, &self.name, self.flags);
        let state = if self.checked {
            self.export_value.as_str()
        } else {
            "Off"
        };
        dict.set("V", Object::name(state));
        dict
    }
}

/// Radio button group; each option is one widget
#[derive(Debug, Clone, PartialEq)]
pub struct RadioButton {
    pub name: String,
    /// Export values in widget order
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub flags: FieldFlags,
}

impl RadioButton {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            selected: None,
            flags: FieldFlags::RADIO | FieldFlags::NO_TOGGLE_TO_OFF,
        }
    }

    pub fn add_option(mut self, export_value: impl Into<String>) -> Self {
        self.options.push(export_value.into());
        self
    }

    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn to_dict(&self) -> Dictionary {
        let mut dict = base_dict(FieldType::Button, &self.name, self.flags);
        let value = self
            .selected
            .and_then(|index| self.options.get(index))
            .map_or("Off", String::as_str);
        dict.set("V", Object::name(value));
        dict
    }
}

fn options_array(options: &[String]) -> Object {
    Object::Array(options.iter().map(|o| Object::String(o.clone())).collect())
}

/// List box field
#[derive(Debug, Clone, PartialEq)]
pub struct ListBox {
    pub name: String,
    pub options: Vec<String>,
    pub selected: Vec<usize>,
    pub flags: FieldFlags,
}

impl ListBox {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            selected: Vec::new(),
            flags: FieldFlags::empty(),
        }
    }

    pub fn with_options(mut self, options: &[String]) -> Self {
        self.options.extend(options.iter().cloned());
        self
    }

    pub fn multi_select(self) -> Self {
        self.with_flags(FieldFlags::MULTI_SELECT)
    }

    pub fn with_selected(mut self, indices: Vec<usize>) -> Self {
        self.selected = indices;
        self
    }

    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn to_dict(&self) -> Dictionary {
        let mut dict = base_dict(FieldType::Choice, &self.name, self.flags);
        dict.set("Opt", options_array(&self.options));

        if self.flags.contains(FieldFlags::MULTI_SELECT) && !self.selected.is_empty() {
            let indices: Vec<Object> = self
                .selected
                .iter()
                .map(|&i| Object::Integer(i as i64))
                .collect();
            dict.set("I", Object::Array(indices));
        }
        if let Some(value) = self.selected.first().and_then(|&i| self.options.get(i)) {
            dict.set("V", Object::String(value.clone()));
            dict.set("DV", Object::String(value.clone()));
        }

        dict
    }
}

/// Combo box (dropdown) field
#[derive(Debug, Clone, PartialEq)]
pub struct ComboBox {
    pub name: String,
    pub options: Vec<String>,
    pub value: Option<String>,
    pub flags: FieldFlags,
}

impl ComboBox {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            value: None,
            flags: FieldFlags::COMBO,
        }
    }

    pub fn with_options(mut self, options: &[String]) -> Self {
        self.options.extend(options.iter().cloned());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn to_dict(&self) -> Dictionary {
        let mut dict = base_dict(FieldType::Choice, &self.name, self.flags);
        dict.set("Opt", options_array(&self.options));
        if let Some(ref value) = self.value {
            dict.set("V", Object::String(value.clone()));
            dict.set("DV", Object::String(value.clone()));
        }
        dict
    }
}

/// Unsigned signature field
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureField {
    pub name: String,
    pub flags: FieldFlags,
}

impl SignatureField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: FieldFlags::empty(),
        }
    }

    /// Only `REQUIRED` is meaningful; signatures are never read-only
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags & FieldFlags::REQUIRED;
        self
    }

    pub fn to_dict(&self) -> Dictionary {
        base_dict(FieldType::Signature, &self.name, self.flags)
    }
}
