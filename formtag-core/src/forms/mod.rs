//! Form fields according to ISO 32000-1 Chapter 12.7
//!
//! The [`registry`] classifies tag keywords, [`resolve`] and [`FieldSpec`]
//! turn a parsed tag into a ready-to-render field, and the builders in this
//! module produce the field and widget dictionaries the canvas stores.

mod behavior;
mod field;
mod field_spec;
mod field_type;
mod form_data;
mod options;
pub mod registry;

pub use behavior::{
    calculation_script, estimate_max_length, length_guard, template_for_format,
    validation_script, Behavior,
};
pub use field::{AnnotationFlags, BorderStyle, FieldFlags, FormField, Widget, WidgetAppearance};
pub use field_spec::{normalize_export_value, FieldSpec, ResolvedField};
pub use field_type::{
    CheckBox, ComboBox, FieldType, ListBox, PushButton, RadioButton, SignatureField, TextField,
};
pub use form_data::{AcroForm, FormManager};
pub use options::{
    parse_dimension, resolve, split_list, OptionValue, Resolution, ResolvedOptions, FORMAT_NAMES,
};
pub use registry::{
    classify, defaults, BehaviorTemplate, FieldCategory, FieldKind, KindTraits, TypeDefaults,
    WidgetKind,
};
