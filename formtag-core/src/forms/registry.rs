//! Type keyword registry
//!
//! Every supported keyword maps to exactly one [`FieldKind`]: its category,
//! the native widget it renders as, the behaviour template it carries and a
//! few rendering traits. The table is static and closed.

use crate::error::{FormError, Result};
use bitflags::bitflags;
use serde::Serialize;
use std::fmt;

/// Closed classification of field types sharing rendering and option rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    Text,
    Choice,
    Button,
    Signature,
    Annotation,
    Xfa,
}

impl FieldCategory {
    pub const ALL: [FieldCategory; 6] = [
        FieldCategory::Text,
        FieldCategory::Choice,
        FieldCategory::Button,
        FieldCategory::Signature,
        FieldCategory::Annotation,
        FieldCategory::Xfa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::Text => "text",
            FieldCategory::Choice => "choice",
            FieldCategory::Button => "button",
            FieldCategory::Signature => "signature",
            FieldCategory::Annotation => "annotation",
            FieldCategory::Xfa => "xfa",
        }
    }

    /// Category whose rendering rules apply; annotation and XFA degrade to text
    pub fn rendering(&self) -> FieldCategory {
        match self {
            FieldCategory::Annotation | FieldCategory::Xfa => FieldCategory::Text,
            other => *other,
        }
    }

    /// Option keys this category understands
    pub fn schema(&self) -> &'static OptionSchema {
        match self.rendering() {
            FieldCategory::Choice => &CHOICE_SCHEMA,
            FieldCategory::Button => &BUTTON_SCHEMA,
            FieldCategory::Signature => &SIGNATURE_SCHEMA,
            _ => &TEXT_SCHEMA,
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category set of accepted option keys
#[derive(Debug)]
pub struct OptionSchema {
    pub accepted: &'static [&'static str],
}

const COMMON_KEYS: [&str; 8] = [
    "width",
    "height",
    "cellwidth",
    "columnwidth",
    "rowheight",
    "required",
    "readonly",
    "tooltip",
];

static TEXT_SCHEMA: OptionSchema = OptionSchema {
    accepted: &[
        "width",
        "height",
        "cellwidth",
        "columnwidth",
        "rowheight",
        "required",
        "readonly",
        "tooltip",
        "value",
        "default",
        "format",
        "calculation",
        "validation",
        "data",
    ],
};

static CHOICE_SCHEMA: OptionSchema = OptionSchema {
    accepted: &[
        "width",
        "height",
        "cellwidth",
        "columnwidth",
        "rowheight",
        "required",
        "readonly",
        "tooltip",
        "options",
        "value",
        "default",
        "multi",
        "checked",
    ],
};

static BUTTON_SCHEMA: OptionSchema = OptionSchema {
    accepted: &[
        "width",
        "height",
        "cellwidth",
        "columnwidth",
        "rowheight",
        "required",
        "readonly",
        "tooltip",
        "label",
        "url",
        "value",
    ],
};

static SIGNATURE_SCHEMA: OptionSchema = OptionSchema {
    accepted: &COMMON_KEYS,
};

impl OptionSchema {
    pub fn accepts(&self, key: &str) -> bool {
        self.accepted.contains(&key)
    }
}

/// Native widget a field is rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Text,
    CheckBox,
    RadioButton,
    ComboBox,
    ListBox,
    PushButton,
    SubmitButton,
    ResetButton,
    Signature,
}

impl WidgetKind {
    /// Size used when placement produces a degenerate rectangle
    pub fn default_size(&self, multiline: bool) -> (f64, f64) {
        match self {
            WidgetKind::Text if multiline => (216.0, 54.0),
            WidgetKind::Text | WidgetKind::ComboBox => (144.0, 18.0),
            WidgetKind::ListBox => (144.0, 54.0),
            WidgetKind::CheckBox | WidgetKind::RadioButton => (12.0, 12.0),
            WidgetKind::PushButton | WidgetKind::SubmitButton | WidgetKind::ResetButton => {
                (72.0, 20.0)
            }
            WidgetKind::Signature => (180.0, 36.0),
        }
    }

    /// Checkbox and radio widgets are drawn as squares
    pub fn is_square(&self) -> bool {
        matches!(self, WidgetKind::CheckBox | WidgetKind::RadioButton)
    }
}

/// Scripted behaviour a keyword carries by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorTemplate {
    None,
    Date,
    Time,
    DateTime,
    Integer,
    Decimal,
    Currency,
    Percent,
    Email,
    Phone,
    Calculation,
    Validation,
}

bitflags! {
    /// Rendering traits fixed by the keyword itself
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KindTraits: u8 {
        const MULTILINE = 1 << 0;
        const RICH_TEXT = 1 << 1;
        const PASSWORD = 1 << 2;
        const HIDDEN = 1 << 3;
        const READ_ONLY = 1 << 4;
        const REQUIRED = 1 << 5;
        const BARCODE = 1 << 6;
    }
}

/// Registry entry for one type keyword
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldKind {
    pub keyword: &'static str,
    pub category: FieldCategory,
    pub widget: WidgetKind,
    pub template: BehaviorTemplate,
    pub traits: KindTraits,
}

/// Defaults reported for a keyword
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeDefaults {
    pub width: f64,
    pub height: f64,
    pub template: BehaviorTemplate,
}

impl FieldKind {
    const fn new(keyword: &'static str, category: FieldCategory, widget: WidgetKind) -> Self {
        Self {
            keyword,
            category,
            widget,
            template: BehaviorTemplate::None,
            traits: KindTraits::empty(),
        }
    }

    const fn text(keyword: &'static str) -> Self {
        Self::new(keyword, FieldCategory::Text, WidgetKind::Text)
    }

    const fn scripted(mut self, template: BehaviorTemplate) -> Self {
        self.template = template;
        self
    }

    const fn with(mut self, traits: KindTraits) -> Self {
        self.traits = traits;
        self
    }

    pub fn is_multiline(&self) -> bool {
        self.traits.contains(KindTraits::MULTILINE)
    }

    pub fn defaults(&self) -> TypeDefaults {
        let (width, height) = self.widget.default_size(self.is_multiline());
        TypeDefaults {
            width,
            height,
            template: self.template,
        }
    }
}

use BehaviorTemplate as B;
use FieldCategory as C;
use WidgetKind as W;

static KINDS: &[FieldKind] = &[
    // Text fields
    FieldKind::text("textbox"),
    FieldKind::text("textfield"),
    FieldKind::text("multilinetextfield").with(KindTraits::MULTILINE),
    FieldKind::text("passwordfield").with(KindTraits::PASSWORD),
    FieldKind::text("numericfield").scripted(B::Integer),
    FieldKind::text("numberfield").scripted(B::Integer),
    FieldKind::text("decimalfield").scripted(B::Decimal),
    FieldKind::text("currencyfield").scripted(B::Currency),
    FieldKind::text("percentfield").scripted(B::Percent),
    FieldKind::text("datefield").scripted(B::Date),
    FieldKind::text("date").scripted(B::Date),
    FieldKind::text("timefield").scripted(B::Time),
    FieldKind::text("datetimefield").scripted(B::DateTime),
    FieldKind::text("emailfield").scripted(B::Email),
    FieldKind::text("phonefield").scripted(B::Phone),
    FieldKind::text("richtextfield").with(KindTraits::MULTILINE.union(KindTraits::RICH_TEXT)),
    FieldKind::text("calculatedfield").scripted(B::Calculation),
    FieldKind::text("validationfield").scripted(B::Validation),
    FieldKind::text("hiddenfield").with(KindTraits::HIDDEN),
    FieldKind::text("readonlyfield").with(KindTraits::READ_ONLY),
    FieldKind::text("requiredfieldattribute").with(KindTraits::REQUIRED),
    FieldKind::text("tooltipfieldattribute"),
    FieldKind::text("barcodefield").with(KindTraits::BARCODE),
    FieldKind::text("qrcodefield").with(KindTraits::BARCODE),
    FieldKind::text("pdf417field").with(KindTraits::BARCODE),
    FieldKind::text("code128field").with(KindTraits::BARCODE),
    // Choice fields
    FieldKind::new("checkbox", C::Choice, W::CheckBox),
    FieldKind::new("radiobutton", C::Choice, W::RadioButton),
    FieldKind::new("combobox", C::Choice, W::ComboBox),
    FieldKind::new("dropdownlist", C::Choice, W::ComboBox),
    FieldKind::new("listbox", C::Choice, W::ListBox),
    // Button fields
    FieldKind::new("pushbutton", C::Button, W::PushButton),
    FieldKind::new("submitbutton", C::Button, W::SubmitButton),
    FieldKind::new("resetbutton", C::Button, W::ResetButton),
    FieldKind::new("imagebutton", C::Button, W::PushButton),
    FieldKind::new("imagefield", C::Button, W::PushButton),
    FieldKind::new("fileattachmentfield", C::Button, W::PushButton),
    // Signature fields
    FieldKind::new("signaturefield", C::Signature, W::Signature),
    FieldKind::new("digitalsignaturefield", C::Signature, W::Signature),
    // Annotations, rendered as text widgets
    FieldKind::new("annotationwidget", C::Annotation, W::Text),
    FieldKind::new("freetextannotation", C::Annotation, W::Text),
    FieldKind::new("inkannotation", C::Annotation, W::Text),
    FieldKind::new("stampannotation", C::Annotation, W::Text),
    FieldKind::new("popupannotation", C::Annotation, W::Text),
    FieldKind::new("soundannotation", C::Annotation, W::Text),
    FieldKind::new("movieannotation", C::Annotation, W::Text),
    FieldKind::new("screenannotation", C::Annotation, W::Text),
    FieldKind::new("lineannotation", C::Annotation, W::Text),
    FieldKind::new("squareannotation", C::Annotation, W::Text),
    FieldKind::new("circleannotation", C::Annotation, W::Text),
    FieldKind::new("polygonannotation", C::Annotation, W::Text),
    FieldKind::new("polylineannotation", C::Annotation, W::Text),
    FieldKind::new("fileattachmentannotation", C::Annotation, W::Text),
    FieldKind::new("widgetannotation", C::Annotation, W::Text),
    // XFA fields, rendered as text widgets
    FieldKind::new("subformfield", C::Xfa, W::Text),
    FieldKind::new("drawfield", C::Xfa, W::Text),
    FieldKind::new("numericupdownfield", C::Xfa, W::Text),
    FieldKind::new("validationgroup", C::Xfa, W::Text),
];

/// All registered kinds in table order
pub fn kinds() -> &'static [FieldKind] {
    KINDS
}

/// Registry entry for a keyword (case-insensitive)
pub fn lookup(keyword: &str) -> Result<&'static FieldKind> {
    let keyword = keyword.trim().to_lowercase();
    KINDS
        .iter()
        .find(|kind| kind.keyword == keyword)
        .ok_or(FormError::UnknownFieldType { keyword })
}

pub fn classify(keyword: &str) -> Result<FieldCategory> {
    lookup(keyword).map(|kind| kind.category)
}

pub fn defaults(keyword: &str) -> Result<TypeDefaults> {
    lookup(keyword).map(FieldKind::defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_documented_keyword_classifies() {
        let documented = [
            ("textbox", C::Text),
            ("multilinetextfield", C::Text),
            ("currencyfield", C::Text),
            ("qrcodefield", C::Text),
            ("checkbox", C::Choice),
            ("radiobutton", C::Choice),
            ("dropdownlist", C::Choice),
            ("submitbutton", C::Button),
            ("fileattachmentfield", C::Button),
            ("digitalsignaturefield", C::Signature),
            ("freetextannotation", C::Annotation),
            ("widgetannotation", C::Annotation),
            ("subformfield", C::Xfa),
            ("validationgroup", C::Xfa),
        ];
        for (keyword, category) in documented {
            assert_eq!(classify(keyword).unwrap(), category, "{keyword}");
        }
        for kind in kinds() {
            assert!(classify(kind.keyword).is_ok());
        }
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("ComboBox").unwrap(), C::Choice);
    }

    #[test]
    fn test_unknown_keyword() {
        match classify("unknowntype") {
            Err(FormError::UnknownFieldType { keyword }) => assert_eq!(keyword, "unknowntype"),
            other => panic!("expected UnknownFieldType, got {other:?}"),
        }
    }

    #[test]
    fn test_keywords_are_unique() {
        let mut seen = HashSet::new();
        for kind in kinds() {
            assert!(seen.insert(kind.keyword), "duplicate keyword {}", kind.keyword);
        }
    }

    #[test]
    fn test_annotation_and_xfa_render_as_text() {
        for kind in kinds() {
            if matches!(kind.category, C::Annotation | C::Xfa) {
                assert_eq!(kind.widget, W::Text, "{}", kind.keyword);
                assert_eq!(kind.category.rendering(), C::Text);
                assert!(kind.category.schema().accepts("value"));
            }
        }
    }

    #[test]
    fn test_every_category_is_populated() {
        for category in FieldCategory::ALL {
            assert!(kinds().iter().any(|k| k.category == category), "{category}");
        }
    }

    #[test]
    fn test_defaults() {
        let text = defaults("textbox").unwrap();
        assert_eq!((text.width, text.height), (144.0, 18.0));
        assert_eq!(text.template, B::None);

        let multiline = defaults("multilinetextfield").unwrap();
        assert_eq!((multiline.width, multiline.height), (216.0, 54.0));

        assert_eq!(defaults("datefield").unwrap().template, B::Date);
        assert_eq!(defaults("calculatedfield").unwrap().template, B::Calculation);
    }

    #[test]
    fn test_schemas() {
        assert!(C::Choice.schema().accepts("options"));
        assert!(!C::Text.schema().accepts("options"));
        assert!(C::Button.schema().accepts("url"));
        assert!(!C::Signature.schema().accepts("value"));
        assert!(C::Signature.schema().accepts("width"));
    }
}
