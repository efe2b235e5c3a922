//! Form field and widget definitions

use crate::actions::Action;
use crate::color::Color;
use crate::geometry::Rectangle;
use crate::objects::{Dictionary, Object, ObjectId};
use bitflags::bitflags;

bitflags! {
    /// Field flags according to ISO 32000-1 Tables 221, 226, 228 and 230
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldFlags: u32 {
        const READ_ONLY = 1 << 0;
        const REQUIRED = 1 << 1;
        const NO_EXPORT = 1 << 2;
        const MULTILINE = 1 << 12;
        const PASSWORD = 1 << 13;
        const NO_TOGGLE_TO_OFF = 1 << 14;
        const RADIO = 1 << 15;
        const PUSHBUTTON = 1 << 16;
        const COMBO = 1 << 17;
        const EDIT = 1 << 18;
        const FILE_SELECT = 1 << 20;
        const MULTI_SELECT = 1 << 21;
        const DO_NOT_SPELL_CHECK = 1 << 22;
        const DO_NOT_SCROLL = 1 << 23;
        const RICH_TEXT = 1 << 25;
    }
}

bitflags! {
    /// Annotation flags (ISO 32000-1 Table 165)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AnnotationFlags: u32 {
        const HIDDEN = 1 << 1;
        const PRINT = 1 << 2;
    }
}

impl FieldFlags {
    /// Value for the `/Ff` entry
    pub fn to_flags(&self) -> i64 {
        self.bits() as i64
    }
}

/// Widget appearance settings
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetAppearance {
    pub border_color: Option<Color>,
    pub background_color: Option<Color>,
    pub border_width: f64,
    pub border_style: BorderStyle,
}

/// Border style for widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Solid,
    Dashed,
    Beveled,
    Inset,
    Underline,
}

impl BorderStyle {
    /// Get PDF name
    pub fn pdf_name(&self) -> &'static str {
        match self {
            BorderStyle::Solid => "S",
            BorderStyle::Dashed => "D",
            BorderStyle::Beveled => "B",
            BorderStyle::Inset => "I",
            BorderStyle::Underline => "U",
        }
    }
}

impl Default for WidgetAppearance {
    fn default() -> Self {
        Self {
            border_color: Some(Color::black()),
            background_color: None,
            border_width: 1.0,
            border_style: BorderStyle::Solid,
        }
    }
}

/// Widget annotation for a form field
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    /// Placement in page space
    pub rect: Rectangle,
    pub appearance: WidgetAppearance,
    /// Caption drawn on buttons (`/MK /CA`)
    pub caption: Option<String>,
    /// On-state name for checkboxes and radio members
    pub on_state: Option<String>,
    /// Whether the on-state is the initial appearance
    pub selected: bool,
    pub hidden: bool,
    /// Activation action (`/A`), used by submit and reset buttons
    pub action: Option<Action>,
    /// Object id and parent field, both set by the form manager
    pub id: Option<ObjectId>,
    pub parent: Option<ObjectId>,
}

impl Widget {
    pub fn new(rect: Rectangle) -> Self {
        Self {
            rect,
            appearance: WidgetAppearance::default(),
            caption: None,
            on_state: None,
            selected: false,
            hidden: false,
            action: None,
            id: None,
            parent: None,
        }
    }

    pub fn with_appearance(mut self, appearance: WidgetAppearance) -> Self {
        self.appearance = appearance;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_on_state(mut self, state: impl Into<String>, selected: bool) -> Self {
        self.on_state = Some(state.into());
        self.selected = selected;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn flags(&self) -> AnnotationFlags {
        if self.hidden {
            AnnotationFlags::HIDDEN
        } else {
            AnnotationFlags::PRINT
        }
    }

    /// Annotation dictionary for a page of the given height
    pub fn to_annotation_dict(&self, page_height: f64) -> Dictionary {
        let mut dict = Dictionary::new();

        dict.set("Type", Object::name("Annot"));
        dict.set("Subtype", Object::name("Widget"));

        let rect_array = self
            .rect
            .to_pdf_rect(page_height)
            .into_iter()
            .map(Object::Real)
            .collect::<Vec<_>>();
        dict.set("Rect", Object::Array(rect_array));

        let mut bs_dict = Dictionary::new();
        bs_dict.set("W", Object::Real(self.appearance.border_width));
        bs_dict.set("S", Object::name(self.appearance.border_style.pdf_name()));
        dict.set("BS", bs_dict);

        let mut mk_dict = Dictionary::new();
        if let Some(border_color) = &self.appearance.border_color {
            mk_dict.set("BC", border_color.to_pdf_array());
        }
        if let Some(bg_color) = &self.appearance.background_color {
            mk_dict.set("BG", bg_color.to_pdf_array());
        }
        if let Some(caption) = &self.caption {
            mk_dict.set("CA", Object::String(caption.clone()));
        }
        dict.set("MK", mk_dict);

        if let Some(state) = &self.on_state {
            let current = if self.selected { state.as_str() } else { "Off" };
            dict.set("AS", Object::name(current));
        }

        if let Some(action) = &self.action {
            dict.set("A", action.to_dict());
        }

        if let Some(parent) = self.parent {
            dict.set("Parent", parent);
        }

        dict.set("F", Object::Integer(self.flags().bits() as i64));

        dict
    }
}

/// Form field with its widgets
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub field_dict: Dictionary,
    pub widgets: Vec<Widget>,
}

impl FormField {
    pub fn new(field_dict: Dictionary) -> Self {
        Self {
            field_dict,
            widgets: Vec::new(),
        }
    }

    pub fn add_widget(&mut self, widget: Widget) {
        self.widgets.push(widget);
    }

    pub fn name(&self) -> Option<&str> {
        self.field_dict.get("T").and_then(Object::as_string)
    }

    /// Field dictionary with `/Kids` pointing at the widgets
    pub fn to_dict(&self) -> Dictionary {
        let mut dict = self.field_dict.clone();
        let kids: Vec<Object> = self
            .widgets
            .iter()
            .filter_map(|w| w.id)
            .map(Object::Reference)
            .collect();
        if !kids.is_empty() {
            dict.set("Kids", Object::Array(kids));
        }
        dict
    }
}
