//! Widget emission
//!
//! [`emit`] turns a resolved field and its placement into calls on a
//! [`WidgetCanvas`]. The canvas owns the output document; [`FormCanvas`] is
//! the in-memory implementation that builds AcroForm dictionaries.

mod canvas;

pub use canvas::{AnnotationEntry, FieldEntry, FormCanvas, FormOutput, PageAnnotations};

use crate::actions::{Action, ScriptTrigger};
use crate::config::StyleConfig;
use crate::error::{FormError, Result};
use crate::forms::{
    estimate_max_length, length_guard, CheckBox, ComboBox, FieldCategory, FieldFlags, FieldSpec,
    KindTraits, ListBox, PushButton, RadioButton, SignatureField, TextField, Widget,
    WidgetAppearance, WidgetKind,
};
use crate::geometry::Rectangle;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::scan::TextSegment;
use serde::Serialize;
use std::fmt;

/// Identifies one widget created on a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WidgetHandle(pub ObjectId);

impl fmt::Display for WidgetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a canvas needs to create one widget besides its rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetProperties {
    pub name: String,
    /// Tag keyword the widget came from
    pub keyword: String,
    pub kind: WidgetKind,
    /// Field dictionary (`/FT`, `/T`, `/Ff`, values)
    pub field: Dictionary,
    pub appearance: WidgetAppearance,
    pub caption: Option<String>,
    /// On-state name and whether it starts selected
    pub on_state: Option<(String, bool)>,
    pub hidden: bool,
    pub action: Option<Action>,
    /// Join the radio group of the same name instead of creating a field
    pub radio_group: bool,
    /// Scripts installed on the field together with the widget
    pub scripts: Vec<(ScriptTrigger, String)>,
}

impl WidgetProperties {
    /// Widget annotation at `rect` carrying these properties
    pub fn widget(&self, rect: Rectangle) -> Widget {
        let mut widget = Widget::new(rect).with_appearance(self.appearance.clone());
        if let Some(caption) = &self.caption {
            widget = widget.with_caption(caption.clone());
        }
        if let Some((state, selected)) = &self.on_state {
            widget = widget.with_on_state(state.clone(), *selected);
        }
        if let Some(action) = &self.action {
            widget = widget.with_action(action.clone());
        }
        if self.hidden {
            widget = widget.hidden();
        }
        widget
    }
}

/// Output document the compiler writes widgets into.
///
/// Pages are zero-based. Rectangles are in page space (top-left origin).
pub trait WidgetCanvas {
    /// Width and height of a page, `None` when the page does not exist
    fn page_size(&self, page: usize) -> Option<(f64, f64)>;

    /// Create a widget with its field and scripts, or nothing at all
    fn create_widget(
        &mut self,
        page: usize,
        rect: Rectangle,
        category: FieldCategory,
        properties: WidgetProperties,
    ) -> Result<WidgetHandle>;

    /// Add a script to the field of an existing widget
    fn attach_script(
        &mut self,
        handle: WidgetHandle,
        trigger: ScriptTrigger,
        script: &str,
    ) -> Result<()>;

    /// Remove tag text that has been converted
    fn erase_text(&mut self, page: usize, segments: &[TextSegment]);

    /// Leave a visible note next to a tag that could not be converted
    fn annotate_failure(&mut self, page: usize, near: Rectangle, message: &str);
}

/// Create the widget for `spec` at `rect` together with its scripts.
///
/// The rectangle is clipped to the page. A rectangle entirely outside the
/// page, or a page the canvas does not have, fails with
/// [`FormError::WidgetPlacement`].
pub fn emit<C: WidgetCanvas + ?Sized>(
    canvas: &mut C,
    page: usize,
    rect: Rectangle,
    spec: &FieldSpec,
    style: &StyleConfig,
    font_size: f64,
) -> Result<WidgetHandle> {
    let placement_error = |reason: String| FormError::WidgetPlacement {
        field: spec.name().to_string(),
        reason,
    };

    let (width, height) = canvas
        .page_size(page)
        .ok_or_else(|| placement_error(format!("page {} does not exist", page + 1)))?;
    let page_box = Rectangle::new(0.0, 0.0, width, height);
    let mut rect = rect.intersection(&page_box).ok_or_else(|| {
        placement_error(format!(
            "rectangle at ({:.1}, {:.1}) lies outside the {width}x{height} page",
            rect.x, rect.y
        ))
    })?;
    if spec.widget.is_square() {
        rect = rect.centered_square();
    }

    let mut properties = properties_for(spec, style, &rect, font_size);
    properties.field.set("DA", format!("/Helv {font_size} Tf 0 g"));
    if let Some(tooltip) = spec.tooltip() {
        properties.field.set("TU", tooltip);
    }
    properties
        .field
        .set("FormtagType", Object::name(spec.keyword()));

    let mut behavior = spec.behavior.clone().unwrap_or_default();
    if spec.widget == WidgetKind::Text && spec.multiline() {
        if let Some(max_length) = estimate_max_length(&rect, font_size, true) {
            behavior.add_keystroke(&length_guard(max_length));
        }
    }
    properties.scripts = behavior
        .scripts()
        .map(|(trigger, script)| (trigger, script.to_string()))
        .collect();

    let handle = canvas.create_widget(page, rect, spec.category, properties)?;

    tracing::debug!(
        field = spec.name(),
        keyword = spec.keyword(),
        page,
        %handle,
        "emitted widget"
    );
    Ok(handle)
}

fn properties_for(
    spec: &FieldSpec,
    style: &StyleConfig,
    rect: &Rectangle,
    font_size: f64,
) -> WidgetProperties {
    let name = spec.name();
    let flags = spec.common_flags();
    let mut caption = None;
    let mut on_state = None;
    let mut action = None;

    let field = match spec.widget {
        WidgetKind::Text => {
            let mut text = TextField::new(name).with_flags(flags);
            if spec.multiline() {
                text = text.multiline();
            } else if let Some(max_length) = estimate_max_length(rect, font_size, false) {
                text = text.with_max_length(max_length);
            }
            if spec.has_trait(KindTraits::PASSWORD) {
                text = text.password();
            }
            if spec.has_trait(KindTraits::RICH_TEXT) {
                text = text.with_flags(FieldFlags::RICH_TEXT);
            }
            if let Some(value) = spec.value() {
                text = text.with_value(value);
            }
            if let Some(default) = spec.default_value() {
                text = text.with_default_value(default);
            }
            text.to_dict()
        }
        WidgetKind::CheckBox => {
            let export = spec.export_value();
            let mut checkbox = CheckBox::new(name)
                .with_export_value(export.clone())
                .with_flags(flags);
            if spec.checked() {
                checkbox = checkbox.checked();
            }
            on_state = Some((export, spec.checked()));
            checkbox.to_dict()
        }
        WidgetKind::RadioButton => {
            let export = spec.export_value();
            let mut radio = RadioButton::new(name)
                .add_option(export.clone())
                .with_flags(flags);
            if spec.checked() {
                radio = radio.with_selected(0);
            }
            on_state = Some((export, spec.checked()));
            radio.to_dict()
        }
        WidgetKind::ComboBox => {
            let mut combo = ComboBox::new(name)
                .with_options(spec.choices())
                .with_flags(flags);
            if let Some(value) = spec.initial_choice() {
                combo = combo.with_value(value);
            }
            combo.to_dict()
        }
        WidgetKind::ListBox => {
            let choices = spec.choices();
            let mut list = ListBox::new(name).with_options(choices).with_flags(flags);
            if spec.options.flag("multi") {
                list = list.multi_select();
            }
            let selected = spec
                .initial_choice()
                .and_then(|value| choices.iter().position(|c| c == value));
            list = list.with_selected(selected.into_iter().collect());
            list.to_dict()
        }
        WidgetKind::PushButton | WidgetKind::SubmitButton | WidgetKind::ResetButton => {
            let label = spec.caption();
            action = match spec.widget {
                WidgetKind::SubmitButton => spec.url().map(Action::submit),
                WidgetKind::ResetButton => Some(Action::reset()),
                _ => None,
            };
            caption = Some(label.clone());
            PushButton::new(name)
                .with_caption(label)
                .with_flags(flags)
                .to_dict()
        }
        WidgetKind::Signature => SignatureField::new(name).with_flags(flags).to_dict(),
    };

    WidgetProperties {
        name: name.to_string(),
        keyword: spec.keyword().to_string(),
        kind: spec.widget,
        field,
        appearance: style.appearance(spec.required()),
        caption,
        on_state,
        hidden: spec.hidden(),
        action,
        radio_group: spec.widget == WidgetKind::RadioButton,
        scripts: Vec::new(),
    }
}
