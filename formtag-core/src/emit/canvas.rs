//! In-memory canvas producing AcroForm dictionaries

use super::{WidgetCanvas, WidgetHandle, WidgetProperties};
use crate::actions::{Action, ScriptTrigger};
use crate::error::{FormError, Result};
use crate::forms::{AnnotationFlags, FieldCategory, FormManager, WidgetKind};
use crate::geometry::Rectangle;
use crate::layout::SourceDocument;
use crate::objects::{Dictionary, Object, ObjectReference};
use crate::scan::TextSegment;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Height of a diagnostic note
const NOTE_HEIGHT: f64 = 10.0;
/// Narrowest diagnostic note
const NOTE_MIN_WIDTH: f64 = 120.0;

#[derive(Debug, Clone, Copy)]
struct PlacedWidget {
    field: ObjectReference,
    page: usize,
}

/// Canvas over a [`SourceDocument`].
///
/// Widgets go into a [`FormManager`]; erased tag text is recorded and only
/// removed from the layout when the converted document is requested.
#[derive(Debug, Clone)]
pub struct FormCanvas {
    layout: SourceDocument,
    manager: FormManager,
    widgets: HashMap<WidgetHandle, PlacedWidget>,
    erasures: BTreeMap<usize, Vec<TextSegment>>,
    notes: Vec<(usize, Dictionary)>,
}

/// One annotation on a page of the output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectReference>,
    pub dict: Dictionary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageAnnotations {
    pub page: usize,
    pub annots: Vec<AnnotationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEntry {
    pub id: ObjectReference,
    pub dict: Dictionary,
}

/// Converted layout together with every form object created for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormOutput {
    pub layout: SourceDocument,
    pub pages: Vec<PageAnnotations>,
    pub fields: Vec<FieldEntry>,
    pub acro_form: Dictionary,
}

impl FormCanvas {
    pub fn new(layout: SourceDocument) -> Self {
        Self {
            layout,
            manager: FormManager::new(),
            widgets: HashMap::new(),
            erasures: BTreeMap::new(),
            notes: Vec::new(),
        }
    }

    pub fn manager(&self) -> &FormManager {
        &self.manager
    }

    /// Number of widgets created so far
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Diagnostic notes left so far, with their page
    pub fn notes(&self) -> &[(usize, Dictionary)] {
        &self.notes
    }

    /// The layout with converted tag text removed
    pub fn document(&self) -> SourceDocument {
        let mut document = self.layout.clone();
        for (&page_index, segments) in &self.erasures {
            let Some(page) = document.pages.get_mut(page_index) else {
                continue;
            };

            let mut removed: HashMap<usize, BTreeSet<usize>> = HashMap::new();
            for segment in segments {
                removed
                    .entry(segment.span)
                    .or_default()
                    .extend(segment.start..segment.end);
            }
            for (span_index, indices) in &removed {
                if let Some(span) = page.spans.get_mut(*span_index) {
                    span.text = span
                        .text
                        .chars()
                        .enumerate()
                        .filter(|(i, _)| !indices.contains(i))
                        .map(|(_, c)| c)
                        .collect();
                }
            }
            // drop only the spans an erasure left blank
            let mut index = 0;
            page.spans.retain(|span| {
                let emptied = removed.contains_key(&index) && span.text.trim().is_empty();
                index += 1;
                !emptied
            });
        }
        document
    }

    /// Finish the run and collect everything that was created
    pub fn into_output(self) -> FormOutput {
        let layout = self.document();

        let mut pages: BTreeMap<usize, Vec<AnnotationEntry>> = BTreeMap::new();
        let mut fields = Vec::with_capacity(self.manager.len());
        for (id, field) in self.manager.fields() {
            for widget in &field.widgets {
                let page = widget
                    .id
                    .and_then(|id| self.widgets.get(&WidgetHandle(id)))
                    .map_or(0, |placed| placed.page);
                let height = layout.page(page).map_or(0.0, |p| p.height);
                pages.entry(page).or_default().push(AnnotationEntry {
                    id: widget.id,
                    dict: widget.to_annotation_dict(height),
                });
            }
            fields.push(FieldEntry {
                id,
                dict: field.to_dict(),
            });
        }
        for (page, dict) in self.notes {
            pages
                .entry(page)
                .or_default()
                .push(AnnotationEntry { id: None, dict });
        }

        FormOutput {
            pages: pages
                .into_iter()
                .map(|(page, annots)| PageAnnotations { page, annots })
                .collect(),
            fields,
            acro_form: self.manager.get_acro_form().to_dict(),
            layout,
        }
    }
}

impl WidgetCanvas for FormCanvas {
    fn page_size(&self, page: usize) -> Option<(f64, f64)> {
        self.layout.page(page).map(|p| (p.width, p.height))
    }

    fn create_widget(
        &mut self,
        page: usize,
        rect: Rectangle,
        category: FieldCategory,
        properties: WidgetProperties,
    ) -> Result<WidgetHandle> {
        if self.page_size(page).is_none() {
            return Err(FormError::WidgetPlacement {
                field: properties.name,
                reason: format!("page {} does not exist", page + 1),
            });
        }

        let widget = properties.widget(rect);
        let field = if properties.radio_group {
            self.manager
                .add_radio_member(&properties.name, properties.field, widget)
        } else {
            self.manager.add_field(properties.field, widget)
        };
        if properties.kind == WidgetKind::Signature {
            self.manager.mark_signatures();
        }
        for (trigger, script) in properties.scripts {
            self.manager
                .add_script(field, trigger, Action::javascript(script).to_dict());
        }

        let id = self
            .manager
            .field(field)
            .and_then(|f| f.widgets.last())
            .and_then(|w| w.id)
            .ok_or_else(|| FormError::WidgetPlacement {
                field: properties.name.clone(),
                reason: "widget was not registered".to_string(),
            })?;
        let handle = WidgetHandle(id);
        self.widgets.insert(handle, PlacedWidget { field, page });

        tracing::trace!(
            field = %properties.name,
            %category,
            %handle,
            "created widget"
        );
        Ok(handle)
    }

    fn attach_script(
        &mut self,
        handle: WidgetHandle,
        trigger: ScriptTrigger,
        script: &str,
    ) -> Result<()> {
        let placed = self
            .widgets
            .get(&handle)
            .copied()
            .ok_or_else(|| FormError::WidgetPlacement {
                field: handle.to_string(),
                reason: "unknown widget".to_string(),
            })?;
        self.manager
            .add_script(placed.field, trigger, Action::javascript(script).to_dict());
        Ok(())
    }

    fn erase_text(&mut self, page: usize, segments: &[TextSegment]) {
        self.erasures
            .entry(page)
            .or_default()
            .extend_from_slice(segments);
    }

    fn annotate_failure(&mut self, page: usize, near: Rectangle, message: &str) {
        let Some((_, page_height)) = self.page_size(page) else {
            return;
        };
        let note = Rectangle::new(
            near.x,
            near.bottom(),
            near.width.max(NOTE_MIN_WIDTH),
            NOTE_HEIGHT,
        );

        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("Annot"));
        dict.set("Subtype", Object::name("FreeText"));
        dict.set(
            "Rect",
            Object::Array(
                note.to_pdf_rect(page_height)
                    .into_iter()
                    .map(Object::Real)
                    .collect(),
            ),
        );
        dict.set("Contents", message);
        dict.set("DA", "/Helv 7 Tf 1 0 0 rg");
        dict.set("F", Object::Integer(AnnotationFlags::PRINT.bits() as i64));
        self.notes.push((page, dict));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::WidgetAppearance;
    use crate::layout::{SourcePage, TextSpan};
    use pretty_assertions::assert_eq;

    fn layout() -> SourceDocument {
        SourceDocument::new(vec![SourcePage::new(612.0, 792.0)
            .with_span(TextSpan::new(
                "Name: {{textbox:name}}",
                Rectangle::new(72.0, 100.0, 220.0, 12.0),
            ))
            .with_span(TextSpan::new(
                "{{checkbox:agree}}",
                Rectangle::new(72.0, 130.0, 180.0, 12.0),
            ))])
    }

    fn properties(name: &str, radio: Option<&str>) -> WidgetProperties {
        let mut field = Dictionary::new();
        field.set("T", name);
        WidgetProperties {
            name: name.to_string(),
            keyword: "textbox".to_string(),
            kind: if radio.is_some() {
                WidgetKind::RadioButton
            } else {
                WidgetKind::Text
            },
            field,
            appearance: WidgetAppearance::default(),
            caption: None,
            on_state: radio.map(|state| (state.to_string(), false)),
            hidden: false,
            action: None,
            radio_group: radio.is_some(),
            scripts: Vec::new(),
        }
    }

    #[test]
    fn test_erasure_is_applied_to_document() {
        let mut canvas = FormCanvas::new(layout());
        canvas.erase_text(0, &[TextSegment { span: 0, start: 6, end: 22 }]);
        canvas.erase_text(0, &[TextSegment { span: 1, start: 0, end: 18 }]);

        let document = canvas.document();
        let spans = &document.pages[0].spans;
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Name: ");
    }

    #[test]
    fn test_blank_spans_outside_erasures_are_kept() {
        let layout = SourceDocument::new(vec![SourcePage::new(612.0, 792.0)
            .with_span(TextSpan::new(" ", Rectangle::new(10.0, 10.0, 4.0, 12.0)))
            .with_span(TextSpan::new(
                "{{textbox:a}} ",
                Rectangle::new(72.0, 100.0, 84.0, 12.0),
            ))]);
        let mut canvas = FormCanvas::new(layout);
        canvas.erase_text(0, &[TextSegment { span: 1, start: 0, end: 13 }]);

        let spans = canvas.document().pages[0].spans.clone();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, " ");
        assert_eq!(spans[0].bbox.x, 10.0);
    }

    #[test]
    fn test_radio_members_share_field() {
        let mut canvas = FormCanvas::new(layout());
        let rect = Rectangle::new(72.0, 100.0, 12.0, 12.0);
        let a = canvas
            .create_widget(0, rect, FieldCategory::Choice, properties("size", Some("Small")))
            .unwrap();
        let b = canvas
            .create_widget(0, rect, FieldCategory::Choice, properties("size", Some("Large")))
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(canvas.widget_count(), 2);
        assert_eq!(canvas.manager().len(), 1);
    }

    #[test]
    fn test_scripts_with_widget_and_attached_later() {
        let mut canvas = FormCanvas::new(layout());
        let rect = Rectangle::new(72.0, 100.0, 100.0, 12.0);
        let mut total = properties("total", None);
        total.scripts = vec![(ScriptTrigger::Format, "AFNumber_Format(2, 0);".to_string())];
        let handle = canvas
            .create_widget(0, rect, FieldCategory::Text, total)
            .unwrap();
        canvas
            .attach_script(handle, ScriptTrigger::Calculate, "event.value = 1;")
            .unwrap();

        let field = canvas.manager().get_field("total").unwrap();
        let aa = field.field_dict.get_dict("AA").unwrap();
        assert!(aa.get("F").is_some());
        assert!(aa.get("C").is_some());
        assert_eq!(canvas.manager().get_acro_form().co.len(), 1);
    }

    #[test]
    fn test_attach_script_to_unknown_widget() {
        let mut canvas = FormCanvas::new(layout());
        let handle = WidgetHandle(ObjectReference::new(42, 0));
        assert!(canvas
            .attach_script(handle, ScriptTrigger::Format, "event.value = 1;")
            .is_err());
    }

    #[test]
    fn test_output_groups_annotations_by_page() {
        let mut canvas = FormCanvas::new(layout());
        let rect = Rectangle::new(72.0, 100.0, 100.0, 12.0);
        canvas
            .create_widget(0, rect, FieldCategory::Text, properties("name", None))
            .unwrap();
        canvas.annotate_failure(0, rect, "Unknown field type: nope");

        let output = canvas.into_output();
        assert_eq!(output.pages.len(), 1);
        assert_eq!(output.pages[0].annots.len(), 2);
        assert_eq!(output.fields.len(), 1);

        let note = &output.pages[0].annots[1];
        assert!(note.id.is_none());
        assert_eq!(note.dict.get("Subtype"), Some(&Object::name("FreeText")));
        assert_eq!(
            output.acro_form.get("Fields"),
            Some(&Object::Array(vec![Object::Reference(output.fields[0].id)]))
        );

        let json = serde_json::to_value(&output).unwrap();
        assert!(json["acro_form"]["Fields"].is_array());
    }

    #[test]
    fn test_missing_page_is_rejected() {
        let mut canvas = FormCanvas::new(layout());
        let err = canvas
            .create_widget(
                3,
                Rectangle::new(0.0, 0.0, 10.0, 10.0),
                FieldCategory::Text,
                properties("x", None),
            )
            .unwrap_err();
        assert!(matches!(err, FormError::WidgetPlacement { .. }));
        canvas.annotate_failure(3, Rectangle::new(0.0, 0.0, 10.0, 10.0), "ignored");
        assert!(canvas.notes().is_empty());
    }
}
