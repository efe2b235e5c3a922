//! End-to-end compile scenarios
//!
//! Each test builds a small layout, runs the full pipeline and inspects the
//! produced form objects and run report.

use formtag::layout::Ruling;
use formtag::objects::Object;
use formtag::{
    CompilerConfig, FieldCategory, FormCanvas, FormCompiler, FormError, Rectangle,
    SourceDocument, SourcePage, TextSpan, WidgetKind,
};
use pretty_assertions::assert_eq;
use std::fs::File;
use std::io::{BufReader, Write};

fn page() -> SourcePage {
    SourcePage::new(612.0, 792.0)
}

/// One span per tag, stacked down the page, 6pt per character
fn document_with_tags(tags: &[&str]) -> SourceDocument {
    let page = tags.iter().enumerate().fold(page(), |page, (i, tag)| {
        page.with_span(TextSpan::new(
            *tag,
            Rectangle::new(72.0, 100.0 + 40.0 * i as f64, 6.0 * tag.chars().count() as f64, 12.0),
        ))
    });
    SourceDocument::new(vec![page])
}

fn field_flags(output: &formtag::FormOutput, index: usize) -> i64 {
    output.fields[index]
        .dict
        .get("Ff")
        .and_then(Object::as_integer)
        .unwrap_or(0)
}

#[test]
fn test_required_textbox_outside_table() {
    let tag = "{{textbox:name|required|width:200}}";
    let document = SourceDocument::new(vec![page().with_span(
        TextSpan::new(tag, Rectangle::new(72.0, 100.0, 210.0, 12.0)).with_font("Helvetica", 10.0),
    )]);

    let (output, report) = FormCompiler::default().compile_document(&document).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.fields.len(), 1);

    let field = &report.fields[0];
    assert_eq!(field.name, "name");
    assert_eq!(field.widget, WidgetKind::Text);
    assert_eq!(field.category, FieldCategory::Text);
    assert!(!field.in_cell);
    // width from the override, height as measured
    assert_eq!(field.rect, Rectangle::new(72.0, 100.0, 200.0, 12.0));

    let flags = field_flags(&output, 0);
    assert_eq!(flags & 2, 2, "required");
    assert_eq!(flags & 4096, 0, "single line");
    assert_eq!(
        output.fields[0].dict.get("DA"),
        Some(&Object::String("/Helv 10 Tf 0 g".to_string()))
    );
}

#[test]
fn test_required_combobox_keeps_option_order() {
    let document = document_with_tags(&["{{combobox:country|options:USA,Canada,Mexico|required}}"]);
    let (output, report) = FormCompiler::default().compile_document(&document).unwrap();

    assert_eq!(report.fields[0].category, FieldCategory::Choice);
    assert_eq!(report.fields[0].widget, WidgetKind::ComboBox);
    let dict = &output.fields[0].dict;
    assert_eq!(
        dict.get("Opt"),
        Some(&Object::Array(vec![
            Object::String("USA".to_string()),
            Object::String("Canada".to_string()),
            Object::String("Mexico".to_string()),
        ]))
    );
    assert_eq!(field_flags(&output, 0) & 2, 2);
}

#[test]
fn test_duplicate_names_abort_before_any_widget() {
    let document = document_with_tags(&["{{textbox:email}}", "{{emailfield:email}}"]);
    let mut canvas = FormCanvas::new(document.clone());

    let err = FormCompiler::default()
        .compile(&document, &mut canvas)
        .unwrap_err();
    assert!(matches!(err, FormError::DuplicateFieldName { ref name, .. } if name == "email"));
    assert_eq!(canvas.widget_count(), 0);
    assert!(canvas.notes().is_empty());
    assert_eq!(canvas.document(), document);
}

#[test]
fn test_unknown_type_is_skipped_and_text_kept() {
    let document = document_with_tags(&["{{unknowntype:x}}", "{{textbox:y}}"]);
    let (output, report) = FormCompiler::default().compile_document(&document).unwrap();

    assert_eq!(report.occurrences, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, "unknown_field_type");
    assert_eq!(report.failures[0].tag, "{{unknowntype:x}}");
    assert_eq!(report.fields.len(), 1);

    let spans = &output.layout.pages[0].spans;
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "{{unknowntype:x}}");
}

#[test]
fn test_unterminated_tag_does_not_block_the_next() {
    let document = SourceDocument::new(vec![page()
        .with_span(TextSpan::new(
            "Name: {{textbox:a",
            Rectangle::new(72.0, 100.0, 102.0, 12.0),
        ))
        .with_span(TextSpan::new(
            "{{textbox:b}}",
            Rectangle::new(72.0, 140.0, 78.0, 12.0),
        ))]);
    let (output, report) = FormCompiler::default().compile_document(&document).unwrap();

    assert_eq!(report.occurrences, 2);
    assert_eq!(report.fields.len(), 1);
    assert_eq!(report.fields[0].name, "b");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, "malformed_tag");
    assert_eq!(report.failures[0].tag, "{{textbox:a");

    let spans = &output.layout.pages[0].spans;
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "Name: {{textbox:a");
}

#[test]
fn test_unknown_type_still_holds_its_name() {
    let document = document_with_tags(&["{{unknowntype:email}}", "{{textbox:email}}"]);
    let err = FormCompiler::default()
        .compile_document(&document)
        .unwrap_err();
    assert!(matches!(err, FormError::DuplicateFieldName { ref name, .. } if name == "email"));
}

#[test]
fn test_cell_geometry() {
    // 120x20 cell at (100, 200)
    let cell = Rectangle::new(100.0, 200.0, 120.0, 20.0);
    let document = SourceDocument::new(vec![page()
        .with_cell(cell)
        .with_cell(Rectangle::new(220.0, 200.0, 120.0, 20.0))
        .with_span(TextSpan::new(
            "{{textbox:plain}}",
            Rectangle::new(104.0, 204.0, 100.0, 12.0),
        ))
        .with_span(TextSpan::new(
            "{{textbox:narrow|width:50}}",
            Rectangle::new(224.0, 204.0, 110.0, 12.0),
        ))]);

    let (_, report) = FormCompiler::default().compile_document(&document).unwrap();
    let plain = report.field("plain").unwrap();
    assert!(plain.in_cell);
    assert_eq!(plain.rect, Rectangle::new(101.0, 201.0, 118.0, 18.0));

    let narrow = report.field("narrow").unwrap();
    assert_eq!(narrow.rect, Rectangle::new(221.0, 201.0, 50.0, 18.0));
}

#[test]
fn test_ruled_table_cells_are_detected() {
    let document = SourceDocument::new(vec![page()
        .with_ruling(Ruling::horizontal(100.0, 50.0, 250.0))
        .with_ruling(Ruling::horizontal(130.0, 50.0, 250.0))
        .with_ruling(Ruling::vertical(50.0, 100.0, 130.0))
        .with_ruling(Ruling::vertical(150.0, 100.0, 130.0))
        .with_ruling(Ruling::vertical(250.0, 100.0, 130.0))
        .with_span(TextSpan::new(
            "{{datefield:due}}",
            Rectangle::new(155.0, 108.0, 80.0, 12.0),
        ))]);

    let (output, report) = FormCompiler::default().compile_document(&document).unwrap();
    assert_eq!(
        report.field("due").unwrap().rect,
        Rectangle::new(151.0, 101.0, 98.0, 28.0)
    );
    let aa = output.fields[0].dict.get_dict("AA").unwrap();
    assert!(aa.get("F").is_some());
    assert!(aa.get("K").is_some());
}

#[test]
fn test_second_run_is_a_no_op() {
    let document = document_with_tags(&[
        "{{textbox:first}}",
        "{{checkbox:agree|value:yes}}",
        "{{submitbutton:send|url:https://example.com/forms}}",
    ]);
    let compiler = FormCompiler::default();
    let (first, report) = compiler.compile_document(&document).unwrap();
    assert_eq!(report.fields.len(), 3);

    let (second, report) = compiler.compile_document(&first.layout).unwrap();
    assert_eq!(report.occurrences, 0);
    assert!(report.fields.is_empty());
    assert!(second.fields.is_empty());
    assert_eq!(second.layout, first.layout);
}

#[test]
fn test_radio_buttons_form_one_group() {
    let document = document_with_tags(&[
        "{{radiobutton:size|value:small}}",
        "{{radiobutton:size|value:large|checked}}",
    ]);
    let (output, report) = FormCompiler::default().compile_document(&document).unwrap();

    assert_eq!(report.fields.len(), 2);
    assert_ne!(report.fields[0].handle, report.fields[1].handle);
    assert_eq!(output.fields.len(), 1);

    let group = &output.fields[0].dict;
    assert_eq!(group.get("V"), Some(&Object::name("Large")));
    assert_eq!(group.get("Kids").and_then(Object::as_array).map(Vec::len), Some(2));
    assert_eq!(output.pages[0].annots.len(), 2);
}

#[test]
fn test_tag_in_running_text() {
    // "Email: " is 7 of 27 characters
    let document = SourceDocument::new(vec![page().with_span(TextSpan::new(
        "Email: {{emailfield:email}}",
        Rectangle::new(72.0, 300.0, 270.0, 12.0),
    ))]);
    let (output, report) = FormCompiler::default().compile_document(&document).unwrap();

    let rect = report.field("email").unwrap().rect;
    assert!(rect.x > 72.0);
    assert_eq!(rect.height, 12.0);
    assert_eq!(output.layout.pages[0].spans[0].text, "Email: ");

    let validate = output.fields[0].dict.get_dict("AA").unwrap().get_dict("V");
    assert!(validate.is_some());
}

#[test]
fn test_notices_are_collected() {
    let document = document_with_tags(&["{{listbox:colours}}", "{{submitbutton:send}}"]);
    let (_, report) = FormCompiler::default().compile_document(&document).unwrap();
    assert!(report.is_clean());
    let fields: Vec<_> = report.notices.iter().map(|n| n.field.as_str()).collect();
    assert_eq!(fields, vec!["colours", "send"]);
}

#[test]
fn test_custom_style_and_margin() {
    let config: CompilerConfig = serde_json::from_str(
        r#"{"placement": {"cell_margin": 2.0}, "style": {"default_border_color": "0,0,0"}}"#,
    )
    .unwrap();
    let document = SourceDocument::new(vec![page()
        .with_cell(Rectangle::new(0.0, 0.0, 100.0, 20.0))
        .with_span(TextSpan::new("{{textbox:a}}", Rectangle::new(4.0, 4.0, 60.0, 12.0)))]);

    let (output, report) = FormCompiler::new(config).compile_document(&document).unwrap();
    assert_eq!(report.fields[0].rect, Rectangle::new(2.0, 2.0, 96.0, 16.0));

    let widget = &output.pages[0].annots[0].dict;
    let mk = widget.get_dict("MK").unwrap();
    assert_eq!(
        mk.get("BC"),
        Some(&Object::Array(vec![
            Object::Real(0.0),
            Object::Real(0.0),
            Object::Real(0.0)
        ]))
    );
}

#[test]
fn test_tags_on_several_pages() {
    let document = SourceDocument::new(vec![
        page().with_span(TextSpan::new("{{textbox:a}}", Rectangle::new(72.0, 72.0, 78.0, 12.0))),
        page(),
        page().with_span(TextSpan::new("{{textbox:b}}", Rectangle::new(72.0, 72.0, 78.0, 12.0))),
    ]);
    let (output, report) = FormCompiler::default().compile_document(&document).unwrap();
    let pages: Vec<usize> = report.fields.iter().map(|f| f.page).collect();
    assert_eq!(pages, vec![0, 2]);
    let annotated: Vec<usize> = output.pages.iter().map(|p| p.page).collect();
    assert_eq!(annotated, vec![0, 2]);
}

#[test]
fn test_layout_read_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"{"pages": [{
            "width": 612, "height": 792,
            "cells": [{"x": 100, "y": 200, "width": 120, "height": 20}],
            "spans": [{"text": "{{checkbox:agree|checked}}",
                       "bbox": {"x": 104, "y": 204, "width": 100, "height": 12}}]
        }]}"#,
    )
    .unwrap();

    let reader = BufReader::new(File::open(file.path()).unwrap());
    let document = SourceDocument::from_reader(reader).unwrap();
    let (_, report) = FormCompiler::default().compile_document(&document).unwrap();

    let agree = report.field("agree").unwrap();
    assert_eq!(agree.widget, WidgetKind::CheckBox);
    assert!(agree.in_cell);
}
