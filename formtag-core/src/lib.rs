//! # formtag
//!
//! Compiles inline placeholder tags into interactive form widgets.
//!
//! A document author writes tags such as `{{textbox:name|required}}` or
//! `{{combobox:country|options:USA,Canada,Mexico}}` into ordinary text,
//! often inside table cells. The compiler finds every tag, works out what
//! kind of field it describes, fits the field to the surrounding cell (or to
//! the tag text itself) and emits an AcroForm widget in its place.
//!
//! ## Quick Start
//!
//! ```rust
//! use formtag::{FormCompiler, Rectangle, SourceDocument, SourcePage, TextSpan};
//!
//! # fn main() -> formtag::Result<()> {
//! let page = SourcePage::new(612.0, 792.0).with_span(TextSpan::new(
//!     "{{textbox:name|required|width:200}}",
//!     Rectangle::new(72.0, 100.0, 210.0, 12.0),
//! ));
//! let document = SourceDocument::new(vec![page]);
//!
//! let (output, report) = FormCompiler::default().compile_document(&document)?;
//! assert_eq!(report.fields.len(), 1);
//! assert_eq!(report.fields[0].rect.width, 200.0);
//! assert_eq!(output.fields.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`tag`] - tag grammar and text normalisation
//! - [`forms`] - field type registry, option resolution and field builders
//! - [`layout`] - layout model, table detection and widget placement
//! - [`scan`] - locating tags in a layout
//! - [`emit`] - widget emission and the in-memory form canvas
//! - [`compiler`] - the two-phase compile pipeline

pub mod actions;
pub mod color;
pub mod compiler;
pub mod config;
pub mod emit;
pub mod error;
pub mod forms;
pub mod geometry;
pub mod layout;
pub mod objects;
pub mod report;
pub mod scan;
pub mod tag;

pub use color::Color;
pub use compiler::{CompilePlan, FormCompiler, NameLedger, PlannedField, RejectedTag};
pub use config::{CompilerConfig, StyleConfig};
pub use emit::{emit, FormCanvas, FormOutput, WidgetCanvas, WidgetHandle, WidgetProperties};
pub use error::{FormError, Result};
pub use forms::{FieldCategory, FieldSpec, WidgetKind};
pub use geometry::{Point, Rectangle};
pub use layout::{
    place, Placement, PlacementConfig, Ruling, SourceDocument, SourcePage, TableDetector,
    TextSpan,
};
pub use report::{CompileReport, EmittedField, Failure, Notice};
pub use scan::{DocumentScanner, TagOccurrence, TextRunScanner};
pub use tag::{parse_tag, FieldDescriptor, RawOption};

/// Current version of formtag
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
