//! Per-run summary of what was converted and what was not

use crate::emit::WidgetHandle;
use crate::error::FormError;
use crate::forms::{FieldCategory, WidgetKind};
use crate::geometry::Rectangle;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A widget that made it into the output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmittedField {
    pub name: String,
    pub keyword: String,
    pub category: FieldCategory,
    pub widget: WidgetKind,
    pub page: usize,
    pub rect: Rectangle,
    pub handle: WidgetHandle,
    pub in_cell: bool,
}

/// A tolerant error; the occurrence or option it names was skipped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub page: usize,
    pub tag: String,
    pub kind: &'static str,
    pub message: String,
}

impl Failure {
    pub fn new(page: usize, tag: impl Into<String>, error: &FormError) -> Self {
        Self {
            page,
            tag: tag.into(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Something worth knowing that is not an error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub page: usize,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileReport {
    pub generated_at: DateTime<Utc>,
    /// Tag occurrences found by the scanner
    pub occurrences: usize,
    pub fields: Vec<EmittedField>,
    pub failures: Vec<Failure>,
    pub notices: Vec<Notice>,
}

impl Default for CompileReport {
    fn default() -> Self {
        Self::new()
    }
}

impl CompileReport {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            occurrences: 0,
            fields: Vec::new(),
            failures: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// No tolerant failures were recorded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&EmittedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// One-line summary for logs and the command line
    pub fn summary(&self) -> String {
        format!(
            "{} tag(s) found, {} widget(s) created, {} failure(s), {} notice(s)",
            self.occurrences,
            self.fields.len(),
            self.failures.len(),
            self.notices.len()
        )
    }
}
