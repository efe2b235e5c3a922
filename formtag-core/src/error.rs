use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed tag {tag:?}: {reason}")]
    MalformedTag { tag: String, reason: String },

    #[error("Unknown field type: {keyword}")]
    UnknownFieldType { keyword: String },

    #[error("Invalid value {value:?} for option '{key}' on field '{field}': {reason}")]
    InvalidOptionValue {
        field: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Pages are zero-based; the message shows them one-based.
    #[error(
        "Duplicate field name '{name}' (first on page {}, again on page {})",
        .first_page + 1,
        .page + 1
    )]
    DuplicateFieldName {
        name: String,
        first_page: usize,
        page: usize,
    },

    #[error("Cannot place widget for field '{field}': {reason}")]
    WidgetPlacement { field: String, reason: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FormError {
    pub(crate) fn malformed(tag: &str, reason: impl Into<String>) -> Self {
        FormError::MalformedTag {
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error aborts the whole run instead of a single occurrence.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FormError::DuplicateFieldName { .. }
                | FormError::InvalidDocument(_)
                | FormError::InvalidConfig(_)
                | FormError::Io(_)
        )
    }

    /// Short stable identifier used in run reports.
    pub fn kind(&self) -> &'static str {
        match self {
            FormError::Io(_) => "io",
            FormError::MalformedTag { .. } => "malformed_tag",
            FormError::UnknownFieldType { .. } => "unknown_field_type",
            FormError::InvalidOptionValue { .. } => "invalid_option_value",
            FormError::DuplicateFieldName { .. } => "duplicate_field_name",
            FormError::WidgetPlacement { .. } => "widget_placement",
            FormError::InvalidDocument(_) => "invalid_document",
            FormError::InvalidConfig(_) => "invalid_config",
        }
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
