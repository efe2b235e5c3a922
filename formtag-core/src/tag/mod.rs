//! Placeholder tag mini-language
//!
//! A tag has the shape `{{TYPE:NAME|OPTION|KEY:VALUE}}`. The parser turns the
//! raw matched text into a [`FieldDescriptor`]; it knows nothing about field
//! semantics or page geometry.

mod grammar;
mod normalize;

pub use grammar::{parse_tag, FieldDescriptor, RawOption};
pub use normalize::{
    collapse_whitespace, is_invisible, normalize_option_key, normalize_text, remove_whitespace,
    OPTION_KEYWORDS,
};
