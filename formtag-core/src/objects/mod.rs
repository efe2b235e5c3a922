//! Minimal PDF object model for widget and form dictionaries

mod dictionary;
mod primitive;

pub use dictionary::Dictionary;
pub use primitive::{Object, ObjectId};

// Type alias for compatibility
pub type ObjectReference = ObjectId;
