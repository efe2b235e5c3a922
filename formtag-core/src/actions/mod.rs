//! PDF actions according to ISO 32000-1 Chapter 12.6
//!
//! Only the actions form widgets need: submitting and resetting the form,
//! and viewer scripts bound to field events.

mod action;

pub use action::{Action, ActionType, ScriptTrigger, SubmitFlags};
