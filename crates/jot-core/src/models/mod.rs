//! Data models for Jot

mod note;

pub use note::{normalize_title, Note, NoteId};
