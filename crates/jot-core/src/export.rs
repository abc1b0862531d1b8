//! Note export rendering shared by all clients.
//!
//! The core only renders payloads; writing the file and handing it to a
//! platform share mechanism is the caller's job.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::Note;

/// Export output format shared by all clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Text,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

/// Serializable note representation used in JSON exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportNote {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Convert a note into an export record.
#[must_use]
pub fn note_to_export_item(note: &Note) -> ExportNote {
    ExportNote {
        id: note.id.as_i64(),
        title: note.title.clone(),
        content: note.content.clone(),
        created_at: note.created_at,
        updated_at: note.updated_at,
    }
}

/// Render the plain-text payload for a single note, as handed to the share
/// collaborator: title, blank line, content.
#[must_use]
pub fn render_note_text(note: &Note) -> String {
    format!("{}\n\n{}", note.title, note.content)
}

/// Render notes as pretty-printed JSON.
pub fn render_json_export(notes: &[Note]) -> serde_json::Result<String> {
    let items = notes
        .iter()
        .map(note_to_export_item)
        .collect::<Vec<ExportNote>>();
    serde_json::to_string_pretty(&items)
}

/// Render notes as plain text, one title/content block per note.
#[must_use]
pub fn render_text_export(notes: &[Note]) -> String {
    let mut output = String::new();

    for (index, note) in notes.iter().enumerate() {
        if index > 0 {
            output.push_str("\n\n");
        }
        let _ = write!(output, "{}", render_note_text(note));
    }

    if !output.is_empty() {
        output.push('\n');
    }
    output
}

/// Render notes based on selected export format.
pub fn render_notes_export(notes: &[Note], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(notes),
        ExportFormat::Text => Ok(render_text_export(notes)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("jot-export-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteId;
    use pretty_assertions::assert_eq;

    fn note(id: i64, title: &str, content: &str) -> Note {
        Note {
            id: NoteId::from_i64(id),
            title: title.to_string(),
            content: content.to_string(),
            created_at: 123,
            updated_at: 456,
        }
    }

    #[test]
    fn render_note_text_separates_title_and_content() {
        let rendered = render_note_text(&note(1, "Groceries", "milk\neggs"));
        assert_eq!(rendered, "Groceries\n\nmilk\neggs");
    }

    #[test]
    fn render_note_text_with_empty_content() {
        let rendered = render_note_text(&note(1, "Just a title", ""));
        assert_eq!(rendered, "Just a title\n\n");
    }

    #[test]
    fn render_text_export_joins_blocks() {
        let notes = vec![note(1, "One", "a"), note(2, "Two", "b")];
        assert_eq!(render_text_export(&notes), "One\n\na\n\nTwo\n\nb\n");
    }

    #[test]
    fn render_json_export_includes_all_fields() {
        let rendered = render_json_export(&[note(7, "Title", "Body")]).unwrap();
        assert!(rendered.contains("\"id\": 7"));
        assert!(rendered.contains("\"title\": \"Title\""));
        assert!(rendered.contains("\"content\": \"Body\""));
        assert!(rendered.contains("\"created_at\": 123"));
        assert!(rendered.contains("\"updated_at\": 456"));
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Text, 123),
            "jot-export-123.txt"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 456),
            "jot-export-456.json"
        );
    }
}
