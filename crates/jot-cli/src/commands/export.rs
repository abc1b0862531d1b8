use std::path::Path;

use jot_core::export::{render_note_text, render_notes_export, ExportFormat};

use crate::commands::common::{list_all_notes, open_database, parse_note_id};
use crate::error::CliError;

pub async fn run_export(
    note_id: Option<&str>,
    format: ExportFormat,
    output_path: Option<&Path>,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path).await?;

    let rendered = if let Some(id) = note_id {
        let parsed = parse_note_id(id)?;
        let note = db
            .get_note(parsed)
            .await?
            .ok_or_else(|| CliError::NoteNotFound(id.trim().to_string()))?;

        match format {
            ExportFormat::Text => render_note_text(&note),
            ExportFormat::Json => render_notes_export(&[note], format)?,
        }
    } else {
        let notes = list_all_notes(&db).await?;
        render_notes_export(&notes, format)?
    };

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
