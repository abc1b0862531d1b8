use std::path::Path;

use crate::commands::common::{
    capture_editor_input_with_initial, normalize_title_arg, open_database, parse_note_id,
};
use crate::error::CliError;

pub async fn run_edit(id: &str, new_title: Option<&str>, db_path: &Path) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let db = open_database(db_path).await?;

    let note = db
        .get_note(note_id)
        .await?
        .ok_or_else(|| CliError::NoteNotFound(id.trim().to_string()))?;

    let edited_content = capture_editor_input_with_initial(&note.content)?.unwrap_or_default();

    let title = match new_title {
        Some(title) => normalize_title_arg(title)?,
        None => note.title.clone(),
    };

    let updated = db
        .update_note(note.id, &title, &edited_content)
        .await?
        .ok_or_else(|| CliError::NoteNotFound(id.trim().to_string()))?;

    println!("{}", updated.id);
    Ok(())
}
