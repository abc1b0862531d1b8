use std::path::Path;

use crate::commands::common::{normalize_title_arg, open_database, resolve_note_content};
use crate::error::CliError;

pub async fn run_add(title: &str, content_parts: &[String], db_path: &Path) -> Result<(), CliError> {
    let title = normalize_title_arg(title)?;
    let content = resolve_note_content(content_parts)?;

    let db = open_database(db_path).await?;
    let note = db.create_note(&title, &content).await?;

    println!("{}", note.id);
    Ok(())
}
