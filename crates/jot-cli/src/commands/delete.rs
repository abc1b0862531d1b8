use std::path::Path;

use crate::commands::common::{open_database, parse_note_id};
use crate::error::CliError;

pub async fn run_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let db = open_database(db_path).await?;

    // Deleting an unknown id is a no-op.
    db.delete_note(note_id).await?;

    println!("{note_id}");
    Ok(())
}
