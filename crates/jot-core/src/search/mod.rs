//! Search-as-you-type coordination.
//!
//! Search is re-issued on every keystroke, so an earlier query can complete
//! after a later one. `SearchSession` hands each query a monotonically
//! increasing ticket and drops any result whose ticket is no longer the
//! newest, so callers only ever render the most recently issued query.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::Note;
use crate::services::DatabaseService;
use crate::Result;

/// Stale-result suppression over [`DatabaseService::search_notes`].
#[derive(Clone)]
pub struct SearchSession {
    db: DatabaseService,
    latest_ticket: Arc<AtomicU64>,
}

impl SearchSession {
    pub fn new(db: DatabaseService) -> Self {
        Self {
            db,
            latest_ticket: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run a search; `Ok(None)` means a newer search was issued before this
    /// one completed and its result must not be rendered.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Option<Vec<Note>>> {
        let ticket = self.begin();
        let notes = self.db.search_notes(query, limit).await?;

        if self.is_current(ticket) {
            Ok(Some(notes))
        } else {
            Ok(None)
        }
    }

    fn begin(&self) -> u64 {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.latest_ticket.load(Ordering::SeqCst) == ticket
    }
}
