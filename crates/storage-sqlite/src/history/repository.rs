//! Append-only history repository.
//!
//! No update or delete statements exist here on purpose: entries are
//! immutable once written, and a dangling `document_id` stays in place when
//! the referenced document is deleted.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use pistosi_core::history::{BudgetHistoryEntry, HistoryLedgerTrait, NewBudgetHistoryEntry};
use pistosi_core::Result;

use super::model::{BudgetHistoryEntryDB, NewBudgetHistoryEntryDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::budget_history;

pub struct HistoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl HistoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        HistoryRepository { pool, writer }
    }
}

#[async_trait]
impl HistoryLedgerTrait for HistoryRepository {
    async fn append(&self, entry: NewBudgetHistoryEntry) -> Result<BudgetHistoryEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetHistoryEntry> {
                let new_entry = NewBudgetHistoryEntryDB::from(entry);
                let stored: BudgetHistoryEntryDB = diesel::insert_into(budget_history::table)
                    .values(&new_entry)
                    .returning(BudgetHistoryEntryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                stored.into_domain()
            })
            .await
    }

    fn list(&self, project_id: &str) -> Result<Vec<BudgetHistoryEntry>> {
        let mut conn = get_connection(&self.pool)?;
        // created_at is the primary sort key; id only breaks ties. Sorting by
        // id alone would misorder backfilled entries.
        let rows = budget_history::table
            .filter(budget_history::project_id.eq(project_id))
            .order((budget_history::created_at.desc(), budget_history::id.desc()))
            .load::<BudgetHistoryEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(BudgetHistoryEntryDB::into_domain)
            .collect()
    }
}
