//! Year-close record repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use pistosi_core::closures::{ClosureStoreTrait, NewYearCloseRecord, YearCloseRecord};
use pistosi_core::Result;

use super::model::{NewYearCloseRecordDB, YearCloseRecordDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::budget_year_closures;
use crate::utils::format_timestamp;

pub struct ClosureRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ClosureRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ClosureRepository { pool, writer }
    }
}

#[async_trait]
impl ClosureStoreTrait for ClosureRepository {
    fn find(&self, project_id: &str, year: i32) -> Result<Option<YearCloseRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let row = budget_year_closures::table
            .filter(budget_year_closures::project_id.eq(project_id))
            .filter(budget_year_closures::year.eq(year))
            .first::<YearCloseRecordDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(YearCloseRecordDB::into_domain).transpose()
    }

    /// The `(project_id, year)` unique index makes a duplicate insert fail
    /// with `UniqueViolation`, which the closure service treats as
    /// already-closed.
    async fn insert(&self, record: NewYearCloseRecord) -> Result<YearCloseRecord> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<YearCloseRecord> {
                let new_record = NewYearCloseRecordDB {
                    id: Uuid::new_v4().to_string(),
                    project_id: record.project_id,
                    year: record.year,
                    archived_amount: record.archived_amount.to_string(),
                    closed_at: format_timestamp(Utc::now()),
                };

                let stored: YearCloseRecordDB = diesel::insert_into(budget_year_closures::table)
                    .values(&new_record)
                    .returning(YearCloseRecordDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                stored.into_domain()
            })
            .await
    }
}
