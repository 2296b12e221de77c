//! Database models for year-close records.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use pistosi_core::closures::YearCloseRecord;
use pistosi_core::errors::Result;

use crate::utils::{parse_amount, parse_timestamp};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_year_closures)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct YearCloseRecordDB {
    pub id: String,
    pub project_id: String,
    pub year: i32,
    pub archived_amount: String,
    pub closed_at: String,
}

impl YearCloseRecordDB {
    pub fn into_domain(self) -> Result<YearCloseRecord> {
        Ok(YearCloseRecord {
            id: self.id,
            year: self.year,
            archived_amount: parse_amount(&self.archived_amount)?,
            closed_at: parse_timestamp(&self.closed_at)?,
            project_id: self.project_id,
        })
    }
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_year_closures)]
#[serde(rename_all = "camelCase")]
pub struct NewYearCloseRecordDB {
    pub id: String,
    pub project_id: String,
    pub year: i32,
    pub archived_amount: String,
    pub closed_at: String,
}
