use async_trait::async_trait;

use crate::closures::closures_model::{NewYearCloseRecord, YearCloseRecord};
use crate::errors::Result;

/// Trait for year-close record storage.
///
/// The store must enforce uniqueness of `(project_id, year)`; a duplicate
/// insert fails with `DatabaseError::UniqueViolation`, which the service
/// treats as an idempotent no-op.
#[async_trait]
pub trait ClosureStoreTrait: Send + Sync {
    fn find(&self, project_id: &str, year: i32) -> Result<Option<YearCloseRecord>>;

    async fn insert(&self, record: NewYearCloseRecord) -> Result<YearCloseRecord>;
}
