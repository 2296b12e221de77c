mod model;
mod repository;

pub use model::{NewYearCloseRecordDB, YearCloseRecordDB};
pub use repository::ClosureRepository;
