//! Per-entity repositories over the shared connection pool.
//!
//! Each repository owns the SQL for one entity and reconstructs fully-typed
//! values from row representations, rejecting unrecognized enum codes with
//! a typed error. Multi-step writes run inside a single transaction.

pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod instructors;
pub mod sections;
pub mod statistics;
pub mod students;
pub mod users;

pub use courses::CourseRepository;
pub use departments::DepartmentRepository;
pub use enrollments::{EnrollmentRepository, ProcedureOutcome};
pub use instructors::InstructorRepository;
pub use sections::SectionRepository;
pub use statistics::StatisticsRepository;
pub use students::StudentRepository;
pub use users::UserRepository;

use crate::DbError;
use core_types::CoreError;
use sqlx::Row;
use sqlx::postgres::PgRow;
use std::str::FromStr;

/// Reads a text-encoded enum column and parses it into its closed type.
fn parse_code<T>(row: &PgRow, column: &str) -> Result<T, DbError>
where
    T: FromStr<Err = CoreError>,
{
    let raw: String = row.try_get(column)?;
    Ok(raw.parse::<T>()?)
}

/// Nullable variant of [`parse_code`].
fn parse_code_opt<T>(row: &PgRow, column: &str) -> Result<Option<T>, DbError>
where
    T: FromStr<Err = CoreError>,
{
    let raw: Option<String> = row.try_get(column)?;
    Ok(raw.map(|value| value.parse::<T>()).transpose()?)
}
