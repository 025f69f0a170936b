//! # Registrar Core Types
//!
//! The shared vocabulary of the registration system: domain enumerations
//! with their text encodings, entity and read-model structs, the grade
//! scale, and the crate-local error type.
//!
//! ## Architectural Principles
//!
//! - **Closed enumerations:** every string-backed code from the store maps
//!   to a tagged enum; unrecognized codes are rejected with a typed error
//!   instead of leaking raw strings through the system.
//! - **Decimal arithmetic:** credits, grades, and GPA values use
//!   `rust_decimal::Decimal` end to end; no floating point.
//! - **One shape per use case:** joined query results get explicit structs
//!   (`SectionInfo`, `EnrollmentInfo`, ...) instead of ad-hoc maps.

pub mod enums;
pub mod error;
pub mod grade;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AccountStatus, CourseType, EnrollmentStatus, Gender, Role, Semester};
pub use error::CoreError;
pub use grade::grade_points;
pub use structs::{
    Account, Course, CourseStatistics, Department, EnrollmentInfo, Instructor, NewAccount,
    NewCourse, NewDepartment, NewInstructor, NewSection, NewStudent, Section, SectionInfo,
    Student, StudentGpa, SystemStatistics,
};
