//! # Registrar Database Crate
//!
//! This crate is the persistence gateway: a high-level, application-specific
//! interface to the PostgreSQL database. It is the sole owner of SQL text,
//! connection pooling, and transaction lifecycles.
//!
//! ## Architectural Principles
//!
//! - **Adapter layer:** repositories encapsulate all database-specific
//!   logic and expose typed entities to the rest of the application.
//! - **The store arbitrates races:** the enrollment commit runs inside the
//!   `sp_enroll_student` stored procedure, which re-validates capacity under
//!   a row lock; application code never substitutes in-process locking.
//! - **Asynchronous & pooled:** all operations are async over a bounded
//!   `PgPool`; pool exhaustion blocks callers up to the acquire timeout.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: pool construction and embedded schema
//!   migrations (tables, stored procedures, the statistics view).
//! - The per-entity repositories (`UserRepository`, `StudentRepository`,
//!   `EnrollmentRepository`, ...) built on the shared pool.
//! - `DbError`: the specific error types that can be returned from here.

pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{
    CourseRepository, DepartmentRepository, EnrollmentRepository, InstructorRepository,
    ProcedureOutcome, SectionRepository, StatisticsRepository, StudentRepository, UserRepository,
};
