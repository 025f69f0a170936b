//! # Registrar Services Crate
//!
//! The business layer: authentication and role-gated sessions, the
//! enrollment allocation workflow, academic record views, and catalog
//! management. Each service owns the repositories it needs and enforces
//! the academic rules from configuration; the interface layer above never
//! touches SQL or repositories directly.
//!
//! ## Architectural Principles
//!
//! - **Typed outcomes:** expected business failures (`Ineligible`,
//!   `InvalidCredentials`, `NotFound`) are variants, not strings; only
//!   unexpected persistence failures collapse into a generic error after
//!   being logged in full.
//! - **Advisory check, atomic commit:** eligibility is evaluated in
//!   process for fast, explanatory refusals, but the enrollment commit is
//!   delegated to the store's atomic procedure, which has the final word.
//! - **Credentials stop here:** plaintext passwords are hashed on the way
//!   in and verified on the way through; nothing above or below this crate
//!   ever sees the stored hash.

pub mod catalog;
pub mod enrollment;
pub mod error;
pub mod password;
pub mod records;
pub mod session;

pub use catalog::CatalogService;
pub use enrollment::{
    check_eligibility, evaluate_grade, EligibilityError, EligibilityWarning, EnrollmentReceipt,
    EnrollmentService,
};
pub use error::ServiceError;
pub use records::{weighted_gpa, RecordsService, Transcript};
pub use session::{Session, SessionInfo, SessionService};

use configuration::AppConfig;
use database::{
    CourseRepository, DepartmentRepository, EnrollmentRepository, InstructorRepository,
    SectionRepository, StatisticsRepository, StudentRepository, UserRepository,
};
use sqlx::PgPool;

/// Every service wired over one shared pool, ready for the interface
/// layer to drive.
pub struct AppContext {
    pub session: SessionService,
    pub enrollment: EnrollmentService,
    pub records: RecordsService,
    pub catalog: CatalogService,
}

impl AppContext {
    pub fn new(pool: PgPool, config: &AppConfig) -> Self {
        let session = SessionService::new(
            UserRepository::new(pool.clone()),
            StudentRepository::new(pool.clone()),
            InstructorRepository::new(pool.clone()),
        );
        let enrollment = EnrollmentService::new(
            SectionRepository::new(pool.clone()),
            EnrollmentRepository::new(pool.clone()),
            config.rules.clone(),
        );
        let records = RecordsService::new(
            EnrollmentRepository::new(pool.clone()),
            StatisticsRepository::new(pool.clone()),
        );
        let catalog = CatalogService::new(
            StudentRepository::new(pool.clone()),
            InstructorRepository::new(pool.clone()),
            CourseRepository::new(pool.clone()),
            SectionRepository::new(pool.clone()),
            DepartmentRepository::new(pool),
            config.security.clone(),
            config.display.clone(),
        );

        Self {
            session,
            enrollment,
            records,
            catalog,
        }
    }
}
