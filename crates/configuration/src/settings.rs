use rust_decimal::Decimal;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
    pub rules: AcademicRules,
    pub security: SecuritySettings,
    pub display: DisplaySettings,
}

/// Connection-pool parameters. The `DATABASE_URL` itself is a secret and is
/// read from the environment, not from this file.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Upper bound on pooled connections; callers block on exhaustion.
    pub max_connections: u32,
    /// How long an acquire may block before the pool gives up.
    pub acquire_timeout_secs: u64,
}

/// The business rules the enrollment workflow enforces.
#[derive(Debug, Clone, Deserialize)]
pub struct AcademicRules {
    /// Advisory floor: enrolling below this total only raises a warning.
    pub min_credits_per_semester: Decimal,
    /// Hard ceiling on the per-term credit load.
    pub max_credits_per_semester: Decimal,
    /// Final grades at or above this line complete the course; below it fail.
    pub passing_grade: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecuritySettings {
    pub password_min_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplaySettings {
    /// Page size for paginated listings (e.g., the student roster).
    pub items_per_page: i64,
}
