//! # Registrar Configuration Crate
//!
//! Strongly-typed application settings loaded from `config.toml`: the
//! connection-pool bounds, the academic business rules (credit limits, the
//! passing grade), and presentation page sizes. Secrets such as
//! `DATABASE_URL` stay in the environment and are never read here.

use crate::error::ConfigError;
use crate::settings::Config;
use rust_decimal::Decimal;

pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AcademicRules, Config as AppConfig, DatabaseSettings, DisplaySettings, SecuritySettings,
};

/// Loads the application configuration from the `config.toml` file.
///
/// Reads the configuration file, deserializes it into our strongly-typed
/// `Config` struct, validates the business-rule invariants, and returns it.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`.
        .add_source(config::File::with_name("config.toml"))
        // Environment variables win over the file, e.g. REGISTRAR__RULES__PASSING_GRADE.
        .add_source(config::Environment::with_prefix("REGISTRAR").separator("__"))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let rules = &config.rules;

    if rules.max_credits_per_semester <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "max_credits_per_semester must be positive".to_string(),
        ));
    }
    if rules.min_credits_per_semester > rules.max_credits_per_semester {
        return Err(ConfigError::ValidationError(
            "min_credits_per_semester exceeds max_credits_per_semester".to_string(),
        ));
    }
    if rules.passing_grade < Decimal::ZERO || rules.passing_grade > Decimal::from(100) {
        return Err(ConfigError::ValidationError(
            "passing_grade must lie within [0, 100]".to_string(),
        ));
    }
    if config.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "max_connections must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::*;
    use rust_decimal_macros::dec;

    fn sample() -> Config {
        Config {
            database: DatabaseSettings {
                max_connections: 10,
                acquire_timeout_secs: 5,
            },
            rules: AcademicRules {
                min_credits_per_semester: dec!(10),
                max_credits_per_semester: dec!(40),
                passing_grade: dec!(60),
            },
            security: SecuritySettings {
                password_min_length: 8,
            },
            display: DisplaySettings { items_per_page: 10 },
        }
    }

    #[test]
    fn accepts_the_shipped_defaults() {
        assert!(validate(&sample()).is_ok());
    }

    #[test]
    fn rejects_inverted_credit_bounds() {
        let mut config = sample();
        config.rules.min_credits_per_semester = dec!(50);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_out_of_range_passing_grade() {
        let mut config = sample();
        config.rules.passing_grade = dec!(101);
        assert!(validate(&config).is_err());
    }
}
