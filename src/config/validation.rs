//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic checks the flag parser cannot express
//! - Runs once, before any other component is constructed
//!
//! Returns all validation errors, not just the first.

use std::fmt;

use thiserror::Error;

use crate::config::schema::Config;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("POSTGRES_URL should not be empty")]
    EmptyPostgresUrl,
}

/// Every problem found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check the configuration. Fields other than the postgres URL are accepted as-is.
pub fn validate_config(config: &Config) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if config.postgres_url.is_empty() {
        errors.push(ValidationError::EmptyPostgresUrl);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
