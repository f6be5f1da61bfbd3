use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Missing reference: {0}")]
    MissingReference(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some(UNIQUE_VIOLATION)
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
        )
    }

    /// Replaces a unique-constraint failure with a `ConstraintViolation`
    /// carrying `message`.
    pub(crate) fn on_unique_violation(self, message: impl FnOnce() -> String) -> Self {
        if self.is_unique_violation() {
            StorageError::ConstraintViolation(message())
        } else {
            self
        }
    }

    /// Replaces a foreign-key failure with a `MissingReference` carrying `message`.
    pub(crate) fn on_foreign_key_violation(self, message: impl FnOnce() -> String) -> Self {
        if self.is_foreign_key_violation() {
            StorageError::MissingReference(message())
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_constraint_violations() {
        let error = StorageError::from(sqlx::Error::RowNotFound);
        assert!(!error.is_unique_violation());
        assert!(!error.is_foreign_key_violation());
    }

    #[test]
    fn test_violation_mapping_keeps_unrelated_errors() {
        let error = StorageError::from(sqlx::Error::PoolTimedOut)
            .on_unique_violation(|| "duplicate".to_string())
            .on_foreign_key_violation(|| "missing".to_string());
        assert!(matches!(error, StorageError::Database(sqlx::Error::PoolTimedOut)));
    }
}
