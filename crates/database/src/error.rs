use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection is not configured: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// No row matched; carries a description of what was looked up.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A unique constraint rejected the write.
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    /// A referenced row does not exist.
    #[error("Dangling reference: {0}")]
    ForeignKey(String),
}

impl DbError {
    pub(crate) fn not_found(entity: &str, key: impl std::fmt::Display) -> Self {
        DbError::NotFound(format!("{entity} {key}"))
    }

    /// Classifies a failed INSERT, pulling constraint violations out of the
    /// generic driver error.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown constraint").to_string();
            if db_err.is_unique_violation() {
                return DbError::Duplicate(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return DbError::ForeignKey(constraint);
            }
        }
        DbError::ConnectionError(err)
    }
}
