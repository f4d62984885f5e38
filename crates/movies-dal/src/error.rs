pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] garde::Report),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}

impl Error {
    /// Maps foreign key violations reported by the store to [`Error::InvalidReference`]
    pub(crate) fn from_constraint(err: sqlx::Error, what: &str) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                Error::InvalidReference(format!("{what}: {}", db_err.message()))
            }
            other => Error::DatabaseError(other),
        }
    }
}
