use sqlx::PgPool;

use crate::app_error::AppError;

pub mod signup;

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // Unique index on lower(trim(email)) backs the duplicate check
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateEmail
            }
            _ => {
                tracing::error!(error = %err, "Database error");
                AppError::Storage(err.to_string())
            }
        }
    }
}
