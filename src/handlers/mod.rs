pub mod auth;
pub mod cart;
pub mod checkout;
pub mod favorite;
pub mod product;

use sqlx::Error as SqlxError;

use crate::error::AppError;

/// SQLite reports UNIQUE violations with extended result code 2067.
pub(crate) fn map_unique_violation(err: SqlxError, message: &str) -> AppError {
    match err {
        SqlxError::Database(db_err)
            if db_err.code().as_deref() == Some("2067")
                || db_err.message().contains("UNIQUE constraint failed") =>
        {
            AppError::conflict(message)
        }
        other => other.into(),
    }
}
