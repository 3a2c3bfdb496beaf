// sqlx::Error -> AppError

use waitlist_core::error::AppError;

/// Convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let Some(code) = db_err.code() else {
                return AppError::Database(format!("Database error: {}", db_err.message()));
            };

            // SQLite extended result codes: https://www.sqlite.org/rescode.html
            match code.as_ref() {
                // UNIQUE / PRIMARY KEY constraint failed
                "2067" | "1555" => AppError::Conflict(format!(
                    "Unique constraint violation: {} ({})",
                    db_err.message(),
                    code
                )),
                // FOREIGN KEY constraint failed
                "787" => AppError::NotFound(format!(
                    "Referenced row does not exist: {}",
                    db_err.message()
                )),
                // SQLITE_BUSY / SQLITE_LOCKED and their extended forms
                "5" | "261" | "517" | "6" | "262" => AppError::Conflict(format!(
                    "Database locked ({}): {}",
                    code,
                    db_err.message()
                )),
                // SQLITE_FULL
                "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                other => AppError::Database(format!(
                    "Database error [{}]: {}",
                    other,
                    db_err.message()
                )),
            }
        }
        sqlx::Error::PoolTimedOut => {
            AppError::Timeout("Timed out waiting for a database connection".to_string())
        }
        sqlx::Error::RowNotFound => AppError::NotFound("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}
