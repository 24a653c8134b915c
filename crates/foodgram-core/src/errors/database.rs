// ABOUTME: Conversion from sqlx errors into AppError
// ABOUTME: Constraint violations become domain outcomes, everything else a database error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use super::{AppError, ErrorCode};

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        let (code, message) = match &error {
            sqlx::Error::RowNotFound => (ErrorCode::ResourceNotFound, "Record not found".to_owned()),
            sqlx::Error::Database(db) if db.is_unique_violation() => (
                ErrorCode::ResourceAlreadyExists,
                format!("Record already exists: {}", db.message()),
            ),
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => (
                ErrorCode::ResourceNotFound,
                "Referenced record does not exist".to_owned(),
            ),
            sqlx::Error::Database(db) if db.is_check_violation() => (
                ErrorCode::InvalidInput,
                format!("Constraint violated: {}", db.message()),
            ),
            sqlx::Error::PoolTimedOut => (
                ErrorCode::DatabaseError,
                "Database pool timed out".to_owned(),
            ),
            other => (ErrorCode::DatabaseError, format!("Database error: {other}")),
        };

        Self::new(code, message).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(error.code, ErrorCode::ResourceNotFound);
    }

    #[test]
    fn test_pool_closed_maps_to_database_error() {
        let error = AppError::from(sqlx::Error::PoolClosed);
        assert_eq!(error.code, ErrorCode::DatabaseError);
        assert!(error.source.is_some());
    }
}
