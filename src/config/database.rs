// ABOUTME: Database URL type for file-backed and in-memory SQLite stores
// ABOUTME: Parses DATABASE_URL values and builds sqlx connection options
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Type-safe database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the URL names a server database or an empty path
    pub fn parse_url(s: &str) -> AppResult<Self> {
        if s.starts_with("postgresql://") || s.starts_with("postgres://") {
            return Err(AppError::config(
                "Only SQLite databases are supported (sqlite:<path> or sqlite::memory:)",
            ));
        }

        let path_str = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:"));
        match path_str.unwrap_or(s) {
            ":memory:" => Ok(Self::Memory),
            "" => Err(AppError::config("DATABASE_URL must name a database file")),
            path => Ok(Self::SQLite {
                path: PathBuf::from(path),
            }),
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }

    /// Database file path, if file-backed
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::SQLite { path } => Some(path),
            Self::Memory => None,
        }
    }

    /// Build sqlx connection options with foreign keys enforced
    ///
    /// # Errors
    ///
    /// Returns an error if sqlx rejects the connection string
    pub fn connect_options(&self) -> AppResult<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(&self.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL: {e}")))?
            .foreign_keys(true);

        Ok(match self {
            Self::SQLite { .. } => options
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
            Self::Memory => options,
        })
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/foodgram.db"),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}
