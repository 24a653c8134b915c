// ABOUTME: Recipe tag storage: schema, listing, lookup and creation
// ABOUTME: Name, color and slug are each unique at the storage level
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use super::ingredients::first_missing_id;
use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{NewTag, Tag};
use sqlx::{SqliteConnection, SqlitePool};

impl Database {
    /// Create the tags table
    pub(super) async fn migrate_tags(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE CHECK (length(name) BETWEEN 1 AND 144),
                color TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE CHECK (length(slug) BETWEEN 1 AND 144)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Recipe tag manager
pub struct TagsManager {
    pool: SqlitePool,
}

impl TagsManager {
    /// Create a new tags manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All tags ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(&self) -> AppResult<Vec<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list tags: {e}")))
    }

    /// Get a tag by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, tag_id: i64) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags WHERE id = $1")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get tag: {e}")))
    }

    /// Get a tag by slug
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get tag: {e}")))
    }

    /// Insert a validated tag
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the name, color or slug is already used
    pub async fn create(&self, tag: &NewTag) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>(
            r"
            INSERT INTO tags (name, color, slug)
            VALUES ($1, $2, $3)
            RETURNING id, name, color, slug
            ",
        )
        .bind(&tag.name)
        .bind(&tag.color)
        .bind(&tag.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::conflict(format!(
                "Tag with this name, color or slug already exists: {}",
                tag.slug
            )),
            _ => AppError::from(e),
        })
    }

    /// First id in `ids` (input order) with no matching tag
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn first_missing(
        conn: &mut SqliteConnection,
        ids: &[i64],
    ) -> AppResult<Option<i64>> {
        first_missing_id(conn, "tags", ids).await
    }
}
