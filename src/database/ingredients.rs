// ABOUTME: Reference ingredient storage: schema, prefix search and natural-key upsert
// ABOUTME: Also resolves which ingredient ids in a recipe write are unknown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Ingredient;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashSet;

impl Database {
    /// Create the ingredients table
    pub(super) async fn migrate_ingredients(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 144),
                measurement_unit TEXT NOT NULL CHECK (length(measurement_unit) BETWEEN 1 AND 144),
                UNIQUE (name, measurement_unit)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_ingredients_name ON ingredients(name)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Reference ingredient manager
pub struct IngredientsManager {
    pool: SqlitePool,
}

impl IngredientsManager {
    /// Create a new ingredients manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List ingredients ordered by name, optionally narrowed to a name prefix
    ///
    /// The prefix match is case-sensitive and literal (no wildcards).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(&self, name_prefix: Option<&str>) -> AppResult<Vec<Ingredient>> {
        let prefix = name_prefix.map(str::trim).filter(|p| !p.is_empty());

        let query = match prefix {
            Some(prefix) => sqlx::query_as::<_, Ingredient>(
                r"
                SELECT id, name, measurement_unit
                FROM ingredients
                WHERE substr(name, 1, length($1)) = $1
                ORDER BY name, id
                ",
            )
            .bind(prefix.to_owned()),
            None => sqlx::query_as::<_, Ingredient>(
                "SELECT id, name, measurement_unit FROM ingredients ORDER BY name, id",
            ),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))
    }

    /// Get an ingredient by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, ingredient_id: i64) -> AppResult<Option<Ingredient>> {
        sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM ingredients WHERE id = $1",
        )
        .bind(ingredient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))
    }

    /// Get-or-create by `(name, measurement_unit)`
    ///
    /// Returns the stored ingredient and whether this call created it.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is empty or overlong, or the database fails
    pub async fn upsert(&self, name: &str, measurement_unit: &str) -> AppResult<(Ingredient, bool)> {
        let inserted = sqlx::query(
            r"
            INSERT INTO ingredients (name, measurement_unit)
            VALUES ($1, $2)
            ON CONFLICT (name, measurement_unit) DO NOTHING
            ",
        )
        .bind(name)
        .bind(measurement_unit)
        .execute(&self.pool)
        .await?;

        let ingredient = sqlx::query_as::<_, Ingredient>(
            r"
            SELECT id, name, measurement_unit
            FROM ingredients
            WHERE name = $1 AND measurement_unit = $2
            ",
        )
        .bind(name)
        .bind(measurement_unit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read back ingredient: {e}")))?;

        Ok((ingredient, inserted.rows_affected() > 0))
    }

    /// First id in `ids` (input order) with no matching ingredient
    ///
    /// Runs on the caller's connection so it sees the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn first_missing(
        conn: &mut SqliteConnection,
        ids: &[i64],
    ) -> AppResult<Option<i64>> {
        first_missing_id(conn, "ingredients", ids).await
    }
}

/// First id in `ids` absent from `table`, preserving input order
pub(super) async fn first_missing_id(
    conn: &mut SqliteConnection,
    table: &'static str,
    ids: &[i64],
) -> AppResult<Option<i64>> {
    if ids.is_empty() {
        return Ok(None);
    }

    let mut query: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new(format!("SELECT id FROM {table} WHERE id IN ("));
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let found: HashSet<i64> = query
        .build_query_scalar::<i64>()
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to resolve {table} ids: {e}")))?
        .into_iter()
        .collect();

    Ok(ids.iter().copied().find(|id| !found.contains(id)))
}
