// ABOUTME: Favourite and shopping-cart storage sharing one shape per collection kind
// ABOUTME: Uniqueness of (user, recipe) is enforced by the schema, not by read-then-write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{CollectionEntry, CollectionKind};
use sqlx::{FromRow, SqlitePool};

impl Database {
    /// Create the favourites and carts tables
    pub(super) async fn migrate_collections(&self) -> AppResult<()> {
        for kind in [CollectionKind::Favourite, CollectionKind::Cart] {
            let table = kind.table();
            sqlx::query(&format!(
                r"
                CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                    UNIQUE (user_id, recipe_id)
                )
                "
            ))
            .execute(&self.pool)
            .await?;

            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_recipe ON {table}(recipe_id)"
            ))
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }
}

/// One ingredient row reached through a user's cart
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CartIngredientRow {
    /// Ingredient name
    pub name: String,
    /// Amount in this recipe
    pub amount: i64,
    /// Ingredient unit
    pub measurement_unit: String,
}

/// Favourites and cart manager
pub struct CollectionsManager {
    pool: SqlitePool,
}

impl CollectionsManager {
    /// Create a new collections manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a (user, recipe) pair unless it is already present
    ///
    /// Returns `None` when the pair already existed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user or recipe row is missing, or a database
    /// error if the insert fails
    pub async fn insert(
        &self,
        kind: CollectionKind,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<Option<CollectionEntry>> {
        let table = kind.table();
        let entry = sqlx::query_as::<_, CollectionEntry>(&format!(
            r"
            INSERT INTO {table} (user_id, recipe_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, recipe_id) DO NOTHING
            RETURNING id, user_id, recipe_id
            "
        ))
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Remove a (user, recipe) pair; `false` when there was none
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete(&self, kind: CollectionKind, user_id: i64, recipe_id: i64) -> AppResult<bool> {
        let table = kind.table();
        let result = sqlx::query(&format!(
            "DELETE FROM {table} WHERE user_id = $1 AND recipe_id = $2"
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to remove from {kind}: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the pair is present
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn contains(
        &self,
        kind: CollectionKind,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<bool> {
        let table = kind.table();
        let found: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT id FROM {table} WHERE user_id = $1 AND recipe_id = $2"
        ))
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check {kind}: {e}")))?;

        Ok(found.is_some())
    }

    /// Number of entries a user holds in a collection
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count(&self, kind: CollectionKind, user_id: i64) -> AppResult<i64> {
        let table = kind.table();
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE user_id = $1"))
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count {kind}: {e}")))
    }

    /// Ingredient rows of every recipe in a user's cart
    ///
    /// Ordered by cart insertion, then by ingredient line insertion.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn cart_ingredient_rows(&self, user_id: i64) -> AppResult<Vec<CartIngredientRow>> {
        sqlx::query_as::<_, CartIngredientRow>(
            r"
            SELECT i.name, ri.amount, i.measurement_unit
            FROM carts c
            JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE c.user_id = $1
            ORDER BY c.id, ri.id
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load cart ingredients: {e}")))
    }
}
