// ABOUTME: Recipe storage: schema, tag and ingredient associations, filtered listing
// ABOUTME: Write helpers run on a caller-supplied connection so they join a transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{
    IngredientLine, Recipe, RecipeFilter, RecipeIngredientView, RecipeShort, Tag,
};
use crate::pagination::PageRequest;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const RECIPE_COLUMNS: &str = "r.id, r.author_id, r.name, r.text, r.image, r.cooking_time";

impl Database {
    /// Create recipe, recipe-tag and recipe-ingredient tables
    pub(super) async fn migrate_recipes(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 144),
                text TEXT NOT NULL CHECK (length(text) >= 1),
                image TEXT NOT NULL,
                cooking_time INTEGER NOT NULL CHECK (cooking_time >= 1),
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_tags (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (recipe_id, tag_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // No uniqueness on (recipe_id, ingredient_id): duplicates are rejected on write
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
                amount INTEGER NOT NULL CHECK (amount BETWEEN 1 AND 32767)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipe_tags_tag ON recipe_tags(tag_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Scalar column values written for a recipe row
#[derive(Debug, Clone, Copy)]
pub struct RecipeRow<'a> {
    /// Title
    pub name: &'a str,
    /// Description
    pub text: &'a str,
    /// Minutes
    pub cooking_time: i64,
}

/// Recipe manager
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a recipe row by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"
        ))
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))
    }

    /// Tags attached to a recipe, ordered by tag id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn tags_of(&self, recipe_id: i64) -> AppResult<Vec<Tag>> {
        sqlx::query_as::<_, Tag>(
            r"
            SELECT t.id, t.name, t.color, t.slug
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id = $1
            ORDER BY t.id
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load recipe tags: {e}")))
    }

    /// Ingredient lines of a recipe in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn ingredients_of(&self, recipe_id: i64) -> AppResult<Vec<RecipeIngredientView>> {
        sqlx::query_as::<_, RecipeIngredientView>(
            r"
            SELECT i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY ri.id
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load recipe ingredients: {e}")))
    }

    /// One page of recipes matching `filter`, ordered by id, with the total count
    ///
    /// `is_favorited` and `is_in_shopping_cart` only narrow the result when a
    /// viewer is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> AppResult<(Vec<Recipe>, u64)> {
        let mut count_query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM recipes r WHERE 1 = 1");
        push_recipe_filter(&mut count_query, filter, viewer);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE 1 = 1"));
        push_recipe_filter(&mut query, filter, viewer);
        query
            .push(" ORDER BY r.id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let recipes = query
            .build_query_as::<Recipe>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        Ok((recipes, total.max(0) as u64))
    }

    /// An author's recipes in compact form, ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn short_by_author(
        &self,
        author_id: i64,
        limit: Option<i64>,
    ) -> AppResult<Vec<RecipeShort>> {
        // SQLite treats a negative LIMIT as unbounded
        sqlx::query_as::<_, RecipeShort>(
            r"
            SELECT id, name, image, cooking_time
            FROM recipes
            WHERE author_id = $1
            ORDER BY id
            LIMIT $2
            ",
        )
        .bind(author_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list author recipes: {e}")))
    }

    /// Number of recipes by an author
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_by_author(&self, author_id: i64) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count author recipes: {e}")))
    }

    /// Delete a recipe; associations, favourites and cart rows cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete(&self, recipe_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Insert a recipe row, returning its id
    ///
    /// # Errors
    ///
    /// Returns an error if a constraint rejects the row or the insert fails
    pub async fn insert(
        conn: &mut SqliteConnection,
        author_id: i64,
        row: RecipeRow<'_>,
        image: &str,
    ) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO recipes (author_id, name, text, image, cooking_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(author_id)
        .bind(row.name)
        .bind(row.text)
        .bind(image)
        .bind(row.cooking_time)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Overwrite a recipe's scalar columns; the image only when one is given
    ///
    /// Returns `false` when no recipe has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if a constraint rejects the values or the update fails
    pub async fn update_fields(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        row: RecipeRow<'_>,
        image: Option<&str>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE recipes
            SET name = $1, text = $2, cooking_time = $3, image = COALESCE($4, image)
            WHERE id = $5
            ",
        )
        .bind(row.name)
        .bind(row.text)
        .bind(row.cooking_time)
        .bind(image)
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace a recipe's tag set; repeated ids collapse to one link
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn replace_tags(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        tag_ids: &[i64],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *conn)
            .await?;

        for tag_id in tag_ids {
            sqlx::query("INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
                .bind(recipe_id)
                .bind(*tag_id)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }

    /// Replace a recipe's ingredient lines, keeping input order
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn replace_ingredients(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        lines: &[IngredientLine],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *conn)
            .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES ($1, $2, $3)",
            )
            .bind(recipe_id)
            .bind(line.ingredient_id)
            .bind(line.amount)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}

/// Append the `AND ...` predicates for a recipe filter
fn push_recipe_filter(
    query: &mut QueryBuilder<'_, Sqlite>,
    filter: &RecipeFilter,
    viewer: Option<i64>,
) {
    if let Some(author_id) = filter.author {
        query.push(" AND r.author_id = ").push_bind(author_id);
    }

    if !filter.tags.is_empty() {
        query.push(
            " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
             WHERE rt.recipe_id = r.id AND t.slug IN (",
        );
        let mut slugs = query.separated(", ");
        for slug in &filter.tags {
            slugs.push_bind(slug.clone());
        }
        slugs.push_unseparated("))");
    }

    if let Some(viewer_id) = viewer {
        if filter.is_favorited {
            query
                .push(" AND EXISTS (SELECT 1 FROM favourites f WHERE f.recipe_id = r.id AND f.user_id = ")
                .push_bind(viewer_id)
                .push(")");
        }
        if filter.is_in_shopping_cart {
            query
                .push(" AND EXISTS (SELECT 1 FROM carts c WHERE c.recipe_id = r.id AND c.user_id = ")
                .push_bind(viewer_id)
                .push(")");
        }
    }
}
