// ABOUTME: Favourite and shopping-cart toggles with uniqueness enforced by storage
// ABOUTME: Adding twice is a conflict; removing an absent entry is not found
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{CollectionEntry, CollectionKind};
use tracing::info;

/// Favourites and cart service
#[derive(Clone)]
pub struct CollectionService {
    database: Database,
}

impl CollectionService {
    /// Create a collection service
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Add a recipe to the user's favourites or cart
    ///
    /// Concurrent adds of the same pair leave one row; every caller but one
    /// sees `Conflict`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the recipe does not exist or `Conflict` if the
    /// pair is already present
    pub async fn add(
        &self,
        kind: CollectionKind,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<CollectionEntry> {
        if self.database.recipes().get(recipe_id).await?.is_none() {
            return Err(AppError::not_found(format!("Recipe {recipe_id}")));
        }

        let entry = self
            .database
            .collections()
            .insert(kind, user_id, recipe_id)
            .await?
            .ok_or_else(|| {
                AppError::conflict(format!("Recipe {recipe_id} is already in {kind}"))
                    .with_user_id(user_id)
            })?;

        info!(user_id, recipe_id, collection = %kind, "Added to collection");
        Ok(entry)
    }

    /// Remove a recipe from the user's favourites or cart
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the pair is not present
    pub async fn remove(&self, kind: CollectionKind, user_id: i64, recipe_id: i64) -> AppResult<()> {
        if !self
            .database
            .collections()
            .delete(kind, user_id, recipe_id)
            .await?
        {
            return Err(AppError::not_found(format!("Recipe {recipe_id} in {kind}"))
                .with_user_id(user_id));
        }

        info!(user_id, recipe_id, collection = %kind, "Removed from collection");
        Ok(())
    }

    /// Whether the recipe is in the user's favourites or cart
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
        self.database
            .collections()
            .contains(kind, user_id, recipe_id)
            .await
    }
}
