// ABOUTME: Recipe composition: validated, atomic create and update of recipes with tags and ingredients
// ABOUTME: Also assembles recipe read shapes, filtered listings, ownership checks and deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Recipe Composition
//!
//! A recipe write is validated in two stages. Structural rules (required
//! fields, positive amounts, no repeated ingredient) are checked before any
//! I/O. Reference rules (every ingredient and tag id exists) are checked
//! inside the write transaction, so the recipe row, its tag links and its
//! ingredient lines are committed together or not at all.
//!
//! The image payload is stored before the transaction opens; if the
//! transaction fails the stored image is discarded again.

use crate::constants::{
    fields,
    limits::{MAX_AMOUNT, MAX_NAME_LENGTH, MIN_AMOUNT, MIN_COOKING_TIME},
};
use crate::database::{
    Database, IngredientsManager, RecipeRow, RecipesManager, SqliteTransactionGuard, TagsManager,
};
use crate::errors::{AppError, AppResult};
use crate::media::ImageStore;
use crate::models::{
    CollectionKind, IngredientLine, Recipe, RecipeDetail, RecipeFields, RecipeFilter,
};
use crate::pagination::{Page, PageRequest};
use crate::services::subscriptions::SubscriptionService;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Validate scalar recipe fields
///
/// `require_image` is set on create; on update an absent or blank image
/// keeps the stored one.
///
/// # Errors
///
/// Returns a field-level validation error for the first violated rule
pub fn validate_fields(recipe: &RecipeFields, require_image: bool) -> AppResult<()> {
    let name = recipe.name.trim();
    if name.is_empty() {
        return Err(AppError::validation(fields::NAME, "name is required"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation(
            fields::NAME,
            format!("name must be at most {MAX_NAME_LENGTH} characters"),
        ));
    }
    if recipe.text.trim().is_empty() {
        return Err(AppError::validation(fields::TEXT, "text is required"));
    }
    if recipe.cooking_time < MIN_COOKING_TIME {
        return Err(AppError::validation(
            fields::COOKING_TIME,
            format!("cooking time must be at least {MIN_COOKING_TIME} minute"),
        ));
    }
    if require_image && image_payload(recipe).is_none() {
        return Err(AppError::validation(fields::IMAGE, "image is required"));
    }
    Ok(())
}

/// Validate the shape of an ingredient-line list
///
/// Lines are checked in order; for each line a repeat is reported before a
/// non-positive amount.
///
/// # Errors
///
/// Returns a validation error on the `ingredients` field for an empty or
/// repeating list, or on the `amount` field for a non-positive amount
pub fn validate_ingredient_lines(lines: &[IngredientLine]) -> AppResult<()> {
    if lines.is_empty() {
        return Err(AppError::validation(
            fields::INGREDIENTS,
            "at least one ingredient required",
        ));
    }

    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        if !seen.insert(line.ingredient_id) {
            return Err(AppError::validation(
                fields::INGREDIENTS,
                "ingredients must not repeat",
            ));
        }
        if line.amount < MIN_AMOUNT {
            return Err(AppError::validation(fields::AMOUNT, "amount must exceed 0"));
        }
        if line.amount > MAX_AMOUNT {
            return Err(AppError::validation(
                fields::AMOUNT,
                format!("amount must not exceed {MAX_AMOUNT}"),
            ));
        }
    }
    Ok(())
}

/// Tag ids with repeats removed, first occurrence order kept
#[must_use]
pub fn dedup_tag_ids(tag_ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(tag_ids.len());
    tag_ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

fn image_payload(recipe: &RecipeFields) -> Option<&str> {
    recipe
        .image
        .as_deref()
        .map(str::trim)
        .filter(|payload| !payload.is_empty())
}

fn recipe_row(recipe: &RecipeFields) -> RecipeRow<'_> {
    RecipeRow {
        name: recipe.name.trim(),
        text: recipe.text.trim(),
        cooking_time: recipe.cooking_time,
    }
}

/// Fail with `NotFound` for the first unknown ingredient or tag id
async fn ensure_references(
    tx: &mut SqliteTransactionGuard<'_>,
    tag_ids: &[i64],
    lines: &[IngredientLine],
) -> AppResult<()> {
    let ingredient_ids: Vec<i64> = lines.iter().map(|line| line.ingredient_id).collect();
    if let Some(missing) = IngredientsManager::first_missing(tx.executor()?, &ingredient_ids).await? {
        return Err(AppError::not_found(format!("Ingredient {missing}"))
            .with_resource_id(missing.to_string()));
    }
    if let Some(missing) = TagsManager::first_missing(tx.executor()?, tag_ids).await? {
        return Err(AppError::not_found(format!("Tag {missing}")).with_resource_id(missing.to_string()));
    }
    Ok(())
}

/// Recipe composition and query service
#[derive(Clone)]
pub struct RecipeService {
    database: Database,
    images: Arc<dyn ImageStore>,
}

impl RecipeService {
    /// Create a recipe service
    #[must_use]
    pub fn new(database: Database, images: Arc<dyn ImageStore>) -> Self {
        Self { database, images }
    }

    /// Create a recipe with its tags and ingredient lines in one transaction
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed input, `NotFound` for an
    /// unknown author, ingredient or tag, or a storage/database error
    pub async fn create_recipe(
        &self,
        author_id: i64,
        recipe: RecipeFields,
        tag_ids: &[i64],
        lines: &[IngredientLine],
    ) -> AppResult<Recipe> {
        validate_fields(&recipe, true)?;
        validate_ingredient_lines(lines)?;
        let tag_ids = dedup_tag_ids(tag_ids);

        let payload = image_payload(&recipe)
            .ok_or_else(|| AppError::validation(fields::IMAGE, "image is required"))?;
        let image = self.images.store(payload).await?;

        let recipe_id = match self
            .insert_recipe(author_id, &recipe, &tag_ids, lines, &image)
            .await
        {
            Ok(recipe_id) => recipe_id,
            Err(e) => {
                self.discard_image(&image).await;
                return Err(e.with_user_id(author_id));
            }
        };

        info!(
            recipe_id,
            author_id,
            ingredients = lines.len(),
            tags = tag_ids.len(),
            "Recipe created"
        );
        self.get_recipe(recipe_id).await
    }

    async fn insert_recipe(
        &self,
        author_id: i64,
        recipe: &RecipeFields,
        tag_ids: &[i64],
        lines: &[IngredientLine],
        image: &str,
    ) -> AppResult<i64> {
        let mut tx = self.database.begin().await?;
        ensure_references(&mut tx, tag_ids, lines).await?;

        let recipe_id =
            RecipesManager::insert(tx.executor()?, author_id, recipe_row(recipe), image).await?;
        RecipesManager::replace_tags(tx.executor()?, recipe_id, tag_ids).await?;
        RecipesManager::replace_ingredients(tx.executor()?, recipe_id, lines).await?;

        tx.commit().await?;
        Ok(recipe_id)
    }

    /// Replace a recipe's fields, tags and ingredient lines in one transaction
    ///
    /// The image is replaced only when a new payload is supplied.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing recipe, ingredient or tag, a
    /// validation error for malformed input, or a storage/database error
    pub async fn update_recipe(
        &self,
        recipe_id: i64,
        recipe: RecipeFields,
        tag_ids: &[i64],
        lines: &[IngredientLine],
    ) -> AppResult<Recipe> {
        validate_fields(&recipe, false)?;
        validate_ingredient_lines(lines)?;
        let tag_ids = dedup_tag_ids(tag_ids);

        let existing = self.get_recipe(recipe_id).await?;
        let new_image = match image_payload(&recipe) {
            Some(payload) => Some(self.images.store(payload).await?),
            None => None,
        };

        let result = self
            .rewrite_recipe(recipe_id, &recipe, &tag_ids, lines, new_image.as_deref())
            .await;

        match (result, new_image) {
            (Ok(()), Some(_)) => self.discard_image(&existing.image).await,
            (Ok(()), None) => {}
            (Err(e), Some(image)) => {
                self.discard_image(&image).await;
                return Err(e);
            }
            (Err(e), None) => return Err(e),
        }

        info!(recipe_id, ingredients = lines.len(), tags = tag_ids.len(), "Recipe updated");
        self.get_recipe(recipe_id).await
    }

    async fn rewrite_recipe(
        &self,
        recipe_id: i64,
        recipe: &RecipeFields,
        tag_ids: &[i64],
        lines: &[IngredientLine],
        image: Option<&str>,
    ) -> AppResult<()> {
        let mut tx = self.database.begin().await?;
        ensure_references(&mut tx, tag_ids, lines).await?;

        let updated =
            RecipesManager::update_fields(tx.executor()?, recipe_id, recipe_row(recipe), image)
                .await?;
        if !updated {
            return Err(AppError::not_found(format!("Recipe {recipe_id}")));
        }
        RecipesManager::replace_tags(tx.executor()?, recipe_id, tag_ids).await?;
        RecipesManager::replace_ingredients(tx.executor()?, recipe_id, lines).await?;

        tx.commit().await
    }

    /// Delete a recipe; ingredient lines, tag links, favourites and cart rows cascade
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the recipe does not exist
    pub async fn delete_recipe(&self, recipe_id: i64) -> AppResult<()> {
        let recipe = self.get_recipe(recipe_id).await?;
        if !self.database.recipes().delete(recipe_id).await? {
            return Err(AppError::not_found(format!("Recipe {recipe_id}")));
        }
        self.discard_image(&recipe.image).await;
        info!(recipe_id, "Recipe deleted");
        Ok(())
    }

    /// Load a recipe row
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the recipe does not exist
    pub async fn get_recipe(&self, recipe_id: i64) -> AppResult<Recipe> {
        self.database
            .recipes()
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))
    }

    /// Load a recipe the user is allowed to change
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the recipe does not exist or `PermissionDenied`
    /// if the user is not its author
    pub async fn authorize_edit(&self, recipe_id: i64, user_id: i64) -> AppResult<Recipe> {
        let recipe = self.get_recipe(recipe_id).await?;
        if recipe.author_id != Some(user_id) {
            return Err(
                AppError::permission_denied("Only the author may change this recipe")
                    .with_user_id(user_id)
                    .with_resource_id(recipe_id.to_string()),
            );
        }
        Ok(recipe)
    }

    /// Full read shape of a recipe relative to a viewer
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the recipe does not exist
    pub async fn get_recipe_detail(
        &self,
        recipe_id: i64,
        viewer: Option<i64>,
    ) -> AppResult<RecipeDetail> {
        let recipe = self.get_recipe(recipe_id).await?;
        self.detail(recipe, viewer).await
    }

    /// One page of recipes matching `filter`, ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> AppResult<Page<RecipeDetail>> {
        let (recipes, count) = self.database.recipes().list(filter, viewer, page).await?;

        let mut results = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            results.push(self.detail(recipe, viewer).await?);
        }
        Ok(Page::new(results, count, page))
    }

    async fn detail(&self, recipe: Recipe, viewer: Option<i64>) -> AppResult<RecipeDetail> {
        let recipes = self.database.recipes();
        let tags = recipes.tags_of(recipe.id).await?;
        let ingredients = recipes.ingredients_of(recipe.id).await?;

        let author = match recipe.author_id {
            Some(author_id) => match self.database.users().get(author_id).await? {
                Some(user) => {
                    let subscribed = SubscriptionService::new(self.database.clone())
                        .is_subscribed(viewer, author_id)
                        .await?;
                    Some(user.into_profile(subscribed))
                }
                None => None,
            },
            None => None,
        };

        let (is_favorited, is_in_shopping_cart) = match viewer {
            Some(user_id) => {
                let collections = self.database.collections();
                (
                    collections
                        .contains(CollectionKind::Favourite, user_id, recipe.id)
                        .await?,
                    collections
                        .contains(CollectionKind::Cart, user_id, recipe.id)
                        .await?,
                )
            }
            None => (false, false),
        };

        Ok(RecipeDetail {
            id: recipe.id,
            tags,
            author,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        })
    }

    async fn discard_image(&self, reference: &str) {
        if let Err(e) = self.images.discard(reference).await {
            warn!(reference, error = %e, "Failed to discard recipe image");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_with(name: &str, text: &str, cooking_time: i64, image: Option<&str>) -> RecipeFields {
        RecipeFields {
            name: name.to_owned(),
            text: text.to_owned(),
            cooking_time,
            image: image.map(str::to_owned),
        }
    }

    #[test]
    fn test_empty_ingredient_list_rejected() {
        let err = validate_ingredient_lines(&[]).unwrap_err();
        assert_eq!(err.field(), Some("ingredients"));
        assert_eq!(err.message, "at least one ingredient required");
    }

    #[test]
    fn test_repeated_ingredient_rejected() {
        let lines = [IngredientLine::new(1, 10), IngredientLine::new(1, 20)];
        let err = validate_ingredient_lines(&lines).unwrap_err();
        assert_eq!(err.field(), Some("ingredients"));
        assert_eq!(err.message, "ingredients must not repeat");
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        for amount in [0, -5] {
            let lines = [IngredientLine::new(1, 10), IngredientLine::new(2, amount)];
            let err = validate_ingredient_lines(&lines).unwrap_err();
            assert_eq!(err.field(), Some("amount"));
        }
    }

    #[test]
    fn test_amount_above_bound_rejected() {
        let at_bound = [IngredientLine::new(1, MAX_AMOUNT)];
        assert!(validate_ingredient_lines(&at_bound).is_ok());

        for amount in [MAX_AMOUNT + 1, i64::MAX] {
            let lines = [IngredientLine::new(1, 10), IngredientLine::new(2, amount)];
            let err = validate_ingredient_lines(&lines).unwrap_err();
            assert_eq!(err.field(), Some("amount"));
            assert_eq!(err.message, "amount must not exceed 32767");
        }
    }

    #[test]
    fn test_valid_lines_accepted() {
        let lines = [IngredientLine::new(1, 200), IngredientLine::new(2, 2)];
        assert!(validate_ingredient_lines(&lines).is_ok());
    }

    #[test]
    fn test_field_rules() {
        let long_name = "x".repeat(MAX_NAME_LENGTH + 1);
        let cases = [
            (fields_with("", "text", 5, Some("img")), "name"),
            (fields_with(&long_name, "text", 5, Some("img")), "name"),
            (fields_with("Soup", "  ", 5, Some("img")), "text"),
            (fields_with("Soup", "text", 0, Some("img")), "cooking_time"),
            (fields_with("Soup", "text", 5, None), "image"),
            (fields_with("Soup", "text", 5, Some("   ")), "image"),
        ];
        for (recipe, field) in cases {
            let err = validate_fields(&recipe, true).unwrap_err();
            assert_eq!(err.field(), Some(field));
        }

        assert!(validate_fields(&fields_with("Soup", "text", 5, None), false).is_ok());
        let exact = "я".repeat(MAX_NAME_LENGTH);
        assert!(validate_fields(&fields_with(&exact, "text", 1, Some("img")), true).is_ok());
    }

    #[test]
    fn test_tag_ids_collapse() {
        assert_eq!(dedup_tag_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
