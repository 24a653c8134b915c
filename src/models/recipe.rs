// ABOUTME: Recipe, ingredient and tag models plus their read and write shapes
// ABOUTME: Includes the list filter and the aggregated shopping list line
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use super::user::UserProfile;
use crate::constants::{fields, limits::MAX_NAME_LENGTH};
use crate::errors::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::LazyLock;

/// Reference ingredient with its unit of measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    /// Ingredient id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Unit such as `g` or `pcs`
    pub measurement_unit: String,
}

/// Recipe tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    /// Tag id
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Unique hex color such as `#E26C2D`
    pub color: String,
    /// Unique URL slug
    pub slug: String,
}

/// Tag creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTag {
    /// Display name
    pub name: String,
    /// Hex color
    pub color: String,
    /// URL slug
    pub slug: String,
}

/// Hex color such as `#E26C2D` or `#fff`
static COLOR_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").ok());

/// Letters, digits, hyphens and underscores
static SLUG_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").ok());

fn matches_pattern(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

impl NewTag {
    /// Validate and normalize the request
    ///
    /// # Errors
    ///
    /// Returns a field-level validation error for an empty or overlong name,
    /// a color that is not a hex code, or a slug with disallowed characters
    pub fn validated(self) -> AppResult<Self> {
        let name = self.name.trim().to_owned();
        if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::validation(
                fields::NAME,
                format!("name must be 1 to {MAX_NAME_LENGTH} characters"),
            ));
        }

        let color = self.color.trim().to_uppercase();
        if !matches_pattern(&COLOR_PATTERN, &color) {
            return Err(AppError::validation(
                fields::COLOR,
                "color must be a hex code such as #E26C2D",
            ));
        }

        let slug = self.slug.trim().to_owned();
        if slug.chars().count() > MAX_NAME_LENGTH || !matches_pattern(&SLUG_PATTERN, &slug) {
            return Err(AppError::validation(
                fields::SLUG,
                "slug may contain only letters, digits, hyphens and underscores",
            ));
        }

        Ok(Self { name, color, slug })
    }
}

/// Stored recipe row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    /// Recipe id
    pub id: i64,
    /// Owning user; `None` once detached
    pub author_id: Option<i64>,
    /// Title
    pub name: String,
    /// Description
    pub text: String,
    /// Stored image reference
    pub image: String,
    /// Minutes
    pub cooking_time: i64,
}

/// One `{id, amount}` entry of a recipe write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Referenced ingredient
    #[serde(rename = "id")]
    pub ingredient_id: i64,
    /// Quantity in the ingredient's unit
    pub amount: i64,
}

impl IngredientLine {
    /// Create a line
    #[must_use]
    pub const fn new(ingredient_id: i64, amount: i64) -> Self {
        Self {
            ingredient_id,
            amount,
        }
    }
}

/// Scalar recipe fields supplied on create and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFields {
    /// Title
    pub name: String,
    /// Description
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
    /// Image payload (data URL or bare base64); optional on update
    pub image: Option<String>,
}

/// JSON body of recipe create and update requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeWriteRequest {
    /// Ingredient lines
    pub ingredients: Vec<IngredientLine>,
    /// Tag ids
    pub tags: Vec<i64>,
    /// Image payload
    pub image: Option<String>,
    /// Title
    pub name: String,
    /// Description
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
}

impl RecipeWriteRequest {
    /// Split into the scalar fields, tag ids and ingredient lines
    #[must_use]
    pub fn into_parts(self) -> (RecipeFields, Vec<i64>, Vec<IngredientLine>) {
        let fields = RecipeFields {
            name: self.name,
            text: self.text,
            cooking_time: self.cooking_time,
            image: self.image,
        };
        (fields, self.tags, self.ingredients)
    }
}

/// Ingredient line as shown inside a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RecipeIngredientView {
    /// Ingredient id
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Ingredient unit
    pub measurement_unit: String,
    /// Quantity
    pub amount: i64,
}

/// Compact recipe shape used in favourites, cart and subscription listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RecipeShort {
    /// Recipe id
    pub id: i64,
    /// Title
    pub name: String,
    /// Image reference
    pub image: String,
    /// Minutes
    pub cooking_time: i64,
}

impl From<Recipe> for RecipeShort {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Full recipe read shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// Recipe id
    pub id: i64,
    /// Tags ordered by id
    pub tags: Vec<Tag>,
    /// Author profile relative to the viewer
    pub author: Option<UserProfile>,
    /// Ingredient lines in insertion order
    pub ingredients: Vec<RecipeIngredientView>,
    /// Whether the viewer favourited this recipe
    pub is_favorited: bool,
    /// Whether the recipe is in the viewer's cart
    pub is_in_shopping_cart: bool,
    /// Title
    pub name: String,
    /// Image reference
    pub image: String,
    /// Description
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
}

/// Composable predicate for recipe listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Only recipes by this author
    pub author: Option<i64>,
    /// Only recipes carrying any of these tag slugs
    pub tags: Vec<String>,
    /// Only recipes the viewer favourited
    pub is_favorited: bool,
    /// Only recipes in the viewer's cart
    pub is_in_shopping_cart: bool,
}

impl RecipeFilter {
    /// Build a filter from decoded query pairs, accepting repeated `tags`
    #[must_use]
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "author" => filter.author = value.trim().parse().ok(),
                "tags" => filter.tags.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|slug| !slug.is_empty())
                        .map(str::to_owned),
                ),
                "is_favorited" => filter.is_favorited = is_truthy(value),
                "is_in_shopping_cart" => filter.is_in_shopping_cart = is_truthy(value),
                _ => {}
            }
        }
        filter
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

/// One line of the aggregated shopping list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    /// Ingredient name (aggregation key)
    pub name: String,
    /// Sum of amounts across all cart recipes
    pub total_amount: i64,
    /// Unit of the first row seen for this name
    pub unit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_filter_accepts_repeated_and_comma_separated_tags() {
        let filter = RecipeFilter::from_query_pairs(&pairs(&[
            ("tags", "breakfast"),
            ("tags", "lunch,dinner"),
            ("author", "3"),
            ("is_favorited", "1"),
        ]));

        assert_eq!(filter.tags, vec!["breakfast", "lunch", "dinner"]);
        assert_eq!(filter.author, Some(3));
        assert!(filter.is_favorited);
        assert!(!filter.is_in_shopping_cart);
    }

    #[test]
    fn test_tag_color_validation() {
        let tag = |color: &str| NewTag {
            name: "Breakfast".to_owned(),
            color: color.to_owned(),
            slug: "breakfast".to_owned(),
        };

        assert_eq!(tag("#e26c2d").validated().unwrap().color, "#E26C2D");
        assert!(tag("#fff").validated().is_ok());
        for bad in ["e26c2d", "#e26c2", "#GGGGGG", "#12345678"] {
            let err = tag(bad).validated().unwrap_err();
            assert_eq!(err.field(), Some("color"), "accepted {bad}");
        }
    }

    #[test]
    fn test_tag_slug_validation() {
        let err = NewTag {
            name: "Lunch".to_owned(),
            color: "#00FF00".to_owned(),
            slug: "lunch time".to_owned(),
        }
        .validated()
        .unwrap_err();
        assert_eq!(err.field(), Some("slug"));
    }

    #[test]
    fn test_ingredient_line_uses_id_key() {
        let line: IngredientLine = serde_json::from_str(r#"{"id": 4, "amount": 25}"#).unwrap();
        assert_eq!(line, IngredientLine::new(4, 25));
    }

    #[test]
    fn test_write_request_missing_fields_default() {
        let request: RecipeWriteRequest = serde_json::from_str(r#"{"name": "Soup"}"#).unwrap();
        let (fields, tags, lines) = request.into_parts();
        assert_eq!(fields.name, "Soup");
        assert!(fields.image.is_none());
        assert!(tags.is_empty());
        assert!(lines.is_empty());
    }
}
