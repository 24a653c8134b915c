// ABOUTME: Domain and presentation models for recipes, users and social links
// ABOUTME: Row types map straight from SQLite; read shapes serialize to the API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Models
//!
//! Stored rows (`Recipe`, `Ingredient`, `Tag`, `User`, ...) derive
//! `sqlx::FromRow`. Read shapes (`RecipeDetail`, `RecipeShort`,
//! `UserProfile`, `SubscribedAuthor`) are what the API returns. Write shapes
//! (`RecipeWriteRequest`, `NewUser`, `NewTag`) are what it accepts.

mod recipe;
mod social;
mod user;

pub use recipe::{
    Ingredient, IngredientLine, NewTag, Recipe, RecipeDetail, RecipeFields, RecipeFilter,
    RecipeIngredientView, RecipeShort, RecipeWriteRequest, ShoppingListItem, Tag,
};
pub use social::{CollectionEntry, CollectionKind, SubscribedAuthor, Subscription};
pub use user::{NewUser, User, UserProfile};
