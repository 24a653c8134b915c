// ABOUTME: Favourite, cart and subscription link models
// ABOUTME: Includes the subscription listing shape with the author's recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use super::recipe::RecipeShort;
use super::user::UserProfile;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Which per-user recipe collection an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Favourite recipes
    Favourite,
    /// Shopping cart
    Cart,
}

impl CollectionKind {
    /// Backing table name
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Favourite => "favourites",
            Self::Cart => "carts",
        }
    }

    /// Human-readable collection name for messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Favourite => "favourites",
            Self::Cart => "shopping cart",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A (user, recipe) pair in a favourites or cart collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CollectionEntry {
    /// Entry id; insertion order
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Collected recipe
    pub recipe_id: i64,
}

/// A follower/author link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    /// Subscription id; newest has the highest id
    pub id: i64,
    /// Following user
    pub subscriber_id: i64,
    /// Followed user
    pub author_id: i64,
}

/// An author as listed in the subscriber's subscriptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribedAuthor {
    /// Author profile; `is_subscribed` is always true here
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Author's recipes in compact form
    pub recipes: Vec<RecipeShort>,
    /// Total number of the author's recipes
    pub recipes_count: i64,
}
