// ABOUTME: Domain service layer for recipes, shopping lists, collections and subscriptions
// ABOUTME: Protocol-agnostic business rules called by the HTTP routes and the seed tool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Domain service layer
//!
//! Services hold a cloned `Database` handle and enforce the business rules
//! (validation, existence checks, uniqueness outcomes) so route handlers
//! only translate between HTTP and these calls.

/// Favourite and cart add/remove
pub mod collections;

/// Recipe composition and recipe queries
pub mod recipes;

/// Shopping list aggregation and export
pub mod shopping_list;

/// Follow/unfollow authors and list followed authors
pub mod subscriptions;

/// User registration and profiles
pub mod users;

pub use collections::CollectionService;
pub use recipes::RecipeService;
pub use shopping_list::ShoppingListService;
pub use subscriptions::SubscriptionService;
pub use users::UserService;
