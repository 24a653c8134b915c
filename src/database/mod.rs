// ABOUTME: SQLite entity store for recipes, reference data, users and social links
// ABOUTME: Owns the connection pool, creates the schema and hands out per-aggregate managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Database Management
//!
//! One `SqlitePool` shared by a manager per aggregate. The schema is created
//! idempotently on startup; uniqueness, positivity and self-subscription
//! rules are enforced by storage constraints as well as by the services, and
//! every foreign key cascades on delete.

mod collections;
mod ingredients;
mod recipes;
mod subscriptions;
mod tags;
mod transactions;
mod users;

pub use collections::{CartIngredientRow, CollectionsManager};
pub use ingredients::IngredientsManager;
pub use recipes::{RecipeRow, RecipesManager};
pub use subscriptions::SubscriptionsManager;
pub use tags::TagsManager;
pub use transactions::{SqliteTransactionGuard, TransactionGuard};
pub use users::UsersManager;

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

/// Connections kept for a file-backed database
const FILE_POOL_SIZE: u32 = 5;

/// Database handle shared by all services
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the configured database and create the schema
    ///
    /// An in-memory database is held on a single pinned connection so that
    /// the data lives as long as the pool does.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created, the
    /// connection fails, or schema creation fails
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        if let Some(parent) = url
            .path()
            .and_then(Path::parent)
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::database(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(FILE_POOL_SIZE)
        };

        let pool = pool_options
            .connect_with(url.connect_options()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {url}: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database = %url, "Database ready");
        Ok(db)
    }

    /// Connect using a raw `DATABASE_URL` string
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        Self::new(&DatabaseUrl::parse_url(database_url)?).await
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create all tables and indexes if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_ingredients().await?;
        self.migrate_tags().await?;
        self.migrate_recipes().await?;
        self.migrate_collections().await?;
        self.migrate_subscriptions().await?;
        debug!("Schema migration complete");
        Ok(())
    }

    /// Begin a transaction that rolls back unless committed
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be acquired
    pub async fn begin(&self) -> AppResult<SqliteTransactionGuard<'static>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        Ok(TransactionGuard::new(tx))
    }

    /// User accounts
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Reference ingredients
    #[must_use]
    pub fn ingredients(&self) -> IngredientsManager {
        IngredientsManager::new(self.pool.clone())
    }

    /// Recipe tags
    #[must_use]
    pub fn tags(&self) -> TagsManager {
        TagsManager::new(self.pool.clone())
    }

    /// Recipes and their associations
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }

    /// Favourites and shopping carts
    #[must_use]
    pub fn collections(&self) -> CollectionsManager {
        CollectionsManager::new(self.pool.clone())
    }

    /// Author subscriptions
    #[must_use]
    pub fn subscriptions(&self) -> SubscriptionsManager {
        SubscriptionsManager::new(self.pool.clone())
    }
}
