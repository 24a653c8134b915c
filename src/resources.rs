// ABOUTME: Shared server state: database handle, configuration, image store and services
// ABOUTME: Built once at startup and handed to every router as Arc<ServerResources>
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use crate::config::ServerConfig;
use crate::database::Database;
use crate::media::{ImageStore, LocalImageStore};
use crate::services::{
    CollectionService, RecipeService, ShoppingListService, SubscriptionService, UserService,
};
use std::sync::Arc;

/// Long-lived state shared by all request handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Entity store
    pub database: Database,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Recipe image storage
    pub images: Arc<dyn ImageStore>,
    /// Recipe composition and queries
    pub recipes: RecipeService,
    /// Shopping list aggregation
    pub shopping_list: ShoppingListService,
    /// Favourites and cart
    pub collections: CollectionService,
    /// Author subscriptions
    pub subscriptions: SubscriptionService,
    /// Users and profiles
    pub users: UserService,
}

impl ServerResources {
    /// Assemble resources around an explicit image store
    #[must_use]
    pub fn new(database: Database, config: ServerConfig, images: Arc<dyn ImageStore>) -> Self {
        Self {
            recipes: RecipeService::new(database.clone(), Arc::clone(&images)),
            shopping_list: ShoppingListService::new(database.clone()),
            collections: CollectionService::new(database.clone()),
            subscriptions: SubscriptionService::new(database.clone()),
            users: UserService::new(database.clone()),
            database,
            config: Arc::new(config),
            images,
        }
    }

    /// Assemble resources storing images under the configured media root
    #[must_use]
    pub fn with_local_media(database: Database, config: ServerConfig) -> Self {
        let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(&config.media));
        Self::new(database, config, images)
    }
}
