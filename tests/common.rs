// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory database, fixture users/ingredients/tags and server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `foodgram_server`

use anyhow::Result;
use foodgram_server::{
    config::{DatabaseUrl, MediaConfig, ServerConfig},
    database::Database,
    models::{Ingredient, IngredientLine, NewTag, NewUser, Recipe, RecipeFields, Tag, User},
    resources::ServerResources,
    routes::build_router,
};
use std::path::Path;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// 1x1 transparent PNG as a data URL
pub const PIXEL_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new(&DatabaseUrl::Memory).await?)
}

/// Server configuration pointing media storage at `media_root`
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        database: DatabaseUrl::Memory,
        media: MediaConfig {
            root: media_root.to_path_buf(),
            url: "/media/".to_owned(),
        },
        ..ServerConfig::default()
    }
}

/// Server resources over a fresh in-memory database with local media storage
pub async fn create_test_resources(media_root: &Path) -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::with_local_media(
        database,
        test_config(media_root),
    )))
}

/// Application router over the given resources
pub fn create_test_app(resources: &Arc<ServerResources>) -> axum::Router {
    build_router(Arc::clone(resources))
}

/// Create a user named `username` with a derived email
pub async fn create_test_user(database: &Database, username: &str) -> Result<User> {
    let request = NewUser {
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        first_name: username.to_owned(),
        last_name: "Tester".to_owned(),
    };
    Ok(database.users().create(&request).await?)
}

/// Get or create an ingredient
pub async fn create_test_ingredient(
    database: &Database,
    name: &str,
    measurement_unit: &str,
) -> Result<Ingredient> {
    let (ingredient, _) = database
        .ingredients()
        .upsert(name, measurement_unit)
        .await?;
    Ok(ingredient)
}

/// Create a tag whose name and slug derive from `slug`
pub async fn create_test_tag(database: &Database, slug: &str, color: &str) -> Result<Tag> {
    let tag = NewTag {
        name: slug.to_uppercase(),
        color: color.to_owned(),
        slug: slug.to_owned(),
    }
    .validated()?;
    Ok(database.tags().create(&tag).await?)
}

/// Recipe fields with a valid inline image
pub fn recipe_fields(name: &str) -> RecipeFields {
    RecipeFields {
        name: name.to_owned(),
        text: format!("How to cook {name}"),
        cooking_time: 15,
        image: Some(PIXEL_PNG.to_owned()),
    }
}

/// Create a recipe through the service with the given lines and tags
pub async fn create_test_recipe(
    resources: &ServerResources,
    author_id: i64,
    name: &str,
    lines: &[IngredientLine],
    tag_ids: &[i64],
) -> Result<Recipe> {
    Ok(resources
        .recipes
        .create_recipe(author_id, recipe_fields(name), tag_ids, lines)
        .await?)
}
