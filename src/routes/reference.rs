// ABOUTME: Read-only routes for reference data: ingredients and tags
// ABOUTME: Ingredients support a case-sensitive name prefix search via ?name=
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for the ingredient listing
#[derive(Debug, Default, Deserialize)]
pub struct IngredientSearch {
    /// Name prefix
    pub name: Option<String>,
}

/// Ingredient and tag routes implementation
pub struct ReferenceRoutes;

impl ReferenceRoutes {
    /// Create all reference data routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ingredients/", get(Self::handle_list_ingredients))
            .route("/api/ingredients/:id/", get(Self::handle_get_ingredient))
            .route("/api/tags/", get(Self::handle_list_tags))
            .route("/api/tags/:id/", get(Self::handle_get_tag))
            .with_state(resources)
    }

    /// Handle GET /api/ingredients/
    async fn handle_list_ingredients(
        State(resources): State<Arc<ServerResources>>,
        Query(search): Query<IngredientSearch>,
    ) -> Result<Response, AppError> {
        let prefix = search
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let ingredients = resources.database.ingredients().list(prefix).await?;
        Ok((StatusCode::OK, Json(ingredients)).into_response())
    }

    /// Handle GET /api/ingredients/:id/
    async fn handle_get_ingredient(
        State(resources): State<Arc<ServerResources>>,
        Path(ingredient_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let ingredient = resources
            .database
            .ingredients()
            .get(ingredient_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {ingredient_id}")))?;
        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }

    /// Handle GET /api/tags/
    async fn handle_list_tags(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let tags = resources.database.tags().list().await?;
        Ok((StatusCode::OK, Json(tags)).into_response())
    }

    /// Handle GET /api/tags/:id/
    async fn handle_get_tag(
        State(resources): State<Arc<ServerResources>>,
        Path(tag_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let tag = resources
            .database
            .tags()
            .get(tag_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tag {tag_id}")))?;
        Ok((StatusCode::OK, Json(tag)).into_response())
    }
}
