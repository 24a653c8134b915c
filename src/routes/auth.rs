// ABOUTME: Request identity resolution from the user id set by the upstream auth layer
// ABOUTME: Protected handlers require a known user; read handlers accept anonymous viewers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Request identity
//!
//! Authentication happens upstream. This layer trusts the configured header
//! (default `x-user-id`) to carry the numeric id of an authenticated user and
//! only checks that the user exists.

use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use axum::http::HeaderMap;
use tracing::debug;

/// Resolve the caller's user id from the identity header
///
/// Returns `Ok(None)` when the header is absent.
///
/// # Errors
///
/// Returns `AuthInvalid` when the header is not a user id or names an
/// unknown user
pub async fn resolve_identity(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<Option<i64>> {
    let header_name = resources.config.auth_user_header.as_str();
    let Some(raw) = headers.get(header_name) else {
        return Ok(None);
    };

    let user_id: i64 = raw
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .ok_or_else(|| AppError::auth_invalid(format!("Malformed {header_name} header")))?;

    if !resources.database.users().exists(user_id).await? {
        debug!(user_id, "Identity header names an unknown user");
        return Err(AppError::auth_invalid("Unknown user").with_user_id(user_id));
    }

    Ok(Some(user_id))
}

/// Resolve the caller and require one to be present
///
/// # Errors
///
/// Returns `AuthRequired` when the header is absent and `AuthInvalid` when
/// it does not name a known user
pub async fn require_user(headers: &HeaderMap, resources: &ServerResources) -> AppResult<i64> {
    resolve_identity(headers, resources)
        .await?
        .ok_or_else(AppError::auth_required)
}
