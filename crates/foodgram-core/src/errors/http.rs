// ABOUTME: Axum IntoResponse integration for AppError
// ABOUTME: Renders the JSON error body with the status implied by the error code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use tracing::{error, warn};

use super::{AppError, ErrorResponse};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.code.is_server_error() {
            error!(
                code = ?self.code,
                source = ?self.source,
                "Request failed: {}", self.message
            );
        } else {
            warn!(code = ?self.code, "Request rejected: {}", self.message);
        }

        (status, Json(ErrorResponse::from(self))).into_response()
    }
}
