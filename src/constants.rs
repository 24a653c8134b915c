// ABOUTME: Service-level constants for the Foodgram server
// ABOUTME: Environment variable names, configuration defaults and media layout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Constants Module
//!
//! Hardcoded defaults and the names of the environment variables that
//! override them. Field limits shared with the core crate are re-exported.

pub use foodgram_core::constants::{fields, limits, pagination};

/// Service identification for logs
pub mod service_names {
    /// Service name used in structured logs
    pub const FOODGRAM_SERVER: &str = "foodgram-server";
    /// Library target used in log filter directives
    pub const LOG_TARGET: &str = "foodgram_server";
}

/// Environment variable names
pub mod env_keys {
    /// Bind address
    pub const HOST: &str = "HOST";
    /// HTTP port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Database location
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Media directory on disk
    pub const MEDIA_ROOT: &str = "MEDIA_ROOT";
    /// Media URL prefix
    pub const MEDIA_URL: &str = "MEDIA_URL";
    /// Trusted identity header
    pub const AUTH_USER_HEADER: &str = "AUTH_USER_HEADER";
    /// Request timeout
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    /// Default page size
    pub const DEFAULT_PAGE_SIZE: &str = "DEFAULT_PAGE_SIZE";
    /// Log filter
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Configuration defaults
pub mod defaults {
    /// Bind address
    pub const HOST: &str = "0.0.0.0";
    /// HTTP port
    pub const HTTP_PORT: u16 = 8000;
    /// Media directory on disk
    pub const MEDIA_ROOT: &str = "./media";
    /// Media URL prefix
    pub const MEDIA_URL: &str = "/media/";
    /// Trusted identity header
    pub const AUTH_USER_HEADER: &str = "x-user-id";
    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Maximum JSON body size; recipe images arrive inline as base64
    pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
}

/// Media layout
pub mod media {
    /// Subdirectory (under the media root) holding recipe images
    pub const RECIPE_IMAGE_DIR: &str = "recipes/img";
    /// Extension assumed for bare base64 payloads
    pub const DEFAULT_IMAGE_EXTENSION: &str = "png";
    /// Extensions accepted in data URLs
    pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];
}

/// Shopping list export
pub mod shopping_list {
    /// Attachment filename for the exported list
    pub const EXPORT_FILENAME: &str = "carts.txt";
}
