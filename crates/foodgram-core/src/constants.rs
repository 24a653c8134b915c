// ABOUTME: Field limits and pagination defaults shared across the Foodgram crates
// ABOUTME: Pure data constants, no environment lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

/// Field length limits mirrored by the storage schema
pub mod limits {
    /// Maximum length for names, usernames, units and slugs
    pub const MAX_NAME_LENGTH: usize = 144;

    /// Minimum cooking time in minutes
    pub const MIN_COOKING_TIME: i64 = 1;

    /// Minimum ingredient amount in a recipe
    pub const MIN_AMOUNT: i64 = 1;

    /// Maximum ingredient amount in a recipe
    pub const MAX_AMOUNT: i64 = 32_767;
}

/// Pagination defaults for list endpoints
pub mod pagination {
    /// Page size used when the client does not pass `limit`
    pub const DEFAULT_PAGE_SIZE: u32 = 6;

    /// Upper bound for a client-supplied `limit`
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// Field names used in validation error details
pub mod fields {
    /// Recipe ingredient list
    pub const INGREDIENTS: &str = "ingredients";
    /// Ingredient amount inside a recipe
    pub const AMOUNT: &str = "amount";
    /// Recipe tag list
    pub const TAGS: &str = "tags";
    /// Recipe, tag or ingredient name
    pub const NAME: &str = "name";
    /// Recipe description
    pub const TEXT: &str = "text";
    /// Recipe cooking time
    pub const COOKING_TIME: &str = "cooking_time";
    /// Recipe image
    pub const IMAGE: &str = "image";
    /// Tag color
    pub const COLOR: &str = "color";
    /// Tag slug
    pub const SLUG: &str = "slug";
    /// User email
    pub const EMAIL: &str = "email";
    /// Username
    pub const USERNAME: &str = "username";
}
