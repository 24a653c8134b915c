// ABOUTME: Re-exports page-number pagination types from foodgram-core
// ABOUTME: Used by list endpoints and the managers that back them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

pub use foodgram_core::pagination::*;
