// ABOUTME: Reference data seeding utility for the Foodgram database
// ABOUTME: Loads ingredients and tags from JSON files, skipping entries that already exist
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Reference data seeder.
//!
//! Usage:
//! ```bash
//! # Load ingredients (array of {"name", "measurement_unit"})
//! cargo run --bin foodgram-seed -- ingredients data/ingredients.json
//!
//! # Load tags (array of {"name", "color", "slug"})
//! cargo run --bin foodgram-seed -- tags data/tags.json
//!
//! # Override database URL
//! cargo run --bin foodgram-seed -- --database-url sqlite:./data/foodgram.db tags tags.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foodgram_server::{
    config::DatabaseUrl,
    constants::env_keys,
    database::Database,
    errors::ErrorCode,
    models::NewTag,
};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(
    name = "foodgram-seed",
    about = "Foodgram reference data seeder",
    long_about = "Load ingredients and tags into the Foodgram database from JSON files"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: SeedCommand,
}

#[derive(Subcommand)]
enum SeedCommand {
    /// Get-or-create ingredients by (name, measurement_unit)
    Ingredients {
        /// JSON file holding an array of ingredients
        file: PathBuf,
    },
    /// Create tags, skipping ones that already exist
    Tags {
        /// JSON file holding an array of tags
        file: PathBuf,
    },
}

/// Ingredient entry in the seed file
#[derive(Debug, Deserialize)]
struct IngredientSeed {
    name: String,
    measurement_unit: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let database_url = match args.database_url {
        Some(url) => DatabaseUrl::parse_url(&url)?,
        None => match env::var(env_keys::DATABASE_URL) {
            Ok(url) => DatabaseUrl::parse_url(&url)?,
            Err(_) => DatabaseUrl::default(),
        },
    };

    info!("Connecting to database: {database_url}");
    let database = Database::new(&database_url).await?;

    match args.command {
        SeedCommand::Ingredients { file } => seed_ingredients(&database, &file).await,
        SeedCommand::Tags { file } => seed_tags(&database, &file).await,
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

async fn seed_ingredients(database: &Database, path: &Path) -> Result<()> {
    let entries: Vec<IngredientSeed> = read_json(path)?;
    info!("Seeding {} ingredients from {}", entries.len(), path.display());

    let ingredients = database.ingredients();
    let mut created = 0_usize;
    for entry in &entries {
        let (ingredient, was_created) = ingredients
            .upsert(entry.name.trim(), entry.measurement_unit.trim())
            .await?;
        if was_created {
            created += 1;
            debug!(id = ingredient.id, name = %ingredient.name, "Ingredient created");
        }
    }

    info!(
        "Ingredients loaded: {created} created, {} already present",
        entries.len() - created
    );
    Ok(())
}

async fn seed_tags(database: &Database, path: &Path) -> Result<()> {
    let entries: Vec<NewTag> = read_json(path)?;
    info!("Seeding {} tags from {}", entries.len(), path.display());

    let tags = database.tags();
    let mut created = 0_usize;
    for entry in entries {
        let slug = entry.slug.clone();
        let tag = match entry.validated() {
            Ok(tag) => tag,
            Err(e) => {
                warn!(slug = %slug, "Skipping invalid tag: {e}");
                continue;
            }
        };
        match tags.create(&tag).await {
            Ok(tag) => {
                created += 1;
                debug!(id = tag.id, slug = %tag.slug, "Tag created");
            }
            Err(e) if e.code == ErrorCode::ResourceAlreadyExists => {
                debug!(slug = %slug, "Tag already present");
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("Tags loaded: {created} created");
    Ok(())
}
