// ABOUTME: Integration tests for favourite and shopping cart toggles
// ABOUTME: Checks uniqueness conflicts, missing entries and concurrent adds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{create_test_ingredient, create_test_recipe, create_test_resources, create_test_user};
use foodgram_server::errors::ErrorCode;
use foodgram_server::models::{CollectionKind, IngredientLine};
use tempfile::TempDir;

#[tokio::test]
async fn test_add_twice_conflicts_and_keeps_one_row() {
    let media = TempDir::new().unwrap();
    let resources = create_test_resources(media.path()).await.unwrap();
    let db = &resources.database;

    let user = create_test_user(db, "reader").await.unwrap();
    let bread = create_test_ingredient(db, "Bread", "g").await.unwrap();
    let recipe = create_test_recipe(
        &resources,
        user.id,
        "Toast",
        &[IngredientLine::new(bread.id, 50)],
        &[],
    )
    .await
    .unwrap();

    let entry = resources
        .collections
        .add(CollectionKind::Favourite, user.id, recipe.id)
        .await
        .unwrap();
    assert_eq!(entry.user_id, user.id);
    assert_eq!(entry.recipe_id, recipe.id);

    let err = resources
        .collections
        .add(CollectionKind::Favourite, user.id, recipe.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(
        db.collections()
            .count(CollectionKind::Favourite, user.id)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_favourites_and_cart_are_independent() {
    let media = TempDir::new().unwrap();
    let resources = create_test_resources(media.path()).await.unwrap();
    let db = &resources.database;

    let user = create_test_user(db, "reader").await.unwrap();
    let jam = create_test_ingredient(db, "Jam", "g").await.unwrap();
    let recipe = create_test_recipe(
        &resources,
        user.id,
        "Jam toast",
        &[IngredientLine::new(jam.id, 20)],
        &[],
    )
    .await
    .unwrap();

    resources
        .collections
        .add(CollectionKind::Favourite, user.id, recipe.id)
        .await
        .unwrap();

    assert!(resources
        .collections
        .contains(CollectionKind::Favourite, user.id, recipe.id)
        .await
        .unwrap());
    assert!(!resources
        .collections
        .contains(CollectionKind::Cart, user.id, recipe.id)
        .await
        .unwrap());

    let detail = resources
        .recipes
        .get_recipe_detail(recipe.id, Some(user.id))
        .await
        .unwrap();
    assert!(detail.is_favorited);
    assert!(!detail.is_in_shopping_cart);
}

#[tokio::test]
async fn test_remove_missing_entry_is_not_found() {
    let media = TempDir::new().unwrap();
    let resources = create_test_resources(media.path()).await.unwrap();
    let db = &resources.database;

    let user = create_test_user(db, "reader").await.unwrap();
    let honey = create_test_ingredient(db, "Honey", "g").await.unwrap();
    let recipe = create_test_recipe(
        &resources,
        user.id,
        "Honey cake",
        &[IngredientLine::new(honey.id, 100)],
        &[],
    )
    .await
    .unwrap();

    let err = resources
        .collections
        .remove(CollectionKind::Cart, user.id, recipe.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    resources
        .collections
        .add(CollectionKind::Cart, user.id, recipe.id)
        .await
        .unwrap();
    resources
        .collections
        .remove(CollectionKind::Cart, user.id, recipe.id)
        .await
        .unwrap();
    assert!(!resources
        .collections
        .contains(CollectionKind::Cart, user.id, recipe.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_add_unknown_recipe_is_not_found() {
    let media = TempDir::new().unwrap();
    let resources = create_test_resources(media.path()).await.unwrap();
    let user = create_test_user(&resources.database, "reader").await.unwrap();

    let err = resources
        .collections
        .add(CollectionKind::Favourite, user.id, 404)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_concurrent_adds_leave_one_row() {
    let media = TempDir::new().unwrap();
    let resources = create_test_resources(media.path()).await.unwrap();
    let db = &resources.database;

    let user = create_test_user(db, "reader").await.unwrap();
    let tea = create_test_ingredient(db, "Tea", "g").await.unwrap();
    let recipe = create_test_recipe(
        &resources,
        user.id,
        "Tea",
        &[IngredientLine::new(tea.id, 3)],
        &[],
    )
    .await
    .unwrap();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let collections = resources.collections.clone();
        let (user_id, recipe_id) = (user.id, recipe.id);
        handles.push(tokio::spawn(async move {
            collections
                .add(CollectionKind::Cart, user_id, recipe_id)
                .await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) if e.code == ErrorCode::ResourceAlreadyExists => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 3);
    assert_eq!(
        db.collections()
            .count(CollectionKind::Cart, user.id)
            .await
            .unwrap(),
        1
    );
}
