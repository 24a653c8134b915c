// ABOUTME: HTTP-level tests for the Foodgram router
// ABOUTME: Exercises identity handling, status mapping, recipe flows and the shopping list export
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{
    create_test_app, create_test_ingredient, create_test_resources, create_test_tag,
    create_test_user, PIXEL_PNG,
};
use foodgram_server::constants::defaults::MAX_BODY_BYTES;
use foodgram_server::resources::ServerResources;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    _media: TempDir,
    resources: Arc<ServerResources>,
    author_id: i64,
    other_id: i64,
    flour_id: i64,
    egg_id: i64,
    tag_id: i64,
}

impl Fixture {
    async fn new() -> Self {
        let media = TempDir::new().unwrap();
        let resources = create_test_resources(media.path()).await.unwrap();
        let db = &resources.database;
        let author = create_test_user(db, "author").await.unwrap();
        let other = create_test_user(db, "other").await.unwrap();
        let flour = create_test_ingredient(db, "Flour", "g").await.unwrap();
        let egg = create_test_ingredient(db, "Egg", "pcs").await.unwrap();
        let tag = create_test_tag(db, "breakfast", "#E26C2D").await.unwrap();
        Self {
            _media: media,
            resources,
            author_id: author.id,
            other_id: other.id,
            flour_id: flour.id,
            egg_id: egg.id,
            tag_id: tag.id,
        }
    }

    fn app(&self) -> axum::Router {
        create_test_app(&self.resources)
    }

    fn recipe_body(&self, name: &str) -> Value {
        json!({
            "name": name,
            "text": "Mix and fry",
            "cooking_time": 10,
            "image": PIXEL_PNG,
            "tags": [self.tag_id],
            "ingredients": [
                {"id": self.flour_id, "amount": 200},
                {"id": self.egg_id, "amount": 2}
            ]
        })
    }

    async fn create_recipe(&self, name: &str) -> i64 {
        let response = AxumTestRequest::post("/api/recipes/")
            .as_user(self.author_id)
            .json(&self.recipe_body(name))
            .send(self.app())
            .await
            .assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let fixture = Fixture::new().await;

    let response = AxumTestRequest::get("/health").send(fixture.app()).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");

    let response = AxumTestRequest::get("/ready").send(fixture.app()).await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_create_recipe_returns_detail() {
    let fixture = Fixture::new().await;

    let response = AxumTestRequest::post("/api/recipes/")
        .as_user(fixture.author_id)
        .json(&fixture.recipe_body("Pancakes"))
        .send(fixture.app())
        .await
        .assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["name"], "Pancakes");
    assert_eq!(body["author"]["username"], "author");
    assert_eq!(body["author"]["is_subscribed"], false);
    assert_eq!(body["ingredients"][0]["name"], "Flour");
    assert_eq!(body["ingredients"][0]["amount"], 200);
    assert_eq!(body["ingredients"][1]["measurement_unit"], "pcs");
    assert_eq!(body["tags"][0]["slug"], "breakfast");
    assert!(body["image"].as_str().unwrap().starts_with("/media/recipes/img/"));
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let fixture = Fixture::new().await;

    let response = AxumTestRequest::post("/api/recipes/")
        .json(&fixture.recipe_body("Anonymous"))
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 401);

    let response = AxumTestRequest::get("/api/users/me/")
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_unknown_or_malformed_identity_is_unauthorized() {
    let fixture = Fixture::new().await;

    let response = AxumTestRequest::get("/api/users/me/")
        .as_user(424_242)
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 401);

    let response = AxumTestRequest::get("/api/recipes/")
        .header("x-user-id", "not-a-number")
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_validation_error_shape() {
    let fixture = Fixture::new().await;

    let mut body = fixture.recipe_body("Broken");
    body["ingredients"] = json!([
        {"id": fixture.flour_id, "amount": 1},
        {"id": fixture.flour_id, "amount": 2}
    ]);

    let response = AxumTestRequest::post("/api/recipes/")
        .as_user(fixture.author_id)
        .json(&body)
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 400);
    let error: Value = response.json();
    assert!(error["error"]["details"]["ingredients"].is_array());

    let response = AxumTestRequest::post("/api/recipes/")
        .as_user(fixture.author_id)
        .header("content-type", "application/json")
        .raw_body("{not json")
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let fixture = Fixture::new().await;

    let declared = (MAX_BODY_BYTES + 1).to_string();
    AxumTestRequest::post("/api/recipes/")
        .as_user(fixture.author_id)
        .header("content-type", "application/json")
        .header("content-length", &declared)
        .raw_body("{}")
        .send(fixture.app())
        .await
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_unknown_ingredient_is_not_found() {
    let fixture = Fixture::new().await;

    let mut body = fixture.recipe_body("Mystery");
    body["ingredients"] = json!([{"id": 999, "amount": 1}]);

    let response = AxumTestRequest::post("/api/recipes/")
        .as_user(fixture.author_id)
        .json(&body)
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_non_author_edit_is_forbidden() {
    let fixture = Fixture::new().await;
    let recipe_id = fixture.create_recipe("Pancakes").await;
    let uri = format!("/api/recipes/{recipe_id}/");

    let response = AxumTestRequest::patch(&uri)
        .as_user(fixture.other_id)
        .json(&fixture.recipe_body("Stolen"))
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 403);

    let response = AxumTestRequest::delete(&uri)
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 403);

    let mut body = fixture.recipe_body("Better pancakes");
    body["image"] = Value::Null;
    body["ingredients"] = json!([{"id": fixture.egg_id, "amount": 3}]);
    let response = AxumTestRequest::patch(&uri)
        .as_user(fixture.author_id)
        .json(&body)
        .send(fixture.app())
        .await
        .assert_status(StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["name"], "Better pancakes");
    assert_eq!(updated["ingredients"].as_array().unwrap().len(), 1);

    AxumTestRequest::delete(&uri)
        .as_user(fixture.author_id)
        .send(fixture.app())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = AxumTestRequest::get(&uri).send(fixture.app()).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_favorite_toggle_and_conflict() {
    let fixture = Fixture::new().await;
    let recipe_id = fixture.create_recipe("Pancakes").await;
    let uri = format!("/api/recipes/{recipe_id}/favorite/");

    let response = AxumTestRequest::post(&uri)
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await
        .assert_status(StatusCode::CREATED);
    let short: Value = response.json();
    assert_eq!(short["id"], recipe_id);
    assert_eq!(short["name"], "Pancakes");
    assert_eq!(short["cooking_time"], 10);

    let response = AxumTestRequest::post(&uri)
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 409);

    let response = AxumTestRequest::get("/api/recipes/?is_favorited=1")
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await
        .assert_status(StatusCode::OK);
    let page: Value = response.json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["is_favorited"], true);

    AxumTestRequest::delete(&uri)
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = AxumTestRequest::delete(&uri)
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_shopping_cart_download() {
    let fixture = Fixture::new().await;
    let recipe_id = fixture.create_recipe("Pancakes").await;

    AxumTestRequest::post(&format!("/api/recipes/{recipe_id}/shopping_cart/"))
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await
        .assert_status(StatusCode::CREATED);

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(
        response.header("content-type"),
        Some("text/plain; charset=utf-8")
    );
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"carts.txt\"")
    );
    assert_eq!(response.text(), "Flour - 200 g\nEgg - 2 pcs\n");

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_recipe_list_filters_by_tag_and_author() {
    let fixture = Fixture::new().await;
    fixture.create_recipe("Pancakes").await;
    fixture.create_recipe("Waffles").await;

    let response = AxumTestRequest::get("/api/recipes/?tags=breakfast&limit=1")
        .send(fixture.app())
        .await
        .assert_status(StatusCode::OK);
    let page: Value = response.json();
    assert_eq!(page["count"], 2);
    assert_eq!(page["next"], 2);
    assert_eq!(page["previous"], Value::Null);
    assert_eq!(page["results"].as_array().unwrap().len(), 1);

    let uri = format!("/api/recipes/?author={}", fixture.other_id);
    let response = AxumTestRequest::get(&uri).send(fixture.app()).await;
    let page: Value = response.json();
    assert_eq!(page["count"], 0);

    let response = AxumTestRequest::get("/api/recipes/?page=abc")
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_user_registration_and_profiles() {
    let fixture = Fixture::new().await;

    let response = AxumTestRequest::post("/api/users/")
        .json(&json!({
            "username": "newcomer",
            "email": "Newcomer@Example.com",
            "first_name": "New",
            "last_name": "Comer"
        }))
        .send(fixture.app())
        .await
        .assert_status(StatusCode::CREATED);
    let user: Value = response.json();
    assert_eq!(user["email"], "newcomer@example.com");

    let response = AxumTestRequest::post("/api/users/")
        .json(&json!({"username": "newcomer", "email": "other@example.com"}))
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 409);

    let response = AxumTestRequest::post("/api/users/")
        .json(&json!({"username": "", "email": "blank@example.com"}))
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 400);

    let response = AxumTestRequest::get("/api/users/?limit=2")
        .send(fixture.app())
        .await
        .assert_status(StatusCode::OK);
    let page: Value = response.json();
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);

    let response = AxumTestRequest::get("/api/users/me/")
        .as_user(fixture.author_id)
        .send(fixture.app())
        .await
        .assert_status(StatusCode::OK);
    let me: Value = response.json();
    assert_eq!(me["username"], "author");
    assert_eq!(me["is_subscribed"], false);
}

#[tokio::test]
async fn test_subscription_routes() {
    let fixture = Fixture::new().await;
    fixture.create_recipe("Pancakes").await;
    let uri = format!("/api/users/{}/subscribe/", fixture.author_id);

    let response = AxumTestRequest::post(&uri)
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await
        .assert_status(StatusCode::CREATED);
    let author: Value = response.json();
    assert_eq!(author["username"], "author");
    assert_eq!(author["is_subscribed"], true);
    assert_eq!(author["recipes_count"], 1);

    let response = AxumTestRequest::post(&uri)
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 409);

    let self_uri = format!("/api/users/{}/subscribe/", fixture.other_id);
    let response = AxumTestRequest::post(&self_uri)
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 400);

    let response = AxumTestRequest::get("/api/users/subscriptions/?recipes_limit=0")
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await
        .assert_status(StatusCode::OK);
    let page: Value = response.json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["recipes"].as_array().unwrap().len(), 0);
    assert_eq!(page["results"][0]["recipes_count"], 1);

    let profile_uri = format!("/api/users/{}/", fixture.author_id);
    let response = AxumTestRequest::get(&profile_uri)
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await;
    let profile: Value = response.json();
    assert_eq!(profile["is_subscribed"], true);

    AxumTestRequest::delete(&uri)
        .as_user(fixture.other_id)
        .send(fixture.app())
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_reference_data_routes() {
    let fixture = Fixture::new().await;

    let response = AxumTestRequest::get("/api/ingredients/?name=Fl")
        .send(fixture.app())
        .await
        .assert_status(StatusCode::OK);
    let ingredients: Value = response.json();
    assert_eq!(ingredients.as_array().unwrap().len(), 1);
    assert_eq!(ingredients[0]["name"], "Flour");

    let response = AxumTestRequest::get(&format!("/api/ingredients/{}/", fixture.egg_id))
        .send(fixture.app())
        .await;
    let egg: Value = response.json();
    assert_eq!(egg["measurement_unit"], "pcs");

    let response = AxumTestRequest::get("/api/ingredients/999/")
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 404);

    let response = AxumTestRequest::get("/api/tags/")
        .send(fixture.app())
        .await
        .assert_status(StatusCode::OK);
    let tags: Value = response.json();
    assert_eq!(tags[0]["color"], "#E26C2D");

    let response = AxumTestRequest::get(&format!("/api/tags/{}/", fixture.tag_id))
        .send(fixture.app())
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_uploaded_image_is_served() {
    let fixture = Fixture::new().await;
    let recipe_id = fixture.create_recipe("Pancakes").await;

    let response = AxumTestRequest::get(&format!("/api/recipes/{recipe_id}/"))
        .send(fixture.app())
        .await;
    let detail: Value = response.json();
    let image = detail["image"].as_str().unwrap().to_owned();

    let response = AxumTestRequest::get(&image).send(fixture.app()).await;
    assert_eq!(response.status(), 200);
    assert!(!response.bytes().is_empty());
}
