//! HTTP-level tests for the room endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, create_movie, delete, get, post_json, put_json};
use serde_json::json;

async fn create_room(app: &axum::Router, payload: serde_json::Value) -> String {
    let response = post_json(app, "/api/v1/rooms", payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_text(response).await
}

fn movie_ids(room: &serde_json::Value) -> Vec<String> {
    room["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|movie| movie["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn create_then_get_room_with_movies() {
    let app = common::build_test_app().await;
    let first = create_movie(&app, "first", 3600).await;
    let second = create_movie(&app, "second", 5400).await;

    let id = create_room(
        &app,
        json!({"number": 200, "description": "description", "moviesId": [first, second]}),
    )
    .await;

    let response = get(&app, &format!("/api/v1/rooms/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let room = body_json(response).await;
    assert_eq!(room["id"], id.as_str());
    assert_eq!(room["number"], 200);
    assert_eq!(room["description"], "description");
    assert_eq!(movie_ids(&room), vec![first, second]);
    assert_eq!(room["movies"][1]["durationInHours"], "01:30:00");
}

#[tokio::test]
async fn unknown_movie_ids_are_ignored_on_create() {
    let app = common::build_test_app().await;
    let known = create_movie(&app, "known", 60).await;

    let id = create_room(
        &app,
        json!({"number": 1, "description": "d", "moviesId": ["nope", known]}),
    )
    .await;

    let room = body_json(get(&app, &format!("/api/v1/rooms/{id}")).await).await;
    assert_eq!(movie_ids(&room), vec![known]);
}

#[tokio::test]
async fn invalid_room_is_rejected() {
    let app = common::build_test_app().await;

    let response = post_json(&app, "/api/v1/rooms", json!({"number": 0, "description": "d"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"]["message"],
        "room number must be provided"
    );

    let response = post_json(&app, "/api/v1/rooms", json!({"number": 1, "description": ""})).await;
    assert_eq!(
        body_json(response).await["error"]["message"],
        "room description must be provided"
    );

    let listing = body_json(get(&app, "/api/v1/rooms/all/1").await).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn unknown_room_is_404() {
    let app = common::build_test_app().await;
    let response = get(&app, "/api/v1/rooms/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["message"], "room not found");
}

#[tokio::test]
async fn update_replaces_movies() {
    let app = common::build_test_app().await;
    let old = create_movie(&app, "old", 60).await;
    let new = create_movie(&app, "new", 60).await;
    let id = create_room(
        &app,
        json!({"number": 1, "description": "before", "moviesId": [old]}),
    )
    .await;

    let response = put_json(
        &app,
        &format!("/api/v1/rooms/{id}"),
        json!({"number": 2, "description": "after", "moviesId": [new]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "true");

    let room = body_json(get(&app, &format!("/api/v1/rooms/{id}")).await).await;
    assert_eq!(room["number"], 2);
    assert_eq!(room["description"], "after");
    assert_eq!(movie_ids(&room), vec![new]);

    let response = put_json(
        &app,
        "/api/v1/rooms/nowhere",
        json!({"number": 2, "description": "after"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_and_delete_rooms() {
    let app = common::build_test_app().await;
    let movie = create_movie(&app, "shared", 60).await;
    let mut ids = Vec::new();
    for number in 1..=11 {
        ids.push(
            create_room(
                &app,
                json!({"number": number, "description": "room", "moviesId": [movie]}),
            )
            .await,
        );
    }

    let listing = body_json(get(&app, "/api/v1/rooms/all/1").await).await;
    assert_eq!(listing["total"], 11);
    assert_eq!(listing["registers"].as_array().unwrap().len(), 10);
    assert_eq!(movie_ids(&listing["registers"][0]), vec![movie.clone()]);

    let response = delete(&app, &format!("/api/v1/rooms/{}", ids[10])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let listing = body_json(get(&app, "/api/v1/rooms/all/2").await).await;
    assert_eq!(listing["total"], 10);
    assert!(listing["registers"].as_array().unwrap().is_empty());

    // The movie itself survives the room's deletion.
    let response = get(&app, &format!("/api/v1/movies/{movie}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn undecodable_room_body_is_400_envelope() {
    let app = common::build_test_app().await;

    let response = post_json(
        &app,
        "/api/v1/rooms",
        json!({"number": 70000, "description": "too big", "moviesId": []}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "bad_request");
    assert!(json["error"]["message"].as_str().unwrap().contains("number"));

    let response = post_json(
        &app,
        "/api/v1/rooms",
        json!({"number": 1, "description": "d", "moviesId": "not-a-list"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(get(&app, "/api/v1/rooms/all/1").await).await;
    assert_eq!(json["total"], 0);
}
