//! Router tests against a real Postgres
//!
//! Run with:
//! TEST_DATABASE_URL=postgres://... cargo test --test db_tests -- --ignored
//!
//! Both binds point at the same database. Each test tags its rows with a
//! unique token and filters on it, so tests can share the tables.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`
use uuid::Uuid;

use music_selections_server::config::Config;
use music_selections_server::db::{run_migrations, Databases};
use music_selections_server::services::search_cache::SearchCache;
use music_selections_server::{build_router, AppState};

const ADMIN_KEY: &str = "test-admin-key";

async fn setup_app() -> Router {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL required");

    let mut config = Config::from_env();
    config.database_url = url.clone();
    config.music_selections_database_url = url;
    config.redis_url = None;
    config.admin_key = Some(ADMIN_KEY.to_string());
    config.default_page_size = 20;
    config.max_page_size = 100;

    let db = Databases::connect(&config).await.expect("Should connect");
    run_migrations(&db).await.expect("Should migrate");

    build_router(Arc::new(AppState::new(config, db, SearchCache::disabled())))
}

fn token() -> String {
    format!("t{}", Uuid::new_v4().simple())
}

/// Percent-encode the characters these tests put in `q`
fn encode(q: &str) -> String {
    q.replace('%', "%25")
        .replace(' ', "%20")
        .replace('\\', "%5C")
        .replace('&', "%26")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    (status, serde_json::from_slice(&bytes).expect("Should parse JSON"))
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-admin-key", ADMIN_KEY)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn add_selection(app: &Router, body: Value) -> Value {
    let (status, response) = post_json(app, "/add_music_selection", body).await;
    assert_eq!(status, StatusCode::CREATED, "{}", response);
    response["data"].clone()
}

async fn create_show(app: &Router, title: &str) -> i64 {
    let (status, response) = post_json(app, "/shows", json!({ "title": title })).await;
    assert_eq!(status, StatusCode::CREATED, "{}", response);
    response["data"]["id"].as_i64().unwrap()
}

async fn search(app: &Router, query: &str) -> Value {
    let (status, response) = get(app, &format!("/search?{}", query)).await;
    assert_eq!(status, StatusCode::OK, "{}", response);
    response["data"].clone()
}

fn titles(data: &Value) -> Vec<String> {
    data["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Migrations
// =============================================================================

#[tokio::test]
#[ignore = "requires database"]
async fn migrations_are_rerunnable() {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL required");
    let mut config = Config::from_env();
    config.database_url = url.clone();
    config.music_selections_database_url = url;

    let db = Databases::connect(&config).await.expect("Should connect");
    run_migrations(&db).await.expect("first run");
    run_migrations(&db).await.expect("second run");
}

// =============================================================================
// POST /add_music_selection
// =============================================================================

#[tokio::test]
#[ignore = "requires database"]
async fn add_selection_stores_normalized_row() {
    let app = setup_app().await;
    let tok = token();

    let data = add_selection(
        &app,
        json!({
            "title": format!("  {}   Bolero ", tok),
            "composer": "Maurice Ravel",
            "arranger": "   ",
            "difficulty": "advanced",
            "duration": "4:30",
            "bpm": 72
        }),
    )
    .await;

    assert_eq!(data["title"], format!("{} Bolero", tok));
    assert_eq!(data["difficulty"], "Advanced");
    assert!(data["arranger"].is_null());

    let id = data["id"].as_str().unwrap();
    let (status, fetched) = get(&app, &format!("/music_selections/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["bpm"], 72);
}

#[tokio::test]
#[ignore = "requires database"]
async fn add_selection_with_unknown_show_is_not_found() {
    let app = setup_app().await;

    let (status, body) = post_json(
        &app,
        "/add_music_selection",
        json!({ "title": token(), "showId": i32::MAX }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Show not found");
}

// =============================================================================
// GET /search
// =============================================================================

#[tokio::test]
#[ignore = "requires database"]
async fn search_matches_every_text_column() {
    let app = setup_app().await;
    let tok = token();

    add_selection(&app, json!({ "title": format!("{} in title", tok) })).await;
    add_selection(&app, json!({ "title": "Composer hit", "composer": tok.to_uppercase() })).await;
    add_selection(&app, json!({ "title": "Arranger hit", "arranger": tok })).await;
    add_selection(&app, json!({ "title": "Song hit", "songTitle": format!("({})", tok) })).await;
    add_selection(&app, json!({ "title": "Lyricist only", "lyricist": tok })).await;

    let data = search(&app, &format!("q={}&sort=title", tok)).await;
    assert_eq!(data["pagination"]["total"], 4);
    assert_eq!(data["query"], tok.as_str());

    let mut found = titles(&data);
    found.sort();
    let mut expected = vec![
        "Arranger hit".to_string(),
        "Composer hit".to_string(),
        "Song hit".to_string(),
        format!("{} in title", tok),
    ];
    expected.sort();
    assert_eq!(found, expected);
}

#[tokio::test]
#[ignore = "requires database"]
async fn search_treats_like_wildcards_literally() {
    let app = setup_app().await;
    let tok = token();

    for title in ["100% sure", "1000 sure", "a_b", "axb", r"c\d", "cd"] {
        add_selection(&app, json!({ "title": format!("{} {}", tok, title) })).await;
    }

    let percent = search(&app, &format!("q={}", encode(&format!("{} 100%", tok)))).await;
    assert_eq!(titles(&percent), vec![format!("{} 100% sure", tok)]);

    let underscore = search(&app, &format!("q={}", encode(&format!("{} a_b", tok)))).await;
    assert_eq!(titles(&underscore), vec![format!("{} a_b", tok)]);

    let backslash = search(&app, &format!("q={}", encode(&format!(r"{} c\d", tok)))).await;
    assert_eq!(titles(&backslash), vec![format!(r"{} c\d", tok)]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn search_filters_by_show_and_difficulty() {
    let app = setup_app().await;
    let tok = token();
    let show_id = create_show(&app, &format!("{} show", tok)).await;

    add_selection(
        &app,
        json!({ "title": format!("{} one", tok), "showId": show_id, "difficulty": "Advanced" }),
    )
    .await;
    add_selection(
        &app,
        json!({ "title": format!("{} two", tok), "showId": show_id, "difficulty": "Beginner" }),
    )
    .await;
    add_selection(
        &app,
        json!({ "title": format!("{} three", tok), "difficulty": "Advanced" }),
    )
    .await;

    let by_show = search(&app, &format!("q={}&showId={}", tok, show_id)).await;
    assert_eq!(by_show["pagination"]["total"], 2);

    let by_difficulty = search(&app, &format!("q={}&difficulty=advanced", tok)).await;
    assert_eq!(by_difficulty["pagination"]["total"], 2);

    let both = search(
        &app,
        &format!("q={}&showId={}&difficulty=ADVANCED", tok, show_id),
    )
    .await;
    assert_eq!(titles(&both), vec![format!("{} one", tok)]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn search_pages_are_stable_on_ties() {
    let app = setup_app().await;
    let tok = token();

    for _ in 0..5 {
        add_selection(&app, json!({ "title": format!("{} same", tok) })).await;
    }

    let mut ids = Vec::new();
    for page in 1..=3 {
        let data = search(&app, &format!("q={}&sort=title&limit=2&page={}", tok, page)).await;
        let pagination = &data["pagination"];
        assert_eq!(pagination["total"], 5);
        assert_eq!(pagination["totalPages"], 3);
        assert_eq!(pagination["hasPrev"], page > 1);
        assert_eq!(pagination["hasNext"], page < 3);

        for item in data["items"].as_array().unwrap() {
            ids.push(item["id"].as_str().unwrap().to_string());
        }
    }

    // Equal titles fall back to id order, so pages neither overlap nor skip
    assert_eq!(ids.len(), 5);
    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(ids, sorted);
}

#[tokio::test]
#[ignore = "requires database"]
async fn search_without_matches_has_no_pages() {
    let app = setup_app().await;

    let data = search(&app, &format!("q={}", token())).await;
    assert_eq!(data["items"], json!([]));
    assert_eq!(data["pagination"]["total"], 0);
    assert_eq!(data["pagination"]["totalPages"], 0);
    assert_eq!(data["pagination"]["hasNext"], false);
}

// =============================================================================
// Shows
// =============================================================================

#[tokio::test]
#[ignore = "requires database"]
async fn show_detail_lists_selections_by_title() {
    let app = setup_app().await;
    let tok = token();
    let show_id = create_show(&app, &format!("{} show", tok)).await;

    add_selection(&app, json!({ "title": "b second", "showId": show_id })).await;
    add_selection(&app, json!({ "title": "A first", "showId": show_id })).await;

    let (status, body) = get(&app, &format!("/shows/{}", show_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], show_id);

    let selections: Vec<_> = body["data"]["musicSelections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(selections, vec!["A first", "b second"]);
}
