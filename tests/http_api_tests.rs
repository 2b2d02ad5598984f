#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use roadmap_tool::http_api::{self, ValidationReport};
use roadmap_tool::{FlagKind, ItemKind, Roadmap, ScheduledItem, TimelineView};
use std::sync::Arc;
use tower::util::ServiceExt;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_router() -> axum::Router {
    http_api::router(http_api::AppState::new(Roadmap::new()))
}

fn json_request(method: &str, uri: &str, item: &ScheduledItem) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(item).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn item_lifecycle_via_http_api() {
    let app = new_router();
    let item = ScheduledItem::new("f1", "Search").with_dates(d(2024, 6, 3), d(2024, 6, 14));

    let response = app
        .clone()
        .oneshot(json_request("POST", "/items", &item))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/items", &item))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.clone().oneshot(get("/items/f1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let fetched: ScheduledItem = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(fetched, item);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/items/f1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get("/items/f1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reversed_dates_are_a_bad_request() {
    let app = new_router();
    let mut item = ScheduledItem::new("f1", "Search");
    item.start_date = Some(d(2024, 6, 14));
    item.end_date = Some(d(2024, 6, 3));
    let response = app
        .oneshot(json_request("POST", "/items", &item))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn timeline_endpoint_lays_out_items() {
    let mut roadmap = Roadmap::new();
    roadmap
        .upsert_item(ScheduledItem::new("f1", "Search").with_dates(d(2024, 6, 5), d(2024, 6, 20)))
        .unwrap();
    let app = http_api::router(http_api::AppState::new(roadmap));

    let response = app
        .clone()
        .oneshot(get("/timeline?zoom=month&reference=2024-06-15&width=1400"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let view: TimelineView = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(view.buckets.len(), 14);
    assert_eq!(view.bars.len(), 1);
    assert_eq!(view.bars[0].position.left, 100.0);
    assert_eq!(view.bars[0].position.width, 300.0);

    let response = app
        .oneshot(get("/timeline?zoom=decade"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn validation_endpoint_reports_cycles() {
    let mut roadmap = Roadmap::new();
    roadmap
        .upsert_item(ScheduledItem::new("a", "A").with_dependencies(["b"]))
        .unwrap();
    roadmap
        .upsert_item(ScheduledItem::new("b", "B").with_dependencies(["a"]))
        .unwrap();
    let app = http_api::router(http_api::AppState::new(roadmap));

    let response = app.clone().oneshot(get("/validation")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let report: ValidationReport = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report.flags.len(), 2);
    assert!(report
        .flags
        .iter()
        .all(|f| f.kind == FlagKind::CircularDependency));
    assert_eq!(report.cycles, vec![vec!["a".to_string(), "b".to_string()]]);

    let response = app.oneshot(get("/order")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn item_and_timeline_queries_filter_by_kind_and_product() {
    let mut roadmap = Roadmap::new();
    roadmap
        .upsert_item(
            ScheduledItem::new("api", "Public API")
                .with_dates(d(2024, 6, 3), d(2024, 6, 21))
                .with_product("platform"),
        )
        .unwrap();
    roadmap
        .upsert_item(
            ScheduledItem::new("sdk", "SDK docs")
                .with_dates(d(2024, 6, 24), d(2024, 7, 5))
                .with_kind(ItemKind::Story)
                .with_product("platform"),
        )
        .unwrap();
    roadmap
        .upsert_item(
            ScheduledItem::new("cart", "Cart")
                .with_dates(d(2024, 6, 3), d(2024, 6, 7))
                .with_product("shop"),
        )
        .unwrap();
    let app = http_api::router(http_api::AppState::new(roadmap));

    let response = app
        .clone()
        .oneshot(get("/items?product=platform"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let items: Vec<ScheduledItem> = serde_json::from_slice(&bytes).unwrap();
    let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["api", "sdk"]);

    let response = app
        .clone()
        .oneshot(get(
            "/timeline?zoom=month&reference=2024-06-15&width=1400&kind=story",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let view: TimelineView = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(view.bars.len(), 1);
    assert_eq!(view.bars[0].item_id, "sdk");
    assert_eq!(view.summary.item_count, 1);

    let response = app.oneshot(get("/items?kind=epic")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn shared_roadmap_changes_are_visible_to_the_api() {
    let shared = Arc::new(RwLock::new(Roadmap::new()));
    let app = http_api::router(http_api::AppState::with_shared(shared.clone()));

    shared
        .write()
        .upsert_item(ScheduledItem::new("f1", "Search"))
        .unwrap();

    let response = app.oneshot(get("/items/f1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
