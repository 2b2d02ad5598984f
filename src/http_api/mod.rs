use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    ItemFilter, ItemKind, Roadmap, RoadmapError, RoadmapMetadata, ScheduledItem, TimelineView, ValidationFlag, ZoomLevel,
};

const DEFAULT_CONTAINER_WIDTH: f64 = 1200.0;

#[derive(Clone)]
pub struct AppState {
    roadmap: Arc<RwLock<Roadmap>>,
}

impl AppState {
    pub fn new(roadmap: Roadmap) -> Self {
        Self {
            roadmap: Arc::new(RwLock::new(roadmap)),
        }
    }

    pub fn with_shared(roadmap: Arc<RwLock<Roadmap>>) -> Self {
        Self { roadmap }
    }

    fn roadmap(&self) -> Arc<RwLock<Roadmap>> {
        self.roadmap.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<RoadmapError> for ApiError {
    fn from(value: RoadmapError) -> Self {
        match value {
            RoadmapError::InvalidItem(err) => ApiError::Invalid(err.to_string()),
            RoadmapError::AlreadyExists(id) => ApiError::Conflict(format!("item {id} already exists")),
            RoadmapError::NotFound(id) => ApiError::NotFound(format!("item {id} not found")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    zoom: Option<String>,
    reference: Option<NaiveDate>,
    width: Option<f64>,
    kind: Option<String>,
    product: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemsQuery {
    kind: Option<String>,
    product: Option<String>,
}

fn item_filter(kind: Option<&str>, product: Option<&str>) -> Result<ItemFilter, ApiError> {
    let mut filter = ItemFilter::new();
    if let Some(raw) = kind {
        filter = filter.with_kind(ItemKind::from_str(raw).map_err(ApiError::invalid)?);
    }
    if let Some(product_id) = product {
        filter = filter.with_product(product_id);
    }
    Ok(filter)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationReport {
    pub flags: Vec<ValidationFlag>,
    pub cycles: Vec<Vec<String>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metadata", get(get_metadata).put(update_metadata))
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/timeline", get(get_timeline))
        .route("/validation", get(get_validation))
        .route("/order", get(get_order))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, roadmap: Roadmap) -> std::io::Result<()> {
    let state = AppState::new(roadmap);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "roadmap HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_metadata(State(state): State<AppState>) -> Json<RoadmapMetadata> {
    let roadmap = state.roadmap();
    let metadata = roadmap.read().metadata().clone();
    Json(metadata)
}

async fn update_metadata(
    State(state): State<AppState>,
    Json(metadata): Json<RoadmapMetadata>,
) -> Json<RoadmapMetadata> {
    let roadmap = state.roadmap();
    let mut guard = roadmap.write();
    guard.set_metadata(metadata);
    Json(guard.metadata().clone())
}

async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<Vec<ScheduledItem>>, ApiError> {
    let filter = item_filter(query.kind.as_deref(), query.product.as_deref())?;
    let roadmap = state.roadmap();
    let items = roadmap.read().filtered_items(&filter).cloned().collect();
    Ok(Json(items))
}

async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<ScheduledItem>, ApiError> {
    let roadmap = state.roadmap();
    let guard = roadmap.read();
    guard
        .find_item(&item_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("item {item_id} not found")))
}

async fn create_item(
    State(state): State<AppState>,
    Json(item): Json<ScheduledItem>,
) -> Result<(StatusCode, Json<ScheduledItem>), ApiError> {
    let roadmap = state.roadmap();
    roadmap.write().insert_item(item.clone())?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(item): Json<ScheduledItem>,
) -> Result<Json<ScheduledItem>, ApiError> {
    if item.id != item_id {
        return Err(ApiError::invalid(
            "item id in payload does not match path parameter",
        ));
    }
    let roadmap = state.roadmap();
    let mut guard = roadmap.write();
    if guard.find_item(&item_id).is_none() {
        return Err(ApiError::not_found(format!("item {item_id} not found")));
    }
    guard.upsert_item(item.clone())?;
    Ok(Json(item))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let roadmap = state.roadmap();
    let removed = roadmap.write().delete_item(&item_id);
    if !removed {
        return Err(ApiError::not_found(format!("item {item_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn get_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<TimelineView>, ApiError> {
    let zoom = match query.zoom.as_deref() {
        Some(raw) => ZoomLevel::from_str(raw).map_err(ApiError::invalid)?,
        None => ZoomLevel::default(),
    };
    let width = query.width.unwrap_or(DEFAULT_CONTAINER_WIDTH);
    if !width.is_finite() || width <= 0.0 {
        return Err(ApiError::invalid("width must be a positive number"));
    }
    let reference = query.reference.unwrap_or_else(|| Utc::now().date_naive());
    let filter = item_filter(query.kind.as_deref(), query.product.as_deref())?;

    let roadmap = state.roadmap();
    let view = roadmap
        .read()
        .filtered_timeline(reference, zoom, width, &filter);
    Ok(Json(view))
}

async fn get_validation(State(state): State<AppState>) -> Json<ValidationReport> {
    let roadmap = state.roadmap();
    let guard = roadmap.read();
    Json(ValidationReport {
        flags: guard.validate(),
        cycles: guard.cycle_groups(),
    })
}

async fn get_order(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let roadmap = state.roadmap();
    let order = roadmap
        .read()
        .dependency_order()
        .map_err(|err| ApiError::Conflict(err.to_string()))?;
    Ok(Json(order))
}
