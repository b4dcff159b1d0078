//! REST API handlers for the admin server
//!
//! This module defines the API routes and handlers for content management:
//! list views with filters/search/pagination/ordering, CRUD, bulk actions,
//! and CSV/JSON import & export.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::actions::{ActionOutcome, BlogAction, ToggleAction};
use super::export::{self, ExportFormat};
use super::import;
use super::server::AppState;
use crate::config::AdminConfig;
use crate::models::{
    BlogPatch, CategoryPatch, CommentPatch, NewBlog, NewCategory, NewComment,
};
use crate::storage::listing::{BlogOrder, BlogQuery, CommentOrder, CommentQuery, Page, SortDir};
use crate::storage::StorageError;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

fn not_found(message: impl Into<String>) -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(message)))
}

fn storage_err(e: StorageError) -> ApiError {
    match e {
        StorageError::NotFound { .. } => not_found(e.to_string()),
        other => {
            tracing::error!(error = %other, "storage operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("storage operation failed")),
            )
        }
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query string for the blog list and export views
#[derive(Debug, Default, Deserialize)]
pub struct BlogListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub is_draft: Option<bool>,
    pub category: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub order: Option<String>,
    pub dir: Option<String>,
    /// Export only: csv (default) or json
    pub format: Option<String>,
}

impl BlogListParams {
    fn to_query(&self) -> Result<BlogQuery, ApiError> {
        let order = match self.order.as_deref() {
            None => None,
            Some(raw) => Some(
                BlogOrder::from_param(raw)
                    .ok_or_else(|| bad_request(format!("unknown ordering key '{raw}'")))?,
            ),
        };

        let dir = match self.dir.as_deref() {
            None => SortDir::default(),
            Some(raw) => SortDir::from_param(raw)
                .ok_or_else(|| bad_request(format!("unknown sort direction '{raw}'")))?,
        };

        if self.month.is_some() && self.year.is_none() {
            return Err(bad_request("month filter requires year"));
        }
        if self.day.is_some() && self.month.is_none() {
            return Err(bad_request("day filter requires month"));
        }
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(bad_request(format!("invalid month {month}")));
            }
        }
        if let Some(day) = self.day {
            if !(1..=31).contains(&day) {
                return Err(bad_request(format!("invalid day {day}")));
            }
        }

        Ok(BlogQuery {
            search: self.search.clone().filter(|s| !s.is_empty()),
            is_draft: self.is_draft,
            category_id: self.category,
            year: self.year,
            month: self.month,
            day: self.day,
            order,
            dir,
        })
    }

    fn to_page(&self, admin: &AdminConfig) -> Page {
        let per_page = self
            .per_page
            .unwrap_or(admin.page_size)
            .min(admin.max_page_size);
        Page::new(self.page.unwrap_or(1), per_page)
    }
}

/// Query string for the comment list view
#[derive(Debug, Default, Deserialize)]
pub struct CommentListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub blog: Option<i64>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub order: Option<String>,
    pub dir: Option<String>,
}

impl CommentListParams {
    fn to_query(&self) -> Result<CommentQuery, ApiError> {
        let order = match self.order.as_deref() {
            None => CommentOrder::default(),
            Some(raw) => CommentOrder::from_param(raw)
                .ok_or_else(|| bad_request(format!("unknown ordering key '{raw}'")))?,
        };

        let dir = match self.dir.as_deref() {
            None => SortDir::default(),
            Some(raw) => SortDir::from_param(raw)
                .ok_or_else(|| bad_request(format!("unknown sort direction '{raw}'")))?,
        };

        Ok(CommentQuery {
            blog_id: self.blog,
            is_active: self.is_active,
            search: self.search.clone().filter(|s| !s.is_empty()),
            order,
            dir,
        })
    }

    fn to_page(&self, admin: &AdminConfig) -> Page {
        let per_page = self
            .per_page
            .unwrap_or(admin.page_size)
            .min(admin.max_page_size);
        Page::new(self.page.unwrap_or(1), per_page)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryListParams {
    /// Inactive categories are listed unless explicitly excluded
    pub include_inactive: Option<bool>,
}

// ============================================================================
// Action Requests
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BlogActionRequest {
    pub action: BlogAction,
    pub ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleActionRequest {
    pub action: ToggleAction,
    pub ids: Vec<i64>,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health + stats
        .route("/api/health", get(health_check))
        .route("/api/stats", get(get_stats))
        .route("/metrics", get(get_metrics))
        // Blog endpoints
        .route("/api/blogs", get(list_blogs).post(create_blog))
        .route("/api/blogs/actions", post(blog_actions))
        .route("/api/blogs/export", get(export_blogs))
        .route("/api/blogs/import", post(import_blogs))
        .route(
            "/api/blogs/{id}",
            get(get_blog).put(update_blog).delete(delete_blog),
        )
        .route(
            "/api/blogs/{id}/comments",
            get(list_blog_comments).post(create_blog_comment),
        )
        // Comment endpoints
        .route("/api/comments", get(list_comments))
        .route("/api/comments/actions", post(comment_actions))
        .route(
            "/api/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        // Category endpoints
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/categories/actions", post(category_actions))
        .route(
            "/api/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .with_state(state)
}

// ============================================================================
// Health + Stats Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
    }))
}

async fn get_stats(State(state): State<AppState>) -> Result<Response, ApiError> {
    #[derive(Serialize)]
    struct StatsResponse {
        content: crate::models::ContentStats,
        uptime_secs: u64,
    }

    let content = state.store.content_stats().map_err(storage_err)?;
    Ok(Json(ApiResponse::success(StatsResponse {
        content,
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
    .into_response())
}

async fn get_metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::render(),
    )
}

// ============================================================================
// Blog Handlers
// ============================================================================

async fn list_blogs(
    State(state): State<AppState>,
    Query(params): Query<BlogListParams>,
) -> Result<Response, ApiError> {
    let query = params.to_query()?;
    let page = params.to_page(&state.admin);

    let listed = state.store.list_blogs(&query, page).map_err(storage_err)?;
    Ok(Json(ApiResponse::success(listed)).into_response())
}

async fn create_blog(
    State(state): State<AppState>,
    Json(new): Json<NewBlog>,
) -> Result<Response, ApiError> {
    if new.title.trim().is_empty() {
        return Err(bad_request("title is required"));
    }

    let blog = state.store.create_blog(&new).map_err(storage_err)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(blog))).into_response())
}

async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    match state.store.get_blog_detail(id).map_err(storage_err)? {
        Some(detail) => Ok(Json(ApiResponse::success(detail)).into_response()),
        None => Err(not_found(format!("blog not found: {id}"))),
    }
}

async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<BlogPatch>,
) -> Result<Response, ApiError> {
    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            return Err(bad_request("title cannot be empty"));
        }
    }

    match state.store.update_blog(id, &patch).map_err(storage_err)? {
        Some(blog) => Ok(Json(ApiResponse::success(blog)).into_response()),
        None => Err(not_found(format!("blog not found: {id}"))),
    }
}

async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    if state.store.delete_blog(id).map_err(storage_err)? {
        Ok(Json(ApiResponse::success(format!("blog {id} deleted"))).into_response())
    } else {
        Err(not_found(format!("blog not found: {id}")))
    }
}

async fn blog_actions(
    State(state): State<AppState>,
    Json(request): Json<BlogActionRequest>,
) -> Response {
    let outcome = match state
        .store
        .set_draft_many(&request.ids, request.action.is_draft())
    {
        Ok(updated) => {
            crate::metrics::record_bulk_update("blog", request.action.as_str(), updated);
            ActionOutcome::succeeded(updated, "blog", request.action.verb())
        }
        Err(e) => {
            // One fixed warning regardless of cause; details go to the log
            tracing::warn!(error = %e, action = request.action.as_str(), "bulk blog update failed");
            ActionOutcome::failed("blog")
        }
    };

    Json(outcome).into_response()
}

async fn export_blogs(
    State(state): State<AppState>,
    Query(params): Query<BlogListParams>,
) -> Result<Response, ApiError> {
    let format = match params.format.as_deref() {
        None => ExportFormat::Csv,
        Some(raw) => ExportFormat::from_param(raw)
            .ok_or_else(|| bad_request(format!("unknown export format '{raw}'")))?,
    };
    let query = params.to_query()?;

    let bytes = export::export_blogs(&state.store, &query, format).map_err(|e| {
        tracing::error!(error = %e, "blog export failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("export failed")),
        )
    })?;

    let disposition = format!("attachment; filename=\"blogs.{}\"", format.extension());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn import_blogs(State(state): State<AppState>, body: String) -> Result<Response, ApiError> {
    match import::import_blogs(&state.store, body.as_bytes()) {
        Ok(report) => Ok(Json(ApiResponse::success(report)).into_response()),
        Err(e @ import::ImportError::MissingColumn(_)) => Err(bad_request(e.to_string())),
        Err(import::ImportError::Csv(e)) => Err(bad_request(format!("CSV parse error: {e}"))),
        Err(import::ImportError::Storage(e)) => Err(storage_err(e)),
    }
}

// ============================================================================
// Comment Handlers
// ============================================================================

async fn list_blog_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<CommentListParams>,
) -> Result<Response, ApiError> {
    if state.store.get_blog(id).map_err(storage_err)?.is_none() {
        return Err(not_found(format!("blog not found: {id}")));
    }

    let mut query = params.to_query()?;
    query.blog_id = Some(id);
    let page = params.to_page(&state.admin);

    let listed = state
        .store
        .list_comments(&query, page)
        .map_err(storage_err)?;
    Ok(Json(ApiResponse::success(listed)).into_response())
}

async fn create_blog_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(new): Json<NewComment>,
) -> Result<Response, ApiError> {
    if new.comment.trim().is_empty() {
        return Err(bad_request("comment text is required"));
    }

    let comment = state.store.create_comment(id, &new).map_err(storage_err)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(comment))).into_response())
}

async fn list_comments(
    State(state): State<AppState>,
    Query(params): Query<CommentListParams>,
) -> Result<Response, ApiError> {
    let query = params.to_query()?;
    let page = params.to_page(&state.admin);

    let listed = state
        .store
        .list_comments(&query, page)
        .map_err(storage_err)?;
    Ok(Json(ApiResponse::success(listed)).into_response())
}

async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    match state.store.get_comment(id).map_err(storage_err)? {
        Some(comment) => Ok(Json(ApiResponse::success(comment)).into_response()),
        None => Err(not_found(format!("comment not found: {id}"))),
    }
}

async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<CommentPatch>,
) -> Result<Response, ApiError> {
    match state.store.update_comment(id, &patch).map_err(storage_err)? {
        Some(comment) => Ok(Json(ApiResponse::success(comment)).into_response()),
        None => Err(not_found(format!("comment not found: {id}"))),
    }
}

async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    if state.store.delete_comment(id).map_err(storage_err)? {
        Ok(Json(ApiResponse::success(format!("comment {id} deleted"))).into_response())
    } else {
        Err(not_found(format!("comment not found: {id}")))
    }
}

async fn comment_actions(
    State(state): State<AppState>,
    Json(request): Json<ToggleActionRequest>,
) -> Response {
    let outcome = match state
        .store
        .set_active_many(&request.ids, request.action.is_active())
    {
        Ok(updated) => {
            crate::metrics::record_bulk_update("comment", request.action.as_str(), updated);
            ActionOutcome::succeeded(updated, "comment", request.action.verb())
        }
        Err(e) => {
            tracing::warn!(error = %e, action = request.action.as_str(), "bulk comment update failed");
            ActionOutcome::failed("comment")
        }
    };

    Json(outcome).into_response()
}

// ============================================================================
// Category Handlers
// ============================================================================

async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<CategoryListParams>,
) -> Result<Response, ApiError> {
    let include_inactive = params.include_inactive.unwrap_or(true);
    let categories = state
        .store
        .list_categories(include_inactive)
        .map_err(storage_err)?;
    Ok(Json(ApiResponse::success(categories)).into_response())
}

async fn create_category(
    State(state): State<AppState>,
    Json(new): Json<NewCategory>,
) -> Result<Response, ApiError> {
    if new.name.trim().is_empty() {
        return Err(bad_request("name is required"));
    }

    let category = state.store.create_category(&new).map_err(storage_err)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))).into_response())
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    match state.store.get_category(id).map_err(storage_err)? {
        Some(category) => Ok(Json(ApiResponse::success(category)).into_response()),
        None => Err(not_found(format!("category not found: {id}"))),
    }
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Response, ApiError> {
    match state
        .store
        .update_category(id, &patch)
        .map_err(storage_err)?
    {
        Some(category) => Ok(Json(ApiResponse::success(category)).into_response()),
        None => Err(not_found(format!("category not found: {id}"))),
    }
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    if state.store.delete_category(id).map_err(storage_err)? {
        Ok(Json(ApiResponse::success(format!("category {id} deleted"))).into_response())
    } else {
        Err(not_found(format!("category not found: {id}")))
    }
}

async fn category_actions(
    State(state): State<AppState>,
    Json(request): Json<ToggleActionRequest>,
) -> Response {
    let outcome = match state
        .store
        .set_category_active_many(&request.ids, request.action.is_active())
    {
        Ok(updated) => {
            crate::metrics::record_bulk_update("category", request.action.as_str(), updated);
            ActionOutcome::succeeded(updated, "category", request.action.verb())
        }
        Err(e) => {
            tracing::warn!(error = %e, action = request.action.as_str(), "bulk category update failed");
            ActionOutcome::failed("category")
        }
    };

    Json(outcome).into_response()
}

// ============================================================================
// Tests
// ============================================================================
