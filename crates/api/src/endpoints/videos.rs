//! Video catalog endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use kidvid_common::AppResult;
use kidvid_db::entities::video;
use serde::{Deserialize, Serialize};

use crate::{
    response::{ApiResponse, Page, PageParams},
    state::AppState,
};

/// Video upload request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration: i32,
    #[serde(rename = "type")]
    pub video_type: video::VideoType,
}

/// Video update request. Every field is overwritten.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration: i32,
    #[serde(rename = "type")]
    pub video_type: video::VideoType,
}

/// Search query: title substring plus an optional type filter.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub title: String,
    #[serde(rename = "type")]
    pub video_type: Option<video::VideoType>,
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
}

/// Ranked listing query: optional type filter plus paging.
#[derive(Debug, Deserialize)]
pub struct RankedQuery {
    #[serde(rename = "type")]
    pub video_type: Option<video::VideoType>,
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
}

const fn default_size() -> u64 {
    10
}

/// Video response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration: i32,
    #[serde(rename = "type")]
    pub video_type: video::VideoType,
    pub likes_count: i32,
    pub comments_count: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<video::Model> for VideoResponse {
    fn from(video: video::Model) -> Self {
        Self {
            id: video.id,
            title: video.title,
            description: video.description,
            url: video.url,
            thumbnail_url: video.thumbnail_url,
            duration: video.duration,
            video_type: video.video_type,
            likes_count: video.likes_count,
            comments_count: video.comments_count,
            created_at: video.created_at.to_rfc3339(),
            updated_at: video.updated_at.to_rfc3339(),
        }
    }
}

fn to_page(items: Vec<video::Model>, total: u64, page: u64, size: u64) -> Page<VideoResponse> {
    Page::new(
        items.into_iter().map(VideoResponse::from).collect(),
        total,
        page,
        size,
    )
}

/// Upload a video.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateVideoRequest>,
) -> AppResult<ApiResponse<VideoResponse>> {
    let input = kidvid_core::CreateVideoInput {
        title: req.title,
        description: req.description,
        url: req.url,
        thumbnail_url: req.thumbnail_url,
        duration: req.duration,
        video_type: req.video_type,
    };

    let video = state.video_service.create(input).await?;

    Ok(ApiResponse::created("Video created", video.into()))
}

/// List all videos (paginated).
async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<ApiResponse<Page<VideoResponse>>> {
    let (items, total) = state.video_service.list_all(params.page, params.size).await?;

    Ok(ApiResponse::ok(to_page(
        items,
        total,
        params.page,
        params.size,
    )))
}

/// Get a video by ID.
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<VideoResponse>> {
    let video = state.video_service.get(id).await?;

    Ok(ApiResponse::ok(video.into()))
}

/// List videos of a given type (paginated).
async fn list_by_type(
    State(state): State<AppState>,
    Path(video_type): Path<video::VideoType>,
    Query(params): Query<PageParams>,
) -> AppResult<ApiResponse<Page<VideoResponse>>> {
    let (items, total) = state
        .video_service
        .list_by_type(video_type, params.page, params.size)
        .await?;

    Ok(ApiResponse::ok(to_page(
        items,
        total,
        params.page,
        params.size,
    )))
}

/// Search videos by title substring, optionally within a type.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<ApiResponse<Page<VideoResponse>>> {
    let (items, total) = match query.video_type {
        Some(t) => {
            state
                .video_service
                .search_by_type_and_title(t, &query.title, query.page, query.size)
                .await?
        }
        None => {
            state
                .video_service
                .search_by_title(&query.title, query.page, query.size)
                .await?
        }
    };

    Ok(ApiResponse::ok(to_page(items, total, query.page, query.size)))
}

/// List hot videos, most liked first.
async fn hot(
    State(state): State<AppState>,
    Query(query): Query<RankedQuery>,
) -> AppResult<ApiResponse<Page<VideoResponse>>> {
    let (items, total) = state
        .video_service
        .list_hot(query.video_type, query.page, query.size)
        .await?;

    Ok(ApiResponse::ok(to_page(items, total, query.page, query.size)))
}

/// List latest videos, newest first.
async fn latest(
    State(state): State<AppState>,
    Query(query): Query<RankedQuery>,
) -> AppResult<ApiResponse<Page<VideoResponse>>> {
    let (items, total) = state
        .video_service
        .list_latest(query.video_type, query.page, query.size)
        .await?;

    Ok(ApiResponse::ok(to_page(items, total, query.page, query.size)))
}

/// Update a video.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateVideoRequest>,
) -> AppResult<ApiResponse<VideoResponse>> {
    let input = kidvid_core::UpdateVideoInput {
        title: req.title,
        description: req.description,
        url: req.url,
        thumbnail_url: req.thumbnail_url,
        duration: req.duration,
        video_type: req.video_type,
    };

    let video = state.video_service.update(id, input).await?;

    Ok(ApiResponse::ok_with_message("Video updated", video.into()))
}

/// Delete a video.
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    state.video_service.delete(id).await?;

    Ok(ApiResponse::ok_with_message("Video deleted", ()))
}

/// Bump a video's likes count directly.
async fn increment_likes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    state.video_service.increment_likes(id).await?;

    Ok(ApiResponse::ok(()))
}

/// Drop a video's likes count directly, floored at zero.
async fn decrement_likes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    state.video_service.decrement_likes(id).await?;

    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/search", get(search))
        .route("/hot", get(hot))
        .route("/latest", get(latest))
        .route("/type/{video_type}", get(list_by_type))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
        .route("/{id}/like", post(increment_likes).delete(decrement_likes))
}
