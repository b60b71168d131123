//! Watch history endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use kidvid_common::AppResult;
use kidvid_core::WatchHistoryView;
use kidvid_db::entities::watch_history;
use serde::{Deserialize, Serialize};

use crate::{
    response::{ApiResponse, Page, PageParams},
    state::AppState,
};

/// Watch event request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWatchRequest {
    pub user_id: i64,
    pub video_id: i32,
    #[serde(default)]
    pub progress: i32,
}

/// Progress ping request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub progress: i32,
}

/// Watch history response (no video enrichment).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryResponse {
    pub id: i32,
    pub user_id: i64,
    pub video_id: i32,
    pub watched_at: String,
    pub progress: i32,
}

impl From<watch_history::Model> for WatchHistoryResponse {
    fn from(history: watch_history::Model) -> Self {
        Self {
            id: history.id,
            user_id: history.user_id,
            video_id: history.video_id,
            watched_at: history.watched_at.to_rfc3339(),
            progress: history.progress,
        }
    }
}

/// Record a watch event (upsert by user and video).
async fn record(
    State(state): State<AppState>,
    Json(req): Json<RecordWatchRequest>,
) -> AppResult<ApiResponse<WatchHistoryResponse>> {
    let input = kidvid_core::RecordWatchInput {
        user_id: req.user_id,
        video_id: req.video_id,
        progress: req.progress,
    };

    let history = state.watch_history_service.record(input).await?;

    Ok(ApiResponse::created("Watch event recorded", history.into()))
}

/// Get a history row by ID.
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<WatchHistoryResponse>> {
    let history = state.watch_history_service.get(id).await?;

    Ok(ApiResponse::ok(history.into()))
}

/// Delete a history row.
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    state.watch_history_service.delete(id).await?;

    Ok(ApiResponse::ok_with_message("Watch history deleted", ()))
}

/// Get a user's history with video snapshots, newest first.
async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<WatchHistoryView>>> {
    let history = state.watch_history_service.list_for_user(user_id).await?;

    Ok(ApiResponse::ok(history))
}

/// Get a user's history with video snapshots (paginated).
async fn list_for_user_paged(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> AppResult<ApiResponse<Page<WatchHistoryView>>> {
    let (items, total) = state
        .watch_history_service
        .list_for_user_paged(user_id, params.page, params.size)
        .await?;

    Ok(ApiResponse::ok(Page::new(
        items,
        total,
        params.page,
        params.size,
    )))
}

/// Get a user's history from the trailing seven days.
async fn list_recent_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<WatchHistoryView>>> {
    let history = state
        .watch_history_service
        .list_recent_for_user(user_id)
        .await?;

    Ok(ApiResponse::ok(history))
}

/// Count the distinct videos a user has watched.
async fn count_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<ApiResponse<u64>> {
    let count = state
        .watch_history_service
        .count_distinct_videos_for_user(user_id)
        .await?;

    Ok(ApiResponse::ok(count))
}

/// Check whether a user has watched a video.
async fn check(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(i64, i32)>,
) -> AppResult<ApiResponse<bool>> {
    let watched = state
        .watch_history_service
        .has_watched(user_id, video_id)
        .await?;

    Ok(ApiResponse::ok(watched))
}

/// Get the saved progress for a user/video pair, zero when unwatched.
async fn get_progress(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(i64, i32)>,
) -> AppResult<ApiResponse<i32>> {
    let progress = state
        .watch_history_service
        .get_progress(user_id, video_id)
        .await?;

    Ok(ApiResponse::ok(progress))
}

/// Update the saved progress for a user/video pair (upsert).
async fn update_progress(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(i64, i32)>,
    Json(req): Json<UpdateProgressRequest>,
) -> AppResult<ApiResponse<WatchHistoryResponse>> {
    let history = state
        .watch_history_service
        .update_progress(user_id, video_id, req.progress)
        .await?;

    Ok(ApiResponse::ok_with_message("Progress updated", history.into()))
}

/// Delete the history row for a user/video pair.
async fn delete_for_user_video(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(i64, i32)>,
) -> AppResult<ApiResponse<()>> {
    state
        .watch_history_service
        .delete_for_user_video(user_id, video_id)
        .await?;

    Ok(ApiResponse::ok_with_message("Watch history deleted", ()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(record))
        .route("/{id}", get(get_by_id).delete(delete))
        .route("/users/{user_id}", get(list_for_user))
        .route("/users/{user_id}/page", get(list_for_user_paged))
        .route("/users/{user_id}/recent", get(list_recent_for_user))
        .route("/users/{user_id}/count", get(count_for_user))
        .route("/users/{user_id}/videos/{video_id}", axum::routing::delete(delete_for_user_video))
        .route("/users/{user_id}/videos/{video_id}/check", get(check))
        .route(
            "/users/{user_id}/videos/{video_id}/progress",
            get(get_progress).put(update_progress),
        )
}
