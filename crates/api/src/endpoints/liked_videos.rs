//! Like/unlike endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use kidvid_common::AppResult;
use kidvid_db::entities::liked_video;
use serde::Serialize;

use crate::{
    response::{ApiResponse, Page, PageParams},
    state::AppState,
};

/// Liked video response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideoResponse {
    pub id: i32,
    pub user_id: i64,
    pub video_id: i32,
    pub liked_at: String,
}

impl From<liked_video::Model> for LikedVideoResponse {
    fn from(like: liked_video::Model) -> Self {
        Self {
            id: like.id,
            user_id: like.user_id,
            video_id: like.video_id,
            liked_at: like.liked_at.to_rfc3339(),
        }
    }
}

/// Like a video.
async fn like(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(i64, i32)>,
) -> AppResult<ApiResponse<LikedVideoResponse>> {
    let liked = state.liked_video_service.like(user_id, video_id).await?;

    Ok(ApiResponse::ok_with_message("Video liked", liked.into()))
}

/// Unlike a video.
async fn unlike(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(i64, i32)>,
) -> AppResult<ApiResponse<()>> {
    state.liked_video_service.unlike(user_id, video_id).await?;

    Ok(ApiResponse::ok_with_message("Video unliked", ()))
}

/// Check whether a user has liked a video.
async fn check(
    State(state): State<AppState>,
    Path((user_id, video_id)): Path<(i64, i32)>,
) -> AppResult<ApiResponse<bool>> {
    let has_liked = state.liked_video_service.has_liked(user_id, video_id).await?;

    Ok(ApiResponse::ok(has_liked))
}

/// List a user's liked videos (paginated).
async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> AppResult<ApiResponse<Page<LikedVideoResponse>>> {
    let (items, total) = state
        .liked_video_service
        .list_liked(user_id, params.page, params.size)
        .await?;

    Ok(ApiResponse::ok(Page::new(
        items.into_iter().map(LikedVideoResponse::from).collect(),
        total,
        params.page,
        params.size,
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}", get(list_for_user))
        .route("/users/{user_id}/videos/{video_id}", post(like).delete(unlike))
        .route("/users/{user_id}/videos/{video_id}/check", get(check))
}
