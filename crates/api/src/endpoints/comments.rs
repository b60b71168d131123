//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use kidvid_common::AppResult;
use kidvid_core::CommentView;
use kidvid_db::entities::comment;
use serde::{Deserialize, Serialize};

use crate::{
    response::{ApiResponse, Page, PageParams},
    state::AppState,
};

/// Comment creation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub video_id: i32,
    pub user_id: i64,
    pub content: String,
}

/// Comment update request. Only the content is mutable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Raw comment response (no author enrichment).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i32,
    pub video_id: i32,
    pub user_id: i64,
    pub content: String,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            video_id: comment.video_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// Post a comment on a video.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let input = kidvid_core::CreateCommentInput {
        video_id: req.video_id,
        user_id: req.user_id,
        content: req.content,
    };

    let comment = state.comment_service.create(input).await?;

    Ok(ApiResponse::created("Comment created", comment.into()))
}

/// Get a comment by ID.
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state.comment_service.get(id).await?;

    Ok(ApiResponse::ok(comment.into()))
}

/// Update a comment's content.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateCommentRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state.comment_service.update(id, req.content).await?;

    Ok(ApiResponse::ok_with_message("Comment updated", comment.into()))
}

/// Delete a comment.
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<()>> {
    // Surface a 404 for unknown ids; the service itself treats the delete
    // of an absent comment as a no-op.
    state.comment_service.get(id).await?;
    state.comment_service.delete(id).await?;

    Ok(ApiResponse::ok_with_message("Comment deleted", ()))
}

/// Get a video's comments, newest first, with author fields.
async fn list_for_video(
    State(state): State<AppState>,
    Path(video_id): Path<i32>,
) -> AppResult<ApiResponse<Vec<CommentView>>> {
    state.video_service.get(video_id).await?;

    let comments = state.comment_service.list_for_video(video_id).await?;

    Ok(ApiResponse::ok(comments))
}

/// Get a video's comments, newest first, with author fields (paginated).
async fn list_for_video_paged(
    State(state): State<AppState>,
    Path(video_id): Path<i32>,
    Query(params): Query<PageParams>,
) -> AppResult<ApiResponse<Page<CommentView>>> {
    state.video_service.get(video_id).await?;

    let (comments, total) = state
        .comment_service
        .list_for_video_paged(video_id, params.page, params.size)
        .await?;

    Ok(ApiResponse::ok(Page::new(
        comments,
        total,
        params.page,
        params.size,
    )))
}

/// Count a video's comments.
async fn count_for_video(
    State(state): State<AppState>,
    Path(video_id): Path<i32>,
) -> AppResult<ApiResponse<u64>> {
    state.video_service.get(video_id).await?;

    let count = state.comment_service.count_for_video(video_id).await?;

    Ok(ApiResponse::ok(count))
}

/// Get the comments a user has posted.
async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state.comment_service.list_for_user(user_id).await?;

    Ok(ApiResponse::ok(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
        .route("/videos/{video_id}", get(list_for_video))
        .route("/videos/{video_id}/page", get(list_for_video_paged))
        .route("/videos/{video_id}/count", get(count_for_video))
        .route("/users/{user_id}", get(list_for_user))
}
