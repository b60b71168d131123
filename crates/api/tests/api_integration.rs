//! API integration tests.
//!
//! These tests drive the router end to end against mock-backed services.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use kidvid_api::{AppState, router as api_router};
use kidvid_core::{
    CommentService, LikedVideoService, NoOpVerifier, UserService, VideoService,
    WatchHistoryService,
};
use kidvid_db::{
    entities::{liked_video, user, video, watch_history},
    repositories::{
        CommentRepository, LikedVideoRepository, UserRepository, VideoRepository,
        WatchHistoryRepository,
    },
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a mock database connection with no prepared results.
fn empty_db() -> Arc<DatabaseConnection> {
    Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

/// Build application state over per-table mock connections.
fn build_state(
    user_db: Arc<DatabaseConnection>,
    video_db: Arc<DatabaseConnection>,
    comment_db: Arc<DatabaseConnection>,
    liked_db: Arc<DatabaseConnection>,
    watch_db: Arc<DatabaseConnection>,
) -> AppState {
    let user_repo = UserRepository::new(user_db);
    let video_repo = VideoRepository::new(video_db);
    let comment_repo = CommentRepository::new(comment_db);
    let liked_repo = LikedVideoRepository::new(liked_db);
    let watch_repo = WatchHistoryRepository::new(watch_db);

    AppState {
        user_service: UserService::new(user_repo.clone(), Arc::new(NoOpVerifier)),
        video_service: VideoService::new(video_repo.clone()),
        comment_service: CommentService::new(comment_repo, user_repo, video_repo.clone()),
        liked_video_service: LikedVideoService::new(liked_repo, video_repo.clone()),
        watch_history_service: WatchHistoryService::new(watch_repo, video_repo),
    }
}

fn app(state: AppState) -> Router {
    Router::new().nest("/api", api_router()).with_state(state)
}

fn create_test_video(id: i32, title: &str) -> video::Model {
    video::Model {
        id,
        title: title.to_string(),
        description: None,
        url: "https://example.com/v.mp4".to_string(),
        thumbnail_url: None,
        duration: 120,
        video_type: video::VideoType::Learning,
        likes_count: 0,
        comments_count: 0,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_get_user_not_found_is_404() {
    let user_db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection(),
    );

    let state = build_state(user_db, empty_db(), empty_db(), empty_db(), empty_db());

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/users/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], 404);
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn test_get_video_ok_envelope() {
    let video_db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_video(1, "Counting with Apples")]])
            .into_connection(),
    );

    let state = build_state(empty_db(), video_db, empty_db(), empty_db(), empty_db());

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/videos/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["code"], 200);
    assert_eq!(json["data"]["title"], "Counting with Apples");
    assert_eq!(json["data"]["type"], "learning");
}

#[tokio::test]
async fn test_get_progress_defaults_to_zero() {
    let watch_db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<watch_history::Model>::new()])
            .into_connection(),
    );

    let state = build_state(empty_db(), empty_db(), empty_db(), empty_db(), watch_db);

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/watch-history/users/1/videos/2/progress")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"], 0);
}

#[tokio::test]
async fn test_like_check_false() {
    let liked_db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<liked_video::Model>::new()])
            .into_connection(),
    );

    let state = build_state(empty_db(), empty_db(), empty_db(), liked_db, empty_db());

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/liked-videos/users/1/videos/2/check")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"], false);
}

#[tokio::test]
async fn test_unlike_not_liked_is_rejected() {
    let liked_db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<liked_video::Model>::new()])
            .into_connection(),
    );

    let state = build_state(empty_db(), empty_db(), empty_db(), liked_db, empty_db());

    let response = app(state)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/liked-videos/users/1/videos/2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], 400);
}
