//! API endpoints.

mod comments;
mod liked_videos;
mod users;
mod videos;
mod watch_history;

use axum::Router;

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/videos", videos::router())
        .nest("/comments", comments::router())
        .nest("/liked-videos", liked_videos::router())
        .nest("/watch-history", watch_history::router())
}
