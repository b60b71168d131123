//! Shared application state.

#![allow(missing_docs)]

use kidvid_core::{
    CommentService, LikedVideoService, UserService, VideoService, WatchHistoryService,
};

/// Application state handed to every endpoint.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub video_service: VideoService,
    pub comment_service: CommentService,
    pub liked_video_service: LikedVideoService,
    pub watch_history_service: WatchHistoryService,
}
