//! Liked video service.

use kidvid_common::{AppError, AppResult};
use kidvid_db::{
    entities::liked_video,
    repositories::{LikedVideoRepository, VideoRepository},
};
use sea_orm::Set;

/// Like/unlike service for business logic.
///
/// Each (user, video) pair is either liked or not; the row insert/delete and
/// the video's likes counter move together in one transaction.
#[derive(Clone)]
pub struct LikedVideoService {
    liked_repo: LikedVideoRepository,
    video_repo: VideoRepository,
}

impl LikedVideoService {
    /// Create a new liked video service.
    #[must_use]
    pub const fn new(liked_repo: LikedVideoRepository, video_repo: VideoRepository) -> Self {
        Self {
            liked_repo,
            video_repo,
        }
    }

    /// Like a video.
    pub async fn like(&self, user_id: i64, video_id: i32) -> AppResult<liked_video::Model> {
        // Check if video exists
        self.video_repo.get_by_id(video_id).await?;

        // Check if already liked
        if self
            .liked_repo
            .exists_by_user_and_video(user_id, video_id)
            .await?
        {
            return Err(AppError::Conflict("Video already liked".to_string()));
        }

        let model = liked_video::ActiveModel {
            user_id: Set(user_id),
            video_id: Set(video_id),
            liked_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        self.liked_repo.insert_with_count(model).await
    }

    /// Unlike a video.
    pub async fn unlike(&self, user_id: i64, video_id: i32) -> AppResult<()> {
        if !self
            .liked_repo
            .exists_by_user_and_video(user_id, video_id)
            .await?
        {
            return Err(AppError::Conflict("Video not liked".to_string()));
        }

        self.liked_repo.delete_with_count(user_id, video_id).await
    }

    /// Check if a user has liked a video.
    pub async fn has_liked(&self, user_id: i64, video_id: i32) -> AppResult<bool> {
        self.liked_repo
            .exists_by_user_and_video(user_id, video_id)
            .await
    }

    /// Get a user's liked videos, newest first (paginated).
    pub async fn list_liked(
        &self,
        user_id: i64,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<liked_video::Model>, u64)> {
        self.liked_repo.find_by_user_paged(user_id, page, size).await
    }
}
