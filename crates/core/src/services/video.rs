//! Video catalog service.

use kidvid_common::AppResult;
use kidvid_db::{entities::video, repositories::VideoRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Video catalog service for business logic.
#[derive(Clone)]
pub struct VideoService {
    video_repo: VideoRepository,
}

/// Input for uploading a new video.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    pub description: Option<String>,

    #[validate(url)]
    pub url: String,

    pub thumbnail_url: Option<String>,

    /// Duration in seconds.
    #[validate(range(min = 0))]
    pub duration: i32,

    pub video_type: video::VideoType,
}

/// Input for updating a video. Every field is overwritten; counters and
/// timestamps are not caller-controlled.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    pub description: Option<String>,

    #[validate(url)]
    pub url: String,

    pub thumbnail_url: Option<String>,

    #[validate(range(min = 0))]
    pub duration: i32,

    pub video_type: video::VideoType,
}

impl VideoService {
    /// Create a new video service.
    #[must_use]
    pub const fn new(video_repo: VideoRepository) -> Self {
        Self { video_repo }
    }

    /// Upload a video. Counters start at zero.
    pub async fn create(&self, input: CreateVideoInput) -> AppResult<video::Model> {
        input.validate()?;

        let now = chrono::Utc::now();
        let model = video::ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            url: Set(input.url),
            thumbnail_url: Set(input.thumbnail_url),
            duration: Set(input.duration),
            video_type: Set(input.video_type),
            likes_count: Set(0),
            comments_count: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        self.video_repo.create(model).await
    }

    /// Get a video by ID.
    pub async fn get(&self, id: i32) -> AppResult<video::Model> {
        self.video_repo.get_by_id(id).await
    }

    /// List all videos (paginated, newest first).
    pub async fn list_all(&self, page: u64, size: u64) -> AppResult<(Vec<video::Model>, u64)> {
        self.video_repo.find_all_paged(page, size).await
    }

    /// List videos of a given type (paginated).
    pub async fn list_by_type(
        &self,
        video_type: video::VideoType,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        self.video_repo
            .find_by_type_paged(video_type, page, size)
            .await
    }

    /// Search videos by title substring (paginated).
    pub async fn search_by_title(
        &self,
        title: &str,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        self.video_repo.search_by_title_paged(title, page, size).await
    }

    /// Search videos by type and title substring (paginated).
    pub async fn search_by_type_and_title(
        &self,
        video_type: video::VideoType,
        title: &str,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        self.video_repo
            .search_by_type_and_title_paged(video_type, title, page, size)
            .await
    }

    /// List hot videos, most liked first (paginated, optional type filter).
    pub async fn list_hot(
        &self,
        video_type: Option<video::VideoType>,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        self.video_repo.find_hot_paged(video_type, page, size).await
    }

    /// List latest videos, newest first (paginated, optional type filter).
    pub async fn list_latest(
        &self,
        video_type: Option<video::VideoType>,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        self.video_repo
            .find_latest_paged(video_type, page, size)
            .await
    }

    /// Update a video, overwriting every caller-editable field.
    pub async fn update(&self, id: i32, input: UpdateVideoInput) -> AppResult<video::Model> {
        input.validate()?;

        let video = self.video_repo.get_by_id(id).await?;
        let mut active: video::ActiveModel = video.into();

        active.title = Set(input.title);
        active.description = Set(input.description);
        active.url = Set(input.url);
        active.thumbnail_url = Set(input.thumbnail_url);
        active.duration = Set(input.duration);
        active.video_type = Set(input.video_type);
        active.updated_at = Set(chrono::Utc::now().into());

        self.video_repo.update(active).await
    }

    /// Delete a video.
    ///
    /// Comments, likes and watch history referencing the video are left in
    /// place; their read paths tolerate the missing video.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.video_repo.get_by_id(id).await?;
        self.video_repo.delete(id).await
    }

    /// Increment a video's likes count. No-op when the video is absent.
    pub async fn increment_likes(&self, id: i32) -> AppResult<()> {
        self.video_repo.increment_likes_count(id).await
    }

    /// Decrement a video's likes count, floored at zero.
    pub async fn decrement_likes(&self, id: i32) -> AppResult<()> {
        self.video_repo.decrement_likes_count(id).await
    }

    /// Increment a video's comments count. No-op when the video is absent.
    pub async fn increment_comments(&self, id: i32) -> AppResult<()> {
        self.video_repo.increment_comments_count(id).await
    }

    /// Decrement a video's comments count, floored at zero.
    pub async fn decrement_comments(&self, id: i32) -> AppResult<()> {
        self.video_repo.decrement_comments_count(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kidvid_common::AppError;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_video(id: i32, title: &str, likes: i32) -> video::Model {
        video::Model {
            id,
            title: title.to_string(),
            description: None,
            url: "https://example.com/v.mp4".to_string(),
            thumbnail_url: None,
            duration: 300,
            video_type: video::VideoType::Entertainment,
            likes_count: likes,
            comments_count: 0,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_create_video_input_validation() {
        // Empty title
        let input = CreateVideoInput {
            title: String::new(),
            description: None,
            url: "https://example.com/v.mp4".to_string(),
            thumbnail_url: None,
            duration: 120,
            video_type: video::VideoType::Learning,
        };
        assert!(input.validate().is_err());

        // Not a URL
        let input = CreateVideoInput {
            title: "Shapes".to_string(),
            description: None,
            url: "not a url".to_string(),
            thumbnail_url: None,
            duration: 120,
            video_type: video::VideoType::Learning,
        };
        assert!(input.validate().is_err());

        // Negative duration
        let input = CreateVideoInput {
            title: "Shapes".to_string(),
            description: None,
            url: "https://example.com/v.mp4".to_string(),
            thumbnail_url: None,
            duration: -1,
            video_type: video::VideoType::Learning,
        };
        assert!(input.validate().is_err());

        // Valid
        let input = CreateVideoInput {
            title: "Shapes".to_string(),
            description: Some("Learn shapes".to_string()),
            url: "https://example.com/v.mp4".to_string(),
            thumbnail_url: None,
            duration: 120,
            video_type: video::VideoType::Learning,
        };
        assert!(input.validate().is_ok());
    }

    #[tokio::test]
    async fn test_get_video_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
        );

        let service = VideoService::new(VideoRepository::new(db));

        let result = service.get(7).await;
        match result {
            Err(AppError::VideoNotFound(id)) => assert_eq!(id, "7"),
            _ => panic!("Expected VideoNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_delete_video_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
        );

        let service = VideoService::new(VideoRepository::new(db));

        let result = service.delete(7).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_counter_ops_pass_through() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let service = VideoService::new(VideoRepository::new(db));

        assert!(service.increment_likes(1).await.is_ok());
        assert!(service.decrement_comments(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_hot() {
        use maplit::btreemap;
        use sea_orm::Value;

        let v1 = create_test_video(1, "Popular", 50);
        let v2 = create_test_video(2, "Less popular", 3);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    btreemap! { "num_items" => Into::<Value>::into(2i64) },
                ]])
                .append_query_results([[v1, v2]])
                .into_connection(),
        );

        let service = VideoService::new(VideoRepository::new(db));

        let (items, total) = service.list_hot(None, 0, 10).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(total, 2);
        assert_eq!(items[0].likes_count, 50);
    }
}
