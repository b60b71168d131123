//! Watch history service.

use chrono::Duration;
use kidvid_common::{AppError, AppResult};
use kidvid_db::{
    entities::{video, watch_history},
    repositories::{VideoRepository, WatchHistoryRepository},
};
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How far back `list_recent_for_user` looks.
const RECENT_WINDOW_DAYS: i64 = 7;

/// Watch history service for business logic.
///
/// Writes are upserts keyed by (user, video): a second watch event for the
/// same pair updates the existing row in place instead of inserting another.
#[derive(Clone)]
pub struct WatchHistoryService {
    watch_repo: WatchHistoryRepository,
    video_repo: VideoRepository,
}

/// Input for recording a watch event or progress ping.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordWatchInput {
    pub user_id: i64,

    pub video_id: i32,

    /// Playback position in seconds.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub progress: i32,
}

/// A watch history row joined with a snapshot of the video's display fields.
///
/// The video lookup is best-effort: a deleted video leaves the fields absent
/// instead of failing the listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryView {
    pub id: i32,
    pub user_id: i64,
    pub video_id: i32,
    pub watched_at: DateTimeWithTimeZone,
    pub progress: i32,
    pub video_title: Option<String>,
    pub video_description: Option<String>,
    pub video_thumbnail_url: Option<String>,
    pub video_duration: Option<i32>,
    pub video_type: Option<video::VideoType>,
}

impl WatchHistoryView {
    fn new(history: watch_history::Model, video: Option<video::Model>) -> Self {
        let (title, description, thumbnail_url, duration, video_type) = match video {
            Some(v) => (
                Some(v.title),
                v.description,
                v.thumbnail_url,
                Some(v.duration),
                Some(v.video_type),
            ),
            None => (None, None, None, None, None),
        };

        Self {
            id: history.id,
            user_id: history.user_id,
            video_id: history.video_id,
            watched_at: history.watched_at,
            progress: history.progress,
            video_title: title,
            video_description: description,
            video_thumbnail_url: thumbnail_url,
            video_duration: duration,
            video_type,
        }
    }
}

impl WatchHistoryService {
    /// Create a new watch history service.
    #[must_use]
    pub const fn new(watch_repo: WatchHistoryRepository, video_repo: VideoRepository) -> Self {
        Self {
            watch_repo,
            video_repo,
        }
    }

    /// Record a watch event. Upserts by (user, video).
    pub async fn record(&self, input: RecordWatchInput) -> AppResult<watch_history::Model> {
        input.validate()?;

        // Check if video exists
        self.video_repo.get_by_id(input.video_id).await?;

        self.upsert(input.user_id, input.video_id, input.progress)
            .await
    }

    /// Update playback progress. Produces the same end state as [`record`]
    /// for the same inputs.
    ///
    /// [`record`]: Self::record
    pub async fn update_progress(
        &self,
        user_id: i64,
        video_id: i32,
        progress: i32,
    ) -> AppResult<watch_history::Model> {
        if progress < 0 {
            return Err(AppError::Validation(
                "progress must not be negative".to_string(),
            ));
        }

        // Check if video exists
        self.video_repo.get_by_id(video_id).await?;

        self.upsert(user_id, video_id, progress).await
    }

    /// Get the saved progress for a user/video pair, defaulting to zero when
    /// no history row exists.
    pub async fn get_progress(&self, user_id: i64, video_id: i32) -> AppResult<i32> {
        Ok(self
            .watch_repo
            .find_by_user_and_video(user_id, video_id)
            .await?
            .map_or(0, |h| h.progress))
    }

    /// Get a history row by ID.
    pub async fn get(&self, id: i32) -> AppResult<watch_history::Model> {
        self.watch_repo.get_by_id(id).await
    }

    /// Get a user's history, most recently watched first, enriched with
    /// video display fields.
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<WatchHistoryView>> {
        let rows = self.watch_repo.find_by_user(user_id).await?;
        self.enrich_all(rows).await
    }

    /// Get a user's history, enriched (paginated).
    pub async fn list_for_user_paged(
        &self,
        user_id: i64,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<WatchHistoryView>, u64)> {
        let (rows, total) = self
            .watch_repo
            .find_by_user_paged(user_id, page, size)
            .await?;
        Ok((self.enrich_all(rows).await?, total))
    }

    /// Get a user's history from the trailing seven days, newest first,
    /// enriched with video display fields.
    pub async fn list_recent_for_user(&self, user_id: i64) -> AppResult<Vec<WatchHistoryView>> {
        let since = chrono::Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        let rows = self
            .watch_repo
            .find_recent_by_user(user_id, since.into())
            .await?;
        self.enrich_all(rows).await
    }

    /// Check if a user has watched a video.
    pub async fn has_watched(&self, user_id: i64, video_id: i32) -> AppResult<bool> {
        Ok(self
            .watch_repo
            .find_by_user_and_video(user_id, video_id)
            .await?
            .is_some())
    }

    /// Delete a history row.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.watch_repo.get_by_id(id).await?;
        self.watch_repo.delete(id).await
    }

    /// Delete the history row for a user/video pair.
    pub async fn delete_for_user_video(&self, user_id: i64, video_id: i32) -> AppResult<()> {
        if !self.has_watched(user_id, video_id).await? {
            return Err(AppError::WatchHistoryNotFound(format!(
                "user {user_id} has no history for video {video_id}"
            )));
        }

        self.watch_repo
            .delete_by_user_and_video(user_id, video_id)
            .await
    }

    /// Count the distinct videos a user has watched.
    pub async fn count_distinct_videos_for_user(&self, user_id: i64) -> AppResult<u64> {
        self.watch_repo.count_distinct_videos(user_id).await
    }

    /// Lookup-then-branch upsert: update the existing row's progress and
    /// watch time, or insert a fresh row.
    async fn upsert(
        &self,
        user_id: i64,
        video_id: i32,
        progress: i32,
    ) -> AppResult<watch_history::Model> {
        let now = chrono::Utc::now();

        match self
            .watch_repo
            .find_by_user_and_video(user_id, video_id)
            .await?
        {
            Some(existing) => {
                let mut active: watch_history::ActiveModel = existing.into();
                active.progress = Set(progress);
                active.watched_at = Set(now.into());
                self.watch_repo.update(active).await
            }
            None => {
                let model = watch_history::ActiveModel {
                    user_id: Set(user_id),
                    video_id: Set(video_id),
                    watched_at: Set(now.into()),
                    progress: Set(progress),
                    ..Default::default()
                };
                self.watch_repo.create(model).await
            }
        }
    }

    async fn enrich_all(
        &self,
        rows: Vec<watch_history::Model>,
    ) -> AppResult<Vec<WatchHistoryView>> {
        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let video = self.video_repo.find_by_id(row.video_id).await?;
            views.push(WatchHistoryView::new(row, video));
        }
        Ok(views)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_video(id: i32, title: &str) -> video::Model {
        video::Model {
            id,
            title: title.to_string(),
            description: Some("desc".to_string()),
            url: "https://example.com/v.mp4".to_string(),
            thumbnail_url: Some("https://example.com/t.png".to_string()),
            duration: 120,
            video_type: video::VideoType::Learning,
            likes_count: 0,
            comments_count: 0,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_history(id: i32, user_id: i64, video_id: i32, progress: i32) -> watch_history::Model {
        watch_history::Model {
            id,
            user_id,
            video_id,
            watched_at: Utc::now().into(),
            progress,
        }
    }

    fn service(
        watch_db: Arc<sea_orm::DatabaseConnection>,
        video_db: Arc<sea_orm::DatabaseConnection>,
    ) -> WatchHistoryService {
        WatchHistoryService::new(
            WatchHistoryRepository::new(watch_db),
            VideoRepository::new(video_db),
        )
    }

    #[tokio::test]
    async fn test_record_video_not_found() {
        let watch_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let video_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
        );

        let service = service(watch_db, video_db);

        let input = RecordWatchInput {
            user_id: 100,
            video_id: 999,
            progress: 30,
        };

        let result = service.record(input).await;
        match result {
            Err(AppError::VideoNotFound(id)) => assert_eq!(id, "999"),
            _ => panic!("Expected VideoNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_record_inserts_when_absent() {
        let video = create_test_video(10, "Shapes");
        let created = create_test_history(1, 100, 10, 30);

        let watch_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<watch_history::Model>::new()])
                .append_query_results([[created]])
                .into_connection(),
        );
        let video_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video]])
                .into_connection(),
        );

        let service = service(watch_db, video_db);

        let input = RecordWatchInput {
            user_id: 100,
            video_id: 10,
            progress: 30,
        };

        let result = service.record(input).await.unwrap();
        assert_eq!(result.progress, 30);
    }

    #[tokio::test]
    async fn test_record_updates_existing_row() {
        let video = create_test_video(10, "Shapes");
        let existing = create_test_history(1, 100, 10, 30);
        let updated = create_test_history(1, 100, 10, 90);

        let watch_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_query_results([[updated]])
                .into_connection(),
        );
        let video_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video]])
                .into_connection(),
        );

        let service = service(watch_db, video_db);

        let input = RecordWatchInput {
            user_id: 100,
            video_id: 10,
            progress: 90,
        };

        // Same row id: the second write went through an update, not an insert
        let result = service.record(input).await.unwrap();
        assert_eq!(result.id, 1);
        assert_eq!(result.progress, 90);
    }

    #[tokio::test]
    async fn test_get_progress_defaults_to_zero() {
        let watch_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<watch_history::Model>::new()])
                .into_connection(),
        );
        let video_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service(watch_db, video_db);

        let progress = service.get_progress(100, 10).await.unwrap();
        assert_eq!(progress, 0);
    }

    #[tokio::test]
    async fn test_update_progress_rejects_negative() {
        let watch_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let video_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service(watch_db, video_db);

        let result = service.update_progress(100, 10, -5).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_for_user_enriches_video() {
        let history = create_test_history(1, 100, 10, 45);
        let video = create_test_video(10, "Shapes");

        let watch_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[history]])
                .into_connection(),
        );
        let video_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video]])
                .into_connection(),
        );

        let service = service(watch_db, video_db);

        let views = service.list_for_user(100).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].video_title.as_deref(), Some("Shapes"));
        assert_eq!(views[0].video_duration, Some(120));
    }

    #[tokio::test]
    async fn test_list_for_user_tolerates_deleted_video() {
        let history = create_test_history(1, 100, 10, 45);

        let watch_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[history]])
                .into_connection(),
        );
        let video_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
        );

        let service = service(watch_db, video_db);

        let views = service.list_for_user(100).await.unwrap();
        assert_eq!(views.len(), 1);
        assert!(views[0].video_title.is_none());
        assert!(views[0].video_type.is_none());
    }

    #[tokio::test]
    async fn test_delete_for_user_video_not_found() {
        let watch_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<watch_history::Model>::new()])
                .into_connection(),
        );
        let video_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service(watch_db, video_db);

        let result = service.delete_for_user_video(100, 10).await;
        assert!(matches!(result, Err(AppError::WatchHistoryNotFound(_))));
    }
}
