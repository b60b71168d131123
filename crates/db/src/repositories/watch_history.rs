//! Watch history repository.

use std::sync::Arc;

use crate::entities::{WatchHistory, watch_history};
use kidvid_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, prelude::DateTimeWithTimeZone,
};

/// Watch history repository for database operations.
#[derive(Clone)]
pub struct WatchHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl WatchHistoryRepository {
    /// Create a new watch history repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a history row by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<watch_history::Model>> {
        WatchHistory::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a history row by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<watch_history::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::WatchHistoryNotFound(id.to_string()))
    }

    /// Find the history row for a user/video pair.
    pub async fn find_by_user_and_video(
        &self,
        user_id: i64,
        video_id: i32,
    ) -> AppResult<Option<watch_history::Model>> {
        WatchHistory::find()
            .filter(watch_history::Column::UserId.eq(user_id))
            .filter(watch_history::Column::VideoId.eq(video_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new history row.
    pub async fn create(&self, model: watch_history::ActiveModel) -> AppResult<watch_history::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an existing history row.
    pub async fn update(&self, model: watch_history::ActiveModel) -> AppResult<watch_history::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's history, most recently watched first.
    pub async fn find_by_user(&self, user_id: i64) -> AppResult<Vec<watch_history::Model>> {
        WatchHistory::find()
            .filter(watch_history::Column::UserId.eq(user_id))
            .order_by_desc(watch_history::Column::WatchedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's history, most recently watched first (paginated).
    pub async fn find_by_user_paged(
        &self,
        user_id: i64,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<watch_history::Model>, u64)> {
        let paginator = WatchHistory::find()
            .filter(watch_history::Column::UserId.eq(user_id))
            .order_by_desc(watch_history::Column::WatchedAt)
            .paginate(self.db.as_ref(), size.max(1));

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let items = paginator
            .fetch_page(page)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok((items, total))
    }

    /// Get a user's history rows watched after the cutoff, newest first.
    pub async fn find_recent_by_user(
        &self,
        user_id: i64,
        since: DateTimeWithTimeZone,
    ) -> AppResult<Vec<watch_history::Model>> {
        WatchHistory::find()
            .filter(watch_history::Column::UserId.eq(user_id))
            .filter(watch_history::Column::WatchedAt.gt(since))
            .order_by_desc(watch_history::Column::WatchedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a history row.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        WatchHistory::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete the history row for a user/video pair.
    pub async fn delete_by_user_and_video(&self, user_id: i64, video_id: i32) -> AppResult<()> {
        WatchHistory::delete_many()
            .filter(watch_history::Column::UserId.eq(user_id))
            .filter(watch_history::Column::VideoId.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count the distinct videos a user has watched.
    pub async fn count_distinct_videos(&self, user_id: i64) -> AppResult<u64> {
        WatchHistory::find()
            .select_only()
            .column(watch_history::Column::VideoId)
            .distinct()
            .filter(watch_history::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_history(id: i32, user_id: i64, video_id: i32, progress: i32) -> watch_history::Model {
        watch_history::Model {
            id,
            user_id,
            video_id,
            watched_at: Utc::now().into(),
            progress,
        }
    }

    #[tokio::test]
    async fn test_find_by_user_and_video_found() {
        let history = create_test_history(1, 100, 10, 30);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[history]])
                .into_connection(),
        );

        let repo = WatchHistoryRepository::new(db);
        let result = repo.find_by_user_and_video(100, 10).await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().progress, 30);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<watch_history::Model>::new()])
                .into_connection(),
        );

        let repo = WatchHistoryRepository::new(db);
        let result = repo.get_by_id(3).await;

        match result {
            Err(AppError::WatchHistoryNotFound(id)) => assert_eq!(id, "3"),
            _ => panic!("Expected WatchHistoryNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let h1 = create_test_history(2, 100, 11, 90);
        let h2 = create_test_history(1, 100, 10, 30);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[h1, h2]])
                .into_connection(),
        );

        let repo = WatchHistoryRepository::new(db);
        let result = repo.find_by_user(100).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_by_user_and_video() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = WatchHistoryRepository::new(db);
        assert!(repo.delete_by_user_and_video(100, 10).await.is_ok());
    }
}
