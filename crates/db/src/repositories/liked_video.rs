//! Liked video repository.

use std::sync::Arc;

use crate::entities::{LikedVideo, Video, liked_video, video};
use kidvid_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::Expr,
};

/// Liked video repository for database operations.
#[derive(Clone)]
pub struct LikedVideoRepository {
    db: Arc<DatabaseConnection>,
}

impl LikedVideoRepository {
    /// Create a new liked video repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and video.
    pub async fn find_by_user_and_video(
        &self,
        user_id: i64,
        video_id: i32,
    ) -> AppResult<Option<liked_video::Model>> {
        LikedVideo::find()
            .filter(liked_video::Column::UserId.eq(user_id))
            .filter(liked_video::Column::VideoId.eq(video_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has liked a video.
    pub async fn exists_by_user_and_video(&self, user_id: i64, video_id: i32) -> AppResult<bool> {
        Ok(self
            .find_by_user_and_video(user_id, video_id)
            .await?
            .is_some())
    }

    /// Insert a like and bump the video's likes count in one transaction.
    pub async fn insert_with_count(
        &self,
        model: liked_video::ActiveModel,
    ) -> AppResult<liked_video::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Video::update_many()
            .col_expr(
                video::Column::LikesCount,
                Expr::col(video::Column::LikesCount).add(1),
            )
            .filter(video::Column::Id.eq(created.video_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(created)
    }

    /// Delete a like and drop the video's likes count in one transaction.
    /// The count is floored at zero.
    pub async fn delete_with_count(&self, user_id: i64, video_id: i32) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        LikedVideo::delete_many()
            .filter(liked_video::Column::UserId.eq(user_id))
            .filter(liked_video::Column::VideoId.eq(video_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Video::update_many()
            .col_expr(
                video::Column::LikesCount,
                Expr::cust("GREATEST(likes_count - 1, 0)"),
            )
            .filter(video::Column::Id.eq(video_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Get a user's likes, newest first (paginated).
    pub async fn find_by_user_paged(
        &self,
        user_id: i64,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<liked_video::Model>, u64)> {
        let paginator = LikedVideo::find()
            .filter(liked_video::Column::UserId.eq(user_id))
            .order_by_desc(liked_video::Column::LikedAt)
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
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_like(id: i32, user_id: i64, video_id: i32) -> liked_video::Model {
        liked_video::Model {
            id,
            user_id,
            video_id,
            liked_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_exists_by_user_and_video_true() {
        let like = create_test_like(1, 100, 10);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .into_connection(),
        );

        let repo = LikedVideoRepository::new(db);
        assert!(repo.exists_by_user_and_video(100, 10).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_by_user_and_video_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<liked_video::Model>::new()])
                .into_connection(),
        );

        let repo = LikedVideoRepository::new(db);
        assert!(!repo.exists_by_user_and_video(100, 11).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_with_count() {
        let created = create_test_like(1, 100, 10);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = LikedVideoRepository::new(db);
        let model = liked_video::ActiveModel {
            user_id: sea_orm::Set(100),
            video_id: sea_orm::Set(10),
            liked_at: sea_orm::Set(Utc::now().into()),
            ..Default::default()
        };

        let result = repo.insert_with_count(model).await.unwrap();
        assert_eq!(result.user_id, 100);
        assert_eq!(result.video_id, 10);
    }

    #[tokio::test]
    async fn test_delete_with_count() {
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

        let repo = LikedVideoRepository::new(db);
        assert!(repo.delete_with_count(100, 10).await.is_ok());
    }
}
