//! Video repository.

use std::sync::Arc;

use crate::entities::{Video, video};
use kidvid_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, sea_query::Expr,
};

/// Video repository for database operations.
#[derive(Clone)]
pub struct VideoRepository {
    db: Arc<DatabaseConnection>,
}

impl VideoRepository {
    /// Create a new video repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a video by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<video::Model>> {
        Video::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a video by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<video::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::VideoNotFound(id.to_string()))
    }

    /// Create a new video.
    pub async fn create(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a video.
    pub async fn update(&self, model: video::ActiveModel) -> AppResult<video::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a video.
    ///
    /// Dependent comment/like/history rows are left in place; read paths
    /// tolerate the orphans.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Video::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get all videos (paginated, newest first).
    pub async fn find_all_paged(
        &self,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        self.page(
            Video::find().order_by_desc(video::Column::CreatedAt),
            page,
            size,
        )
        .await
    }

    /// Get videos of a given type (paginated, newest first).
    pub async fn find_by_type_paged(
        &self,
        video_type: video::VideoType,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        self.page(
            Video::find()
                .filter(video::Column::VideoType.eq(video_type))
                .order_by_desc(video::Column::CreatedAt),
            page,
            size,
        )
        .await
    }

    /// Search videos by title substring (paginated).
    ///
    /// Unanchored containment match; case behavior follows the store
    /// collation.
    pub async fn search_by_title_paged(
        &self,
        title: &str,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        self.page(
            Video::find()
                .filter(video::Column::Title.contains(title))
                .order_by_desc(video::Column::CreatedAt),
            page,
            size,
        )
        .await
    }

    /// Search videos by type and title substring (paginated).
    pub async fn search_by_type_and_title_paged(
        &self,
        video_type: video::VideoType,
        title: &str,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        self.page(
            Video::find()
                .filter(video::Column::VideoType.eq(video_type))
                .filter(video::Column::Title.contains(title))
                .order_by_desc(video::Column::CreatedAt),
            page,
            size,
        )
        .await
    }

    /// Get hot videos, most liked first (paginated, optional type filter).
    pub async fn find_hot_paged(
        &self,
        video_type: Option<video::VideoType>,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        let mut query = Video::find();
        if let Some(t) = video_type {
            query = query.filter(video::Column::VideoType.eq(t));
        }
        self.page(query.order_by_desc(video::Column::LikesCount), page, size)
            .await
    }

    /// Get latest videos, newest first (paginated, optional type filter).
    pub async fn find_latest_paged(
        &self,
        video_type: Option<video::VideoType>,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        let mut query = Video::find();
        if let Some(t) = video_type {
            query = query.filter(video::Column::VideoType.eq(t));
        }
        self.page(query.order_by_desc(video::Column::CreatedAt), page, size)
            .await
    }

    /// Increment likes count atomically (single UPDATE query, no fetch).
    ///
    /// Affects zero rows when the video is absent.
    pub async fn increment_likes_count(&self, video_id: i32) -> AppResult<()> {
        Video::update_many()
            .col_expr(
                video::Column::LikesCount,
                Expr::col(video::Column::LikesCount).add(1),
            )
            .filter(video::Column::Id.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement likes count atomically, floored at zero.
    pub async fn decrement_likes_count(&self, video_id: i32) -> AppResult<()> {
        Video::update_many()
            .col_expr(
                video::Column::LikesCount,
                Expr::cust("GREATEST(likes_count - 1, 0)"),
            )
            .filter(video::Column::Id.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment comments count atomically (single UPDATE query, no fetch).
    pub async fn increment_comments_count(&self, video_id: i32) -> AppResult<()> {
        Video::update_many()
            .col_expr(
                video::Column::CommentsCount,
                Expr::col(video::Column::CommentsCount).add(1),
            )
            .filter(video::Column::Id.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement comments count atomically, floored at zero.
    pub async fn decrement_comments_count(&self, video_id: i32) -> AppResult<()> {
        Video::update_many()
            .col_expr(
                video::Column::CommentsCount,
                Expr::cust("GREATEST(comments_count - 1, 0)"),
            )
            .filter(video::Column::Id.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Run a query through the paginator, returning the page and the total
    /// row count.
    async fn page(
        &self,
        query: Select<Video>,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<video::Model>, u64)> {
        let paginator = query.paginate(self.db.as_ref(), size.max(1));
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
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn create_test_video(id: i32, title: &str) -> video::Model {
        video::Model {
            id,
            title: title.to_string(),
            description: Some("A test video".to_string()),
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

    #[tokio::test]
    async fn test_find_by_id_found() {
        let video = create_test_video(1, "Counting with Apples");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video.clone()]])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        let result = repo.find_by_id(1).await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().title, "Counting with Apples");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        let result = repo.get_by_id(42).await;

        match result {
            Err(AppError::VideoNotFound(id)) => assert_eq!(id, "42"),
            _ => panic!("Expected VideoNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_all_paged() {
        let v1 = create_test_video(1, "Shapes");
        let v2 = create_test_video(2, "Colors");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    btreemap! { "num_items" => Into::<Value>::into(2i64) },
                ]])
                .append_query_results([[v1, v2]])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        let (items, total) = repo.find_all_paged(0, 10).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_search_by_title_paged() {
        let v1 = create_test_video(1, "Learning Shapes");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    btreemap! { "num_items" => Into::<Value>::into(1i64) },
                ]])
                .append_query_results([[v1]])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        let (items, total) = repo.search_by_title_paged("Shapes", 0, 10).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_increment_likes_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        assert!(repo.increment_likes_count(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_decrement_likes_count_absent_video_is_noop() {
        // Zero affected rows is not an error
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = VideoRepository::new(db);
        assert!(repo.decrement_likes_count(999).await.is_ok());
    }
}
