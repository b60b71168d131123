//! Comment service.

use kidvid_common::AppResult;
use kidvid_db::{
    entities::{comment, user},
    repositories::{CommentRepository, UserRepository, VideoRepository},
};
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Placeholder shown when a comment's author no longer exists.
const UNKNOWN_USER_NICKNAME: &str = "unknown user";

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    user_repo: UserRepository,
    video_repo: VideoRepository,
}

/// Input for posting a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub video_id: i32,

    pub user_id: i64,

    #[validate(length(min = 1))]
    pub content: String,
}

/// A comment joined with its author's display fields.
///
/// The author lookup is tolerant: a deleted account yields placeholder
/// values instead of an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i32,
    pub video_id: i32,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub user_nickname: String,
    pub user_avatar_url: String,
}

impl CommentView {
    fn new(comment: comment::Model, author: Option<&user::Model>) -> Self {
        let (nickname, avatar_url) = match author {
            Some(user) => (
                user.nickname.clone().unwrap_or_else(|| user.username.clone()),
                user.avatar_url.clone().unwrap_or_default(),
            ),
            None => (UNKNOWN_USER_NICKNAME.to_string(), String::new()),
        };

        Self {
            id: comment.id,
            video_id: comment.video_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: comment.created_at,
            user_nickname: nickname,
            user_avatar_url: avatar_url,
        }
    }
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        user_repo: UserRepository,
        video_repo: VideoRepository,
    ) -> Self {
        Self {
            comment_repo,
            user_repo,
            video_repo,
        }
    }

    /// Post a comment on a video.
    ///
    /// The comment row and the video's comments counter move together in one
    /// transaction.
    pub async fn create(&self, input: CreateCommentInput) -> AppResult<comment::Model> {
        input.validate()?;

        // Check if video exists
        self.video_repo.get_by_id(input.video_id).await?;

        let model = comment::ActiveModel {
            video_id: Set(input.video_id),
            user_id: Set(input.user_id),
            content: Set(input.content),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        self.comment_repo.insert_with_count(model).await
    }

    /// Get a comment by ID.
    pub async fn get(&self, id: i32) -> AppResult<comment::Model> {
        self.comment_repo.get_by_id(id).await
    }

    /// Update a comment's content. Other fields are immutable after creation.
    pub async fn update(&self, id: i32, content: String) -> AppResult<comment::Model> {
        let comment = self.comment_repo.get_by_id(id).await?;
        let mut active: comment::ActiveModel = comment.into();
        active.content = Set(content);

        self.comment_repo.update(active).await
    }

    /// Delete a comment, dropping the owning video's comment count with it.
    /// No-op when the comment does not exist.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let Some(comment) = self.comment_repo.find_by_id(id).await? else {
            return Ok(());
        };

        self.comment_repo
            .delete_with_count(comment.id, comment.video_id)
            .await
    }

    /// Get a video's comments, newest first, enriched with author fields.
    pub async fn list_for_video(&self, video_id: i32) -> AppResult<Vec<CommentView>> {
        let comments = self.comment_repo.find_by_video(video_id).await?;
        self.enrich_all(comments).await
    }

    /// Get a video's comments, newest first, enriched (paginated).
    pub async fn list_for_video_paged(
        &self,
        video_id: i32,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<CommentView>, u64)> {
        let (comments, total) = self
            .comment_repo
            .find_by_video_paged(video_id, page, size)
            .await?;
        Ok((self.enrich_all(comments).await?, total))
    }

    /// Get the raw comments authored by a user.
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_by_user(user_id).await
    }

    /// Count comments on a video from the comment rows themselves,
    /// independently of the video's denormalized counter.
    pub async fn count_for_video(&self, video_id: i32) -> AppResult<u64> {
        self.comment_repo.count_by_video(video_id).await
    }

    async fn enrich_all(&self, comments: Vec<comment::Model>) -> AppResult<Vec<CommentView>> {
        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            let author = self.user_repo.find_by_id(comment.user_id).await?;
            views.push(CommentView::new(comment, author.as_ref()));
        }
        Ok(views)
    }
}
