//! Video entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Video catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    #[sea_orm(string_value = "learning")]
    Learning,
    #[sea_orm(string_value = "entertainment")]
    Entertainment,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Playback URL
    #[sea_orm(column_type = "Text")]
    pub url: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub thumbnail_url: Option<String>,

    /// Duration in seconds
    pub duration: i32,

    pub video_type: VideoType,

    /// Likes count (denormalized, maintained by the like service)
    #[sea_orm(default_value = 0)]
    pub likes_count: i32,

    /// Comments count (denormalized, maintained by the comment service)
    #[sea_orm(default_value = 0)]
    pub comments_count: i32,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::liked_video::Entity")]
    LikedVideos,

    #[sea_orm(has_many = "super::watch_history::Entity")]
    WatchHistories,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::liked_video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LikedVideos.def()
    }
}

impl Related<super::watch_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WatchHistories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
