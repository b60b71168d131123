//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub username: String,

    /// Argon2 password hash
    pub password: String,

    /// NULL when the account was created without an email
    #[sea_orm(unique, nullable)]
    pub email: Option<String>,

    /// Display name shown next to comments
    #[sea_orm(nullable)]
    pub nickname: Option<String>,

    /// Avatar URL
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Profile background URL
    #[sea_orm(nullable)]
    pub background_url: Option<String>,

    /// Profile signature line
    #[sea_orm(column_type = "Text", nullable)]
    pub signature: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    /// Refreshed on every mutation
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
