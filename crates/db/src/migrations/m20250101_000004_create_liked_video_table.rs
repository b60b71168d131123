//! Create liked video table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LikedVideo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LikedVideo::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LikedVideo::UserId).big_integer().not_null())
                    .col(ColumnDef::new(LikedVideo::VideoId).integer().not_null())
                    .col(
                        ColumnDef::new(LikedVideo::LikedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, video_id) - one like per user per video,
        // closing the concurrent double-like race
        manager
            .create_index(
                Index::create()
                    .name("idx_liked_video_user_video")
                    .table(LikedVideo::Table)
                    .col(LikedVideo::UserId)
                    .col(LikedVideo::VideoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's likes)
        manager
            .create_index(
                Index::create()
                    .name("idx_liked_video_user_id")
                    .table(LikedVideo::Table)
                    .col(LikedVideo::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LikedVideo::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LikedVideo {
    Table,
    Id,
    UserId,
    VideoId,
    LikedAt,
}
