//! Create video table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Video::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Video::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Video::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Video::Description).text())
                    .col(ColumnDef::new(Video::Url).text().not_null())
                    .col(ColumnDef::new(Video::ThumbnailUrl).text())
                    .col(ColumnDef::new(Video::Duration).integer().not_null())
                    .col(ColumnDef::new(Video::VideoType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Video::LikesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Video::CommentsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Video::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Video::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: video_type (for category listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_video_type")
                    .table(Video::Table)
                    .col(Video::VideoType)
                    .to_owned(),
            )
            .await?;

        // Index: likes_count (for hot listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_video_likes_count")
                    .table(Video::Table)
                    .col(Video::LikesCount)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for latest listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_video_created_at")
                    .table(Video::Table)
                    .col(Video::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Video::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Video {
    Table,
    Id,
    Title,
    Description,
    Url,
    ThumbnailUrl,
    Duration,
    VideoType,
    LikesCount,
    CommentsCount,
    CreatedAt,
    UpdatedAt,
}
