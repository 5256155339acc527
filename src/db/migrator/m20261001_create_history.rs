use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Searches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Searches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Searches::Query).string().not_null())
                    .col(ColumnDef::new(Searches::ResultsJson).text().not_null())
                    .col(ColumnDef::new(Searches::Timestamp).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Metadata::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Metadata::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Metadata::VideoId).string().not_null())
                    .col(ColumnDef::new(Metadata::Url).string().not_null())
                    .col(ColumnDef::new(Metadata::Title).string().not_null())
                    .col(ColumnDef::new(Metadata::Duration).double().not_null())
                    .col(ColumnDef::new(Metadata::Thumbnail).string().not_null())
                    .col(ColumnDef::new(Metadata::AuthorName).string().not_null())
                    .col(ColumnDef::new(Metadata::Timestamp).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Conversions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Conversions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Conversions::VideoId).string().not_null())
                    .col(ColumnDef::new(Conversions::Title).string().not_null())
                    .col(ColumnDef::new(Conversions::Format).string().not_null())
                    .col(ColumnDef::new(Conversions::Quality).string().not_null())
                    .col(ColumnDef::new(Conversions::Timestamp).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Lookup by natural key and by recency; none of them unique.
        manager
            .create_index(
                Index::create()
                    .name("idx_searches_query")
                    .table(Searches::Table)
                    .col(Searches::Query)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_searches_timestamp")
                    .table(Searches::Table)
                    .col(Searches::Timestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_metadata_video_id")
                    .table(Metadata::Table)
                    .col(Metadata::VideoId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_metadata_timestamp")
                    .table(Metadata::Table)
                    .col(Metadata::Timestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_conversions_video_id")
                    .table(Conversions::Table)
                    .col(Conversions::VideoId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_conversions_timestamp")
                    .table(Conversions::Table)
                    .col(Conversions::Timestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Conversions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Metadata::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Searches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Searches {
    Table,
    Id,
    Query,
    ResultsJson,
    Timestamp,
}

#[derive(DeriveIden)]
enum Metadata {
    Table,
    Id,
    VideoId,
    Url,
    Title,
    Duration,
    Thumbnail,
    AuthorName,
    Timestamp,
}

#[derive(DeriveIden)]
enum Conversions {
    Table,
    Id,
    VideoId,
    Title,
    Format,
    Quality,
    Timestamp,
}
