use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(News::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(News::Title).string().not_null())
                    // Natural key: one row per article URL
                    .col(ColumnDef::new(News::Link).string().not_null().unique_key())
                    .col(ColumnDef::new(News::PublishedUtc).timestamp_with_time_zone())
                    .col(ColumnDef::new(News::Source).string().not_null())
                    .col(ColumnDef::new(News::Company).string())
                    .col(ColumnDef::new(News::AmountValue).double())
                    .col(ColumnDef::new(News::AmountCurrency).string())
                    .col(ColumnDef::new(News::Stage).string())
                    .col(
                        ColumnDef::new(News::InsertedAtUtc)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(News::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum News {
    Table,
    Id,
    Title,
    Link,
    PublishedUtc,
    Source,
    Company,
    AmountValue,
    AmountCurrency,
    Stage,
    InsertedAtUtc,
}
