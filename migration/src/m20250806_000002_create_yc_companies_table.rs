use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(YcCompanies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(YcCompanies::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // Natural key: the id assigned by the YC OSS API
                    .col(
                        ColumnDef::new(YcCompanies::YcApiId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(YcCompanies::Name).string().not_null())
                    .col(ColumnDef::new(YcCompanies::Description).string())
                    .col(ColumnDef::new(YcCompanies::Batch).string())
                    .col(ColumnDef::new(YcCompanies::Industry).string())
                    // JSON array of industry labels, stored as text
                    .col(ColumnDef::new(YcCompanies::Industries).string())
                    .col(ColumnDef::new(YcCompanies::Location).string())
                    .col(ColumnDef::new(YcCompanies::Status).string())
                    .col(ColumnDef::new(YcCompanies::WebsiteUrl).string())
                    // JSON array of URLs found in the company tags
                    .col(ColumnDef::new(YcCompanies::SocialLinks).string())
                    .col(ColumnDef::new(YcCompanies::FoundingDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(YcCompanies::CompanyUrl).string())
                    .col(
                        ColumnDef::new(YcCompanies::InsertedAtUtc)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(YcCompanies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum YcCompanies {
    Table,
    Id,
    YcApiId,
    Name,
    Description,
    Batch,
    Industry,
    Industries,
    Location,
    Status,
    WebsiteUrl,
    SocialLinks,
    FoundingDate,
    CompanyUrl,
    InsertedAtUtc,
}
