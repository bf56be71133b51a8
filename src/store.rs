use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};
use tracing::debug;

use crate::entities::{news, yc_company};
use crate::normalize::NewsRecord;

/// Outcome of a news batch write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NewsWriteOutcome {
    pub inserted: u64,
    pub skipped: u64,
}

/// Outcome of a company batch write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompanyWriteOutcome {
    pub inserted: u64,
    pub updated: u64,
}

/// Insert news records, ignoring any whose link is already stored. The first
/// stored row for a link wins; later fetches of the same article never
/// overwrite it.
pub async fn insert_news(
    db: &DatabaseConnection,
    records: &[NewsRecord],
) -> Result<NewsWriteOutcome, DbErr> {
    let mut outcome = NewsWriteOutcome::default();

    for record in records {
        let model = news::ActiveModel {
            title: Set(record.title.clone()),
            link: Set(record.link.clone()),
            published_utc: Set(record.published_utc),
            source: Set(record.source.clone()),
            company: Set(record.company.clone()),
            amount_value: Set(record.amount_value),
            amount_currency: Set(record.amount_currency.clone()),
            stage: Set(record.stage.clone()),
            inserted_at_utc: Set(record.inserted_at_utc),
            ..Default::default()
        };

        let insert = news::Entity::insert(model)
            .on_conflict(
                OnConflict::column(news::Column::Link)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(db)
            .await;

        match insert {
            Ok(_) => outcome.inserted += 1,
            Err(DbErr::RecordNotInserted) => {
                debug!(link = %record.link, "news item already stored");
                outcome.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(outcome)
}

/// Upsert companies on their YC API id. Existing rows get every descriptive
/// column replaced with the fresh values; `inserted_at_utc` keeps the value
/// from the first ingest.
pub async fn upsert_companies(
    db: &DatabaseConnection,
    models: Vec<yc_company::ActiveModel>,
) -> Result<CompanyWriteOutcome, DbErr> {
    let total = models.len() as u64;
    let before = yc_company::Entity::find().count(db).await?;

    for model in models {
        yc_company::Entity::insert(model)
            .on_conflict(
                OnConflict::column(yc_company::Column::YcApiId)
                    .update_columns([
                        yc_company::Column::Name,
                        yc_company::Column::Description,
                        yc_company::Column::Batch,
                        yc_company::Column::Industry,
                        yc_company::Column::Industries,
                        yc_company::Column::Location,
                        yc_company::Column::Status,
                        yc_company::Column::WebsiteUrl,
                        yc_company::Column::SocialLinks,
                        yc_company::Column::FoundingDate,
                        yc_company::Column::CompanyUrl,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    let after = yc_company::Entity::find().count(db).await?;
    let inserted = after.saturating_sub(before);
    Ok(CompanyWriteOutcome {
        inserted,
        updated: total.saturating_sub(inserted),
    })
}
