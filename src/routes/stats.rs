use std::collections::BTreeMap;

use axum::{extract::State, Json};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QuerySelect,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{news, yc_company};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct NewsStats {
    /// Total stored news items
    pub total: u64,
    /// Item count per feed source
    pub by_source: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct YcStats {
    /// Total stored companies
    pub total: u64,
    pub by_batch: BTreeMap<String, i64>,
    pub by_industry: BTreeMap<String, i64>,
    pub by_status: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub news: NewsStats,
    pub yc: YcStats,
}

#[derive(Debug, FromQueryResult)]
struct GroupCount {
    key: String,
    count: i64,
}

/// Aggregate counts over everything stored
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Totals and per-group counts for both tables", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let db = &state.db;

    let news_total = news::Entity::find().count(db).await?;
    let by_source = group_counts::<news::Entity, _>(db, news::Column::Source).await?;

    let yc_total = yc_company::Entity::find().count(db).await?;
    let by_batch = group_counts::<yc_company::Entity, _>(db, yc_company::Column::Batch).await?;
    let by_industry =
        group_counts::<yc_company::Entity, _>(db, yc_company::Column::Industry).await?;
    let by_status = group_counts::<yc_company::Entity, _>(db, yc_company::Column::Status).await?;

    Ok(Json(StatsResponse {
        news: NewsStats {
            total: news_total,
            by_source,
        },
        yc: YcStats {
            total: yc_total,
            by_batch,
            by_industry,
            by_status,
        },
    }))
}

// Count rows per distinct value of one column, leaving out null groups
async fn group_counts<E, C>(
    db: &DatabaseConnection,
    column: C,
) -> Result<BTreeMap<String, i64>, DbErr>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    let rows = E::find()
        .select_only()
        .column_as(column, "key")
        .column_as(column.count(), "count")
        .filter(column.is_not_null())
        .group_by(column)
        .into_model::<GroupCount>()
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|row| (row.key, row.count)).collect())
}
