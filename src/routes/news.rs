use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, SecondsFormat, Utc};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::news;
use crate::error::AppError;
use crate::routes::{validate_limit, validate_since_days};
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NewsQuery {
    /// Only return items from this feed source (e.g. "techcrunch")
    pub source: Option<String>,
    /// Only return items published within the last N days (default 90, max 36500, 0 disables the cutoff)
    pub since_days: Option<i64>,
    /// Maximum number of items to return (default 50, max 500)
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewsItemResponse {
    /// Headline of the news item
    pub title: String,
    /// URL of the full article
    pub link: String,
    /// Publication time (UTC ISO-8601), absent when the feed gave none
    pub published_utc: Option<String>,
    /// Identifier of the origin feed
    pub source: String,
    /// Heuristically extracted company name
    pub company: Option<String>,
    /// Funding amount in units of the currency
    pub amount_value: Option<f64>,
    /// ISO currency code for the amount
    pub amount_currency: Option<String>,
    /// Funding stage label ("Seed", "Series A", ..)
    pub stage: Option<String>,
}

impl From<news::Model> for NewsItemResponse {
    fn from(model: news::Model) -> Self {
        NewsItemResponse {
            title: model.title,
            link: model.link,
            published_utc: model
                .published_utc
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            source: model.source,
            company: model.company,
            amount_value: model.amount_value,
            amount_currency: model.amount_currency,
            stage: model.stage,
        }
    }
}

/// List stored funding news, most recent first
#[utoipa::path(
    get,
    path = "/news",
    params(NewsQuery),
    responses(
        (status = 200, description = "Matching news items, most recent first", body = Vec<NewsItemResponse>),
        (status = 400, description = "Invalid filter value")
    )
)]
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Vec<NewsItemResponse>>, AppError> {
    let limit = validate_limit(query.limit)?;
    let since_days = validate_since_days(query.since_days)?;

    let mut select = news::Entity::find();
    if let Some(source) = query.source.as_deref() {
        select = select.filter(news::Column::Source.eq(source));
    }
    if since_days > 0 {
        let cutoff = Utc::now() - Duration::days(since_days);
        // Undated items always pass the recency filter
        select = select.filter(
            Condition::any()
                .add(news::Column::PublishedUtc.is_null())
                .add(news::Column::PublishedUtc.gte(cutoff)),
        );
    }

    let rows = select
        .order_by_desc(news::Column::PublishedUtc)
        .order_by_desc(news::Column::Id)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(NewsItemResponse::from).collect()))
}
