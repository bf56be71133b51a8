use axum::{
    extract::{Query, State},
    Json,
};
use chrono::SecondsFormat;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::yc_company;
use crate::error::AppError;
use crate::routes::validate_limit;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompanyQuery {
    /// Only return companies from this batch (e.g. "W24")
    pub batch: Option<String>,
    /// Only return companies with this primary industry
    pub industry: Option<String>,
    /// Only return companies with this status (e.g. "Active")
    pub status: Option<String>,
    /// Maximum number of companies to return (default 50, max 500)
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyResponse {
    /// Id assigned by the YC OSS API
    pub yc_api_id: i64,
    pub name: String,
    /// One-line company description
    pub description: Option<String>,
    pub batch: Option<String>,
    /// Primary industry label
    pub industry: Option<String>,
    /// All industry labels
    pub industries: Vec<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub website_url: Option<String>,
    /// Social profile URLs from the company tags
    pub social_links: Vec<String>,
    /// Launch date (UTC ISO-8601)
    pub founding_date: Option<String>,
    /// Profile page on ycombinator.com
    pub company_url: Option<String>,
    /// When this row was first ingested (UTC ISO-8601)
    pub inserted_at_utc: String,
}

impl From<yc_company::Model> for CompanyResponse {
    fn from(model: yc_company::Model) -> Self {
        CompanyResponse {
            yc_api_id: model.yc_api_id,
            name: model.name,
            description: model.description,
            batch: model.batch,
            industry: model.industry,
            industries: model
                .industries
                .as_deref()
                .map(parse_json_list)
                .unwrap_or_default(),
            location: model.location,
            status: model.status,
            website_url: model.website_url,
            social_links: model
                .social_links
                .as_deref()
                .map(parse_json_list)
                .unwrap_or_default(),
            founding_date: model
                .founding_date
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            company_url: model.company_url,
            inserted_at_utc: model
                .inserted_at_utc
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

// Stored as JSON text; unreadable values degrade to an empty list
fn parse_json_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// List stored YC companies, most recently ingested first
#[utoipa::path(
    get,
    path = "/yc/companies",
    params(CompanyQuery),
    responses(
        (status = 200, description = "Matching companies, most recently ingested first", body = Vec<CompanyResponse>),
        (status = 400, description = "Invalid filter value")
    )
)]
pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<Vec<CompanyResponse>>, AppError> {
    let limit = validate_limit(query.limit)?;

    let mut select = yc_company::Entity::find();
    if let Some(batch) = query.batch.as_deref() {
        select = select.filter(yc_company::Column::Batch.eq(batch));
    }
    if let Some(industry) = query.industry.as_deref() {
        select = select.filter(yc_company::Column::Industry.eq(industry));
    }
    if let Some(status) = query.status.as_deref() {
        select = select.filter(yc_company::Column::Status.eq(status));
    }

    let rows = select
        .order_by_desc(yc_company::Column::InsertedAtUtc)
        .order_by_desc(yc_company::Column::Id)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(CompanyResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_lists_degrade_to_empty() {
        assert_eq!(parse_json_list(r#"["a","b"]"#), vec!["a", "b"]);
        assert!(parse_json_list("not json").is_empty());
        assert!(parse_json_list("[]").is_empty());
    }
}
