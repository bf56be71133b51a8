use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use sea_orm::{DatabaseConnection, Set};
use serde_json::Value;
use tracing::{info, warn};

use crate::entities::yc_company::{self, RawCompany};
use crate::normalize::now_utc_seconds;
use crate::store;

/// Public dump of every YC company, maintained by the yc-oss project.
pub const ALL_COMPANIES_URL: &str = "https://yc-oss.github.io/api/companies/all.json";

/// Default cap on companies processed per run.
pub const DEFAULT_MAX_COMPANIES: usize = 100;

// The full dump is a few tens of MB, so give it a generous timeout
const FETCH_TIMEOUT: StdDuration = StdDuration::from_secs(120);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct YcIngestSummary {
    pub fetched: u64,
    pub dropped: u64,
    pub inserted: u64,
    pub updated: u64,
}

/// Fetch the YC company dump and upsert up to `max_companies` entries.
/// A fetch failure is logged and yields an empty summary; only store
/// errors abort the run.
pub async fn run_yc_ingest(
    db: &DatabaseConnection,
    max_companies: usize,
) -> Result<YcIngestSummary, Box<dyn std::error::Error + Send + Sync>> {
    let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;

    let mut raw_companies = match fetch_companies(&client).await {
        Ok(companies) => companies,
        Err(e) => {
            warn!("YC OSS fetch failed, nothing to ingest: {}", e);
            return Ok(YcIngestSummary::default());
        }
    };
    raw_companies.truncate(max_companies);

    let fetched = raw_companies.len() as u64;
    let now = now_utc_seconds();
    let mut models = Vec::new();
    let mut dropped = 0u64;

    for value in raw_companies {
        match serde_json::from_value::<RawCompany>(value) {
            Ok(raw) => match map_company(raw, now) {
                Some(model) => models.push(model),
                None => {
                    dropped += 1;
                    warn!("Skipping YC company without id or name");
                }
            },
            Err(e) => {
                dropped += 1;
                warn!("Skipping malformed YC company object: {}", e);
            }
        }
    }

    let outcome = store::upsert_companies(db, models).await?;

    info!(
        "YC ingest finished. Fetched: {}, Dropped: {}, Inserted: {}, Updated: {}",
        fetched, dropped, outcome.inserted, outcome.updated
    );

    Ok(YcIngestSummary {
        fetched,
        dropped,
        inserted: outcome.inserted,
        updated: outcome.updated,
    })
}

async fn fetch_companies(
    client: &Client,
) -> Result<Vec<Value>, Box<dyn std::error::Error + Send + Sync>> {
    info!("Fetching YC OSS companies: {}", ALL_COMPANIES_URL);
    let response = client.get(ALL_COMPANIES_URL).send().await?;
    if !response.status().is_success() {
        return Err(anyhow::anyhow!("YC OSS returned HTTP {}", response.status()).into());
    }
    Ok(response.json().await?)
}

/// Map a raw YC OSS object onto our row shape. Returns `None` when the
/// object has no usable natural key or name.
///
/// Empty strings collapse to null. An `industries` list is stored as JSON
/// even when empty; `social_links` keeps only http(s) tags and stays null
/// when none remain.
pub fn map_company(raw: RawCompany, inserted_at: DateTime<Utc>) -> Option<yc_company::ActiveModel> {
    let yc_api_id = raw.id?;
    let name = non_empty(raw.name)?;

    let industries = raw
        .industries
        .and_then(|list| serde_json::to_string(&list).ok());
    let social_links = raw
        .tags
        .map(|tags| {
            tags.into_iter()
                .filter(|t| t.starts_with("http"))
                .collect::<Vec<_>>()
        })
        .filter(|links| !links.is_empty())
        .and_then(|links| serde_json::to_string(&links).ok());
    let founding_date = raw
        .launched_at
        .and_then(|ts| DateTime::from_timestamp(ts, 0));

    Some(yc_company::ActiveModel {
        yc_api_id: Set(yc_api_id),
        name: Set(name),
        description: Set(non_empty(raw.one_liner)),
        batch: Set(non_empty(raw.batch)),
        industry: Set(non_empty(raw.industry)),
        industries: Set(industries),
        location: Set(non_empty(raw.all_locations)),
        status: Set(non_empty(raw.status)),
        website_url: Set(non_empty(raw.website)),
        social_links: Set(social_links),
        founding_date: Set(founding_date),
        company_url: Set(non_empty(raw.url)),
        inserted_at_utc: Set(inserted_at),
        ..Default::default()
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
