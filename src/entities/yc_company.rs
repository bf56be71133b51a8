use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "yc_companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,
    #[sea_orm(unique)]
    pub yc_api_id: i64, // the id assigned by the YC OSS API
    pub name: String,
    pub description: Option<String>,
    pub batch: Option<String>,
    pub industry: Option<String>,
    pub industries: Option<String>, // JSON array of labels
    pub location: Option<String>,
    pub status: Option<String>,
    pub website_url: Option<String>,
    pub social_links: Option<String>, // JSON array of URLs
    pub founding_date: Option<DateTime<Utc>>,
    pub company_url: Option<String>,
    pub inserted_at_utc: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Helper struct for deserializing objects from the YC OSS companies dump.
// Every field is optional so a single malformed object never sinks the batch.
#[derive(Deserialize, Debug, Clone)]
pub struct RawCompany {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub one_liner: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub industries: Option<Vec<String>>,
    #[serde(default)]
    pub all_locations: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub launched_at: Option<i64>, // unix seconds
    #[serde(default)]
    pub url: Option<String>, // profile page on ycombinator.com
}
