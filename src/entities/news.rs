use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "news")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,
    pub title: String,
    #[sea_orm(unique)]
    pub link: String, // natural key, one row per article URL
    pub published_utc: Option<DateTime<Utc>>,
    pub source: String,
    pub company: Option<String>,
    pub amount_value: Option<f64>,
    pub amount_currency: Option<String>,
    pub stage: Option<String>,
    pub inserted_at_utc: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
