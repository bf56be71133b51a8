use std::collections::HashSet;
use std::path::Path;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use reqwest::Client;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::export;
use crate::normalize::{normalize_item, NewsRecord, RawItem};
use crate::store;

/// Feeds polled by the news job, with the source label stored on each row.
pub const FEEDS: &[(&str, &str)] = &[
    ("https://techcrunch.com/startups/feed/", "techcrunch"),
    ("https://www.eu-startups.com/feed/", "eu-startups"),
    ("https://venturebeat.com/category/startups/feed/", "venturebeat"),
    ("https://sifted.eu/feed/", "sifted"),
    ("https://news.crunchbase.com/feed/", "crunchbase-news"),
    ("https://www.businessinsider.com/sai/rss", "businessinsider"),
    ("https://eu.vc/feed/", "eu-vc"),
    ("http://news.ycombinator.com/rss", "hackernews"),
    ("http://firstround.com/review/feed.xml", "firstround"),
    ("http://feed.onstartups.com/onstartups", "onstartups"),
    ("https://bothsidesofthetable.com/feed", "bothsides"),
    ("http://steveblank.com/feed/", "steveblank"),
    ("http://ben-evans.com/benedictevans?format=rss", "benedictevans"),
    ("http://andrewchen.co/feed/", "andrewchen"),
    ("http://blog.samaltman.com/posts.atom", "samaltman"),
];

/// Default recency window for ingested items, in days.
pub const DEFAULT_SINCE_DAYS: i64 = 90;

/// Largest accepted recency window, in days (roughly a century).
pub const MAX_SINCE_DAYS: i64 = 36_500;

const FETCH_TIMEOUT: StdDuration = StdDuration::from_secs(30);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NewsIngestSummary {
    /// Funding-related items collected across all feeds, deduplicated by link.
    pub collected: u64,
    pub inserted: u64,
    pub skipped: u64,
    pub csv_appended: u64,
}

/// Run the news pipeline over the configured feed list.
pub async fn run_news_ingest(
    db: &DatabaseConnection,
    max_items: Option<usize>,
    since_days: i64,
    csv_path: &Path,
) -> Result<NewsIngestSummary, Box<dyn std::error::Error + Send + Sync>> {
    ingest_feeds(db, FEEDS, max_items, since_days, csv_path).await
}

/// Fetch the given feeds, normalize the entries, and write the results to
/// the store and the CSV mirror. A failing feed is logged and skipped; only
/// store errors abort the run.
///
/// `max_items` caps the raw entries taken across all feeds combined.
/// `since_days` <= 0 disables the recency cutoff, as does a window too
/// large for the timestamp arithmetic.
pub async fn ingest_feeds(
    db: &DatabaseConnection,
    feeds: &[(&str, &str)],
    max_items: Option<usize>,
    since_days: i64,
    csv_path: &Path,
) -> Result<NewsIngestSummary, Box<dyn std::error::Error + Send + Sync>> {
    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(concat!("vcintel/", env!("CARGO_PKG_VERSION")))
        .build()?;

    // A window too large for chrono's timestamp range keeps everything,
    // the same as no cutoff at all
    let cutoff = (since_days > 0)
        .then(|| {
            Duration::try_days(since_days).and_then(|window| Utc::now().checked_sub_signed(window))
        })
        .flatten();

    let mut records: Vec<NewsRecord> = Vec::new();
    let mut seen_links: HashSet<String> = HashSet::new();
    let mut remaining = max_items;

    for (url, source) in feeds {
        if remaining == Some(0) {
            break;
        }
        info!("Fetching feed: {} ({})", url, source);

        let feed = match fetch_feed(&client, url).await {
            Ok(feed) => feed,
            Err(e) => {
                warn!("Skipping feed {}: {}", url, e);
                continue;
            }
        };

        let mut entries = feed.entries;
        // The cap bounds the whole run, not each feed
        if let Some(budget) = remaining {
            entries.truncate(budget);
            remaining = Some(budget - entries.len());
        }

        for entry in entries {
            let raw = RawItem {
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                link: entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default(),
                summary: entry.summary.map(|s| s.content),
                published: entry.published.or(entry.updated),
            };
            if raw.title.trim().is_empty() || raw.link.trim().is_empty() {
                warn!("Skipping {} entry without title or link", source);
                continue;
            }

            if let Some(record) = normalize_item(&raw, source, cutoff) {
                // Deduplicate by link within this run; first feed wins
                if seen_links.insert(record.link.clone()) {
                    records.push(record);
                }
            }
        }
    }

    info!("Collected {} funding-related items", records.len());

    let outcome = store::insert_news(db, &records).await?;

    // The CSV mirror is best-effort; a write failure never undoes the DB work
    let csv_appended = match export::append_news_csv(csv_path, &records) {
        Ok(written) => written as u64,
        Err(e) => {
            warn!("CSV mirror write failed: {}", e);
            0
        }
    };

    info!(
        "News ingest finished. Inserted: {}, Skipped (already stored): {}, CSV rows appended: {}",
        outcome.inserted, outcome.skipped, csv_appended
    );

    Ok(NewsIngestSummary {
        collected: records.len() as u64,
        inserted: outcome.inserted,
        skipped: outcome.skipped,
        csv_appended,
    })
}

async fn fetch_feed(
    client: &Client,
    url: &str,
) -> Result<feed_rs::model::Feed, Box<dyn std::error::Error + Send + Sync>> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(anyhow::anyhow!("feed returned HTTP {}", response.status()).into());
    }
    let bytes = response.bytes().await?;
    Ok(feed_rs::parser::parse(&bytes[..])?)
}
