use chrono::Duration;
use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::json;
use tempfile::TempDir;

use migration::{Migrator, MigratorTrait};
use vcintel::entities::{News, YcCompany};
use vcintel::jobs::news::ingest_feeds;
use vcintel::jobs::yc::map_company;
use vcintel::normalize::{normalize_item, now_utc_seconds, NewsRecord, RawItem};
use vcintel::store;

async fn test_db() -> (TempDir, DatabaseConnection) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
    let db = Database::connect(&url).await.expect("open sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    (dir, db)
}

fn news_record(link: &str, title: &str) -> NewsRecord {
    NewsRecord {
        title: title.to_string(),
        link: link.to_string(),
        published_utc: Some(now_utc_seconds() - Duration::hours(6)),
        source: "techcrunch".to_string(),
        company: Some("Acme".to_string()),
        amount_value: Some(12_000_000.0),
        amount_currency: Some("USD".to_string()),
        stage: Some("Series A".to_string()),
        inserted_at_utc: now_utc_seconds(),
    }
}

#[tokio::test]
async fn test_news_insert_is_idempotent() {
    let (_dir, db) = test_db().await;
    let records = [
        news_record("https://example.com/a", "Acme raises $12M Series A"),
        news_record("https://example.com/b", "Globex secures seed funding"),
    ];

    let outcome = store::insert_news(&db, &records).await.unwrap();
    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.skipped, 0);

    // Running the same batch again inserts nothing new
    let outcome = store::insert_news(&db, &records).await.unwrap();
    assert_eq!(outcome.inserted, 0);
    assert_eq!(outcome.skipped, 2);
    assert_eq!(News::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_news_keeps_first_row_per_link() {
    let (_dir, db) = test_db().await;
    let first = [news_record("https://example.com/a", "Original headline")];
    let second = [news_record("https://example.com/a", "Rewritten headline")];

    store::insert_news(&db, &first).await.unwrap();
    store::insert_news(&db, &second).await.unwrap();

    let rows = News::find().all(&db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Original headline");
}

#[tokio::test]
async fn test_company_upsert_updates_in_place() {
    let (_dir, db) = test_db().await;
    let first_seen = now_utc_seconds() - Duration::hours(24);
    let raw = json!({"id": 42, "name": "Acme", "batch": "W24", "status": "Active"});

    let model = map_company(serde_json::from_value(raw.clone()).unwrap(), first_seen).unwrap();
    store::upsert_companies(&db, vec![model]).await.unwrap();

    let mut changed = raw;
    changed["status"] = json!("Acquired");
    let model = map_company(serde_json::from_value(changed).unwrap(), now_utc_seconds()).unwrap();
    store::upsert_companies(&db, vec![model]).await.unwrap();

    let rows = YcCompany::find().all(&db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].yc_api_id, 42);
    assert_eq!(rows[0].status.as_deref(), Some("Acquired"));
    // First-seen timestamp survives the update
    assert_eq!(rows[0].inserted_at_utc, first_seen);
}

#[tokio::test]
async fn test_company_upsert_counts_inserts_and_updates() {
    let (_dir, db) = test_db().await;
    let now = now_utc_seconds();
    let models = || {
        vec![
            map_company(
                serde_json::from_value(json!({"id": 1, "name": "Acme"})).unwrap(),
                now,
            )
            .unwrap(),
            map_company(
                serde_json::from_value(json!({"id": 2, "name": "Globex"})).unwrap(),
                now,
            )
            .unwrap(),
        ]
    };

    let outcome = store::upsert_companies(&db, models()).await.unwrap();
    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.updated, 0);

    let outcome = store::upsert_companies(&db, models()).await.unwrap();
    assert_eq!(outcome.inserted, 0);
    assert_eq!(outcome.updated, 2);
    assert_eq!(YcCompany::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_normalized_item_lands_in_columns() {
    let (_dir, db) = test_db().await;
    let raw = RawItem {
        title: "Acme raises $12M Series A".to_string(),
        link: "https://example.com/acme".to_string(),
        summary: Some("Acme closed the round this week.".to_string()),
        published: Some(now_utc_seconds() - Duration::hours(3)),
    };

    let record = normalize_item(&raw, "techcrunch", None).expect("funding item normalizes");
    store::insert_news(&db, &[record]).await.unwrap();

    let rows = News::find().all(&db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source, "techcrunch");
    assert_eq!(rows[0].company.as_deref(), Some("Acme"));
    assert_eq!(rows[0].amount_value, Some(12_000_000.0));
    assert_eq!(rows[0].amount_currency.as_deref(), Some("USD"));
    assert_eq!(rows[0].stage.as_deref(), Some("Series A"));
}

const GOOD_FEED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Good Feed</title>
<item><title>Acme raises $12M Series A</title><link>https://example.com/acme</link></item>
<item><title>Acme opens a new office</title><link>https://example.com/office</link></item>
</channel></rss>"#;

#[tokio::test]
async fn test_unreachable_feed_does_not_abort_the_batch() {
    let (dir, db) = test_db().await;

    let app = axum::Router::new().route("/feed", axum::routing::get(|| async { GOOD_FEED_XML }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let good_url = format!("http://{addr}/feed");
    // Nothing listens on port 9, so the first feed is refused immediately
    let feeds = [
        ("http://127.0.0.1:9/feed", "dead"),
        (good_url.as_str(), "good"),
    ];
    let csv_path = dir.path().join("mirror.csv");

    let summary = ingest_feeds(&db, &feeds, None, 0, &csv_path).await.unwrap();

    // The reachable feed still contributes; the office item fails the keyword gate
    assert_eq!(summary.collected, 1);
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.csv_appended, 1);

    let rows = News::find().all(&db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source, "good");
    assert_eq!(rows[0].link, "https://example.com/acme");

    server.abort();
}

#[tokio::test]
async fn test_oversized_window_ingests_like_no_cutoff() {
    let (dir, db) = test_db().await;

    let app = axum::Router::new().route("/feed", axum::routing::get(|| async { GOOD_FEED_XML }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let good_url = format!("http://{addr}/feed");
    let feeds = [(good_url.as_str(), "good")];
    let csv_path = dir.path().join("mirror.csv");

    // A window no timestamp can be older than must behave like no cutoff,
    // not blow up the cutoff arithmetic mid-run
    let summary = ingest_feeds(&db, &feeds, None, i64::MAX, &csv_path)
        .await
        .unwrap();

    assert_eq!(summary.collected, 1);
    assert_eq!(summary.inserted, 1);

    server.abort();
}
