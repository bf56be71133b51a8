use std::collections::HashSet;
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::normalize::NewsRecord;

/// Default location of the flat-file mirror, next to the SQLite database.
pub const DEFAULT_CSV_PATH: &str = "data/news_clean.csv";

const CSV_HEADERS: &[&str] = &[
    "title",
    "link",
    "published_utc",
    "source",
    "company",
    "amount_value",
    "amount_currency",
    "stage",
    "inserted_at_utc",
];

/// Append records to the CSV mirror, skipping links already present in the
/// file. Creates the file (and parent directory) with a header row on first
/// use. Returns the number of rows actually written.
pub fn append_news_csv(
    path: &Path,
    records: &[NewsRecord],
) -> Result<usize, Box<dyn Error + Send + Sync>> {
    let mut seen_links = existing_links(path)?;
    let is_new_file = !path.exists();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if is_new_file {
        writer.write_record(CSV_HEADERS)?;
    }

    let mut written = 0;
    for record in records {
        if !seen_links.insert(record.link.clone()) {
            continue;
        }
        writer.serialize(record)?;
        written += 1;
    }
    writer.flush()?;

    Ok(written)
}

// Links already present in the mirror, keyed off the header row so column
// order changes do not break dedupe.
fn existing_links(path: &Path) -> Result<HashSet<String>, Box<dyn Error + Send + Sync>> {
    let mut links = HashSet::new();
    if !path.exists() {
        return Ok(links);
    }

    let mut reader = csv::Reader::from_path(path)?;
    let link_index = reader.headers()?.iter().position(|h| h == "link");
    if let Some(index) = link_index {
        for row in reader.records() {
            let row = row?;
            if let Some(link) = row.get(index) {
                if !link.is_empty() {
                    links.insert(link.to_string());
                }
            }
        }
    }

    Ok(links)
}
