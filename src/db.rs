use std::env;
use std::path::Path;

use sea_orm::{Database, DatabaseConnection, DbErr};
use tracing::info;

/// Local SQLite file, created on first use.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/vcintel.db?mode=rwc";

/// Connect to the database named by `DATABASE_URL`, falling back to the
/// local SQLite file. For file-backed SQLite the parent directory is created
/// first, since the driver will not do that on its own.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    if let Some(file) = sqlite_file_path(&url) {
        if let Some(parent) = Path::new(file).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DbErr::Custom(format!(
                        "could not create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
    }

    info!("connecting to database at {url}");
    Database::connect(&url).await
}

// File path portion of a SQLite URL, if the URL is file-backed.
fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    if rest.is_empty() || rest.starts_with(":memory:") {
        return None;
    }
    rest.split('?').next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_file_path_from_sqlite_urls() {
        assert_eq!(
            sqlite_file_path("sqlite://data/vcintel.db?mode=rwc"),
            Some("data/vcintel.db")
        );
        assert_eq!(sqlite_file_path("sqlite:data/vcintel.db"), Some("data/vcintel.db"));
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/vcintel"), None);
    }
}
