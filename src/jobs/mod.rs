pub mod news;
pub mod yc;

pub use news::run_news_ingest;
pub use yc::run_yc_ingest;
