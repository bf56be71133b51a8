use chrono::{DateTime, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

/// A feed entry as it comes off the wire, before any cleaning.
#[derive(Debug, Clone, Default)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

/// A cleaned funding-news row, ready for the store and the CSV mirror.
/// Field order matches the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsRecord {
    pub title: String,
    pub link: String,
    pub published_utc: Option<DateTime<Utc>>,
    pub source: String,
    pub company: Option<String>,
    pub amount_value: Option<f64>,
    pub amount_currency: Option<String>,
    pub stage: Option<String>,
    pub inserted_at_utc: DateTime<Utc>,
}

/// Keyword list that marks a headline or summary as funding-related.
pub const FUNDING_KEYWORDS: &[&str] = &[
    "raises",
    "funding",
    "series",
    "seed",
    "round",
    "secures",
    "secured",
    "closes",
    "closing",
    "invests",
    "investment",
    "backs",
    "backed",
];

// Number with optional thousands separators and decimals, e.g. "750,000" or "3.2"
const NUMBER: &str = r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?";

// "$12M", "€ 3.2M"
static SYMBOL_THEN_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<sym>[$€£])\s*(?P<num>{NUMBER})\s*(?P<mag>[KkMmBb])?"
    ))
    .unwrap()
});

// "12M$" (rare, but seen in some feeds)
static AMOUNT_THEN_SYMBOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<num>{NUMBER})\s*(?P<mag>[KkMmBb])?\s*(?P<sym>[$€£])"
    ))
    .unwrap()
});

// "USD 40M", "gbp 500k"
static CODE_THEN_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?P<code>(?i:USD|EUR|GBP))\b\s*(?P<num>{NUMBER})\s*(?P<mag>[KkMmBb])?"
    ))
    .unwrap()
});

// "40M USD"
static AMOUNT_THEN_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<num>{NUMBER})\s*(?P<mag>[KkMmBb])?\s*\b(?P<code>(?i:USD|EUR|GBP))\b"
    ))
    .unwrap()
});

// Spelled-out magnitudes are folded into suffix form before matching
static MAGNITUDE_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(million|billion|thousand)s?\b").unwrap());

static PRE_SEED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bpre[\s-]?seed\b").unwrap());
static SEED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bseed\b").unwrap());
static SERIES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bseries\s+([A-Z])\b").unwrap());

// Runs of capitalized words, the usual shape of a company name in a headline
static PROPER_NOUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][A-Za-z0-9&-]*(?:\s+[A-Z][A-Za-z0-9&-]*)*\b").unwrap());

// Title prefixes like "TechCrunch: ..." get cut away before company extraction
const COMPANY_SEPARATORS: &[&str] = &[":", " - ", " – ", " — ", "–", "—", " | "];

// Capitalized words that show up in funding headlines but are never the company
const EXCLUDED_TOKENS: &[&str] = &[
    "Raises", "Raise", "Raising", "Raised", "Funding", "Funded", "Series", "Seed", "Round",
    "Pre-Seed", "Pre", "SeedRound", "A", "B", "C", "D", "E",
];

// Publication names that survive the separator cut on some feeds
const SOURCE_NAMES: &[&str] = &["techcrunch", "eu-startups", "eu startups"];

/// True if the text mentions any funding keyword (case-insensitive).
pub fn is_funding_related(text: &str) -> bool {
    let lowered = text.to_lowercase();
    FUNDING_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Extract a funding amount and currency from a headline.
///
/// Handles symbol and ISO-code currencies on either side of the number,
/// thousands separators, decimals, and K/M/B magnitude suffixes (including
/// spelled-out "million"/"billion"/"thousand"). Returns `(None, None)` when
/// nothing matches.
pub fn parse_amount_and_currency(title: &str) -> (Option<f64>, Option<String>) {
    let normalized = MAGNITUDE_WORDS.replace_all(title, |caps: &Captures| {
        match caps[1].to_lowercase().as_str() {
            "million" => "M",
            "billion" => "B",
            _ => "K",
        }
    });

    for pattern in [
        &*SYMBOL_THEN_AMOUNT,
        &*AMOUNT_THEN_SYMBOL,
        &*CODE_THEN_AMOUNT,
        &*AMOUNT_THEN_CODE,
    ] {
        if let Some(caps) = pattern.captures(&normalized) {
            let currency = caps
                .name("sym")
                .map(|m| symbol_to_code(m.as_str()).to_string())
                .or_else(|| caps.name("code").map(|m| m.as_str().to_uppercase()));
            let value = caps
                .name("num")
                .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
                .map(|v| {
                    let scaled = v * magnitude_factor(caps.name("mag").map(|m| m.as_str()));
                    (scaled * 100.0).round() / 100.0
                });
            return (value, currency);
        }
    }

    (None, None)
}

fn symbol_to_code(symbol: &str) -> &'static str {
    match symbol {
        "$" => "USD",
        "€" => "EUR",
        _ => "GBP",
    }
}

fn magnitude_factor(magnitude: Option<&str>) -> f64 {
    match magnitude.map(|m| m.to_ascii_uppercase()) {
        Some(m) if m == "K" => 1e3,
        Some(m) if m == "M" => 1e6,
        Some(m) if m == "B" => 1e9,
        _ => 1.0,
    }
}

/// Extract a funding-stage label ("Pre-Seed", "Seed", "Series A"..) from a headline.
pub fn parse_stage(title: &str) -> Option<String> {
    // Checked before the plain seed pattern, which would also match
    if PRE_SEED_RE.is_match(title) {
        return Some("Pre-Seed".to_string());
    }
    if SEED_RE.is_match(title) {
        return Some("Seed".to_string());
    }
    if let Some(caps) = SERIES_RE.captures(title) {
        return Some(format!("Series {}", caps[1].to_uppercase()));
    }
    None
}

/// Best-effort company name extraction from a headline.
///
/// Cuts the title at the first separator, then takes the first run of
/// capitalized words that is neither funding vocabulary nor a publication name.
pub fn parse_company(title: &str) -> Option<String> {
    let mut segment = title;
    for sep in COMPANY_SEPARATORS {
        if let Some(idx) = segment.find(sep) {
            segment = &segment[..idx];
            break;
        }
    }

    for candidate in PROPER_NOUN_RE.find_iter(segment) {
        let candidate = candidate.as_str().trim();
        if candidate
            .split_whitespace()
            .any(|token| EXCLUDED_TOKENS.contains(&token))
        {
            continue;
        }
        if SOURCE_NAMES.contains(&candidate.to_lowercase().as_str()) {
            continue;
        }
        if candidate.len() >= 2 {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Turn a raw feed entry into a canonical news record.
///
/// Returns `None` for entries that should not be stored: missing title or
/// link, no funding keyword in title or summary, or published before the
/// cutoff. Entries without a published timestamp always pass the cutoff.
pub fn normalize_item(
    raw: &RawItem,
    source: &str,
    cutoff: Option<DateTime<Utc>>,
) -> Option<NewsRecord> {
    let title = raw.title.trim();
    let link = raw.link.trim();
    if title.is_empty() || link.is_empty() {
        return None;
    }

    let summary_related = raw
        .summary
        .as_deref()
        .map(is_funding_related)
        .unwrap_or(false);
    if !is_funding_related(title) && !summary_related {
        return None;
    }

    if let (Some(cutoff), Some(published)) = (cutoff, raw.published) {
        if published < cutoff {
            return None;
        }
    }

    let (amount_value, amount_currency) = parse_amount_and_currency(title);

    Some(NewsRecord {
        title: title.to_string(),
        link: link.to_string(),
        published_utc: raw.published,
        source: source.to_string(),
        company: parse_company(title),
        amount_value,
        amount_currency,
        stage: parse_stage(title),
        inserted_at_utc: now_utc_seconds(),
    })
}

/// Current UTC time truncated to whole seconds, the precision we store.
pub fn now_utc_seconds() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(0).unwrap_or(now)
}
