// src/report/sources.rs
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::schema::Source;

/// scheme://[userinfo@]host[:port][/...]
static RE_URL_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[a-z][a-z0-9+.\-]*://(?:[^/?#@]*@)?([^/?#:\s]+)(?::\d+)?(?:[/?#].*)?$")
        .expect("static url regex")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEntry {
    pub title: String,
    pub url: String,
    pub hostname: String,
    pub snippet: String,
    /// Parsed `publishedDate`, when it is an ISO calendar date.
    pub published: Option<NaiveDate>,
    /// Raw `publishedDate` as supplied.
    pub published_raw: String,
}

/// Lowercased host with a leading `www.` removed. `None` when the URL has no host.
pub fn display_hostname(url: &str) -> Option<String> {
    let caps = RE_URL_HOST.captures(url.trim())?;
    let host = caps.get(1)?.as_str().to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    (!host.is_empty()).then_some(host)
}

/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Every source with a usable URL, in input order. Malformed URLs are skipped.
pub fn source_list(sources: &[Source]) -> Vec<SourceEntry> {
    sources
        .iter()
        .filter_map(|s| {
            let Some(hostname) = display_hostname(&s.url) else {
                tracing::debug!(url = %s.url, "skipping source with unparseable url");
                return None;
            };
            Some(SourceEntry {
                title: s.title.clone(),
                url: s.url.clone(),
                hostname,
                snippet: s.snippet.clone(),
                published: parse_date(&s.published_date),
                published_raw: s.published_date.clone(),
            })
        })
        .collect()
}
