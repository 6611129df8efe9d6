use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

static DATE_TOKEN_RE: OnceLock<Regex> = OnceLock::new();

/// Derives the deterministic, filesystem-safe report filename:
/// `{company}_{start}_to_{end}.csv`. Bounds that carry no recognizable
/// date (and an absent end bound) fall back to today's UTC date.
pub fn build_filename(company_name: &str, date_start: &str, date_end: Option<&str>) -> String {
    let today = || Utc::now().format("%Y-%m-%d").to_string();

    let company = sanitize(company_name);
    let start = date_token(date_start).unwrap_or_else(today);
    let end = date_end.and_then(date_token).unwrap_or_else(today);

    format!("{}_{}_to_{}.csv", company, start, end)
}

/// Keeps `[A-Za-z0-9_-]`; everything else becomes a single underscore,
/// with replacement runs collapsed and edges trimmed.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Extracts a `YYYY-MM-DD` token: first via the supported datetime formats,
/// then by scanning for anything date-shaped.
fn date_token(text: &str) -> Option<String> {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date().format("%Y-%m-%d").to_string());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.format("%Y-%m-%d").to_string());
    }

    let re = DATE_TOKEN_RE.get_or_init(|| {
        Regex::new(r"\d{4}-\d{2}-\d{2}").expect("date token pattern is valid")
    });
    re.find(text).map(|m| m.as_str().to_string())
}
