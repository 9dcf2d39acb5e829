use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// Legacy API marker for "no timestamp".
pub const NULL_DATE: &str = "1969-12-31T23:59:59";
/// Chain timestamp layout, shared by parsing and rendering.
pub const CHAIN_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const MAX_IMG_URL_LEN: usize = 1024;

const ELLIPSIS: &str = "...";

/// Trims `text`; if still longer than `max_len` characters, cuts it so the
/// result including a trailing `...` is exactly `max_len` long.
pub fn trunc(text: &str, max_len: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }
    let mut out: String = trimmed
        .chars()
        .take(max_len.saturating_sub(ELLIPSIS.len()))
        .collect();
    out.push_str(ELLIPSIS);
    out
}

/// Renders a stored timestamp the way legacy clients expect it.
pub fn json_date(date: Option<NaiveDateTime>) -> String {
    match date {
        Some(d) => d.format(CHAIN_TIME_FORMAT).to_string(),
        None => NULL_DATE.to_string(),
    }
}

pub fn parse_time(block_time: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(block_time, CHAIN_TIME_FORMAT)
        .with_context(|| format!("invalid chain timestamp '{block_time}'"))
}

/// Returns the trimmed URL only for strings that look like a bounded http(s) link.
pub fn safe_img_url(url: &Value, max_len: usize) -> Option<String> {
    let url = url.as_str()?;
    if !url.is_empty() && url.chars().count() < max_len && url.starts_with("http") {
        Some(url.trim().to_string())
    } else {
        None
    }
}

/// Parses the JSON string stored under `key`. Missing, empty or malformed
/// values all yield an empty object.
pub fn load_json_key(obj: &Map<String, Value>, key: &str) -> Value {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_else(|| Value::Object(Map::new()))
}
