use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};

pub fn format_date_time(date_time: &DateTime<Utc>) -> (String, String) {
    let date = date_time.format("%Y-%m-%d").to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

/// First `max_chars` characters of `text`, with "..." appended.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut summary: String = text.chars().take(max_chars).collect();
    summary.push_str("...");
    summary
}

/// Size in bytes of the data encoded by a base64 string, or `None` when the
/// string is not valid base64.
pub fn base64_decoded_len(encoded: &str) -> Option<usize> {
    STANDARD.decode(encoded.trim()).ok().map(|data| data.len())
}
