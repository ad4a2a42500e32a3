//! Display and time helpers.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::CoreError;
use crate::i18n::Localizer;

/// Format used for displayed timestamps and accepted as time input.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Flattens newlines and truncates to `limit` characters with `...`.
pub fn summarize_text(text: &str, limit: usize) -> String {
    let flat = text.replace('\n', " ");
    let flat = flat.trim();
    if flat.chars().count() <= limit {
        return flat.to_string();
    }
    let mut out: String = flat.chars().take(limit.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Formats epoch seconds as local time, `-` when unknown.
pub fn format_ts(ts: i64) -> String {
    if ts == 0 {
        return "-".to_string();
    }
    Local
        .timestamp_opt(ts, 0)
        .single()
        .map_or_else(|| "-".to_string(), |dt| dt.format(TIME_FORMAT).to_string())
}

/// Parses a user-supplied local time into epoch seconds.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD HH:MM` and `YYYY-MM-DD`. A
/// date-only end bound covers the whole day. Empty input means unbounded
/// and yields `0`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidTime`] if the value matches none of the
/// accepted formats.
pub fn parse_time_input(value: &str, is_end: bool) -> Result<i64, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, TIME_FORMAT))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|date| {
                let time = if is_end {
                    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default()
                } else {
                    NaiveTime::MIN
                };
                date.and_time(time)
            })
        })
        .map_err(|_| invalid_time(value))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| invalid_time(value))
}

fn invalid_time(value: &str) -> CoreError {
    CoreError::InvalidTime {
        value: value.to_string(),
        expected: TIME_FORMAT,
    }
}

/// Localized label for a `MAJOR_TYPE_*` tag.
///
/// Unknown tags are shown verbatim, an empty tag as `-`.
pub fn kind_label(kind: &str, lang: &Localizer) -> String {
    let key = match kind {
        "MAJOR_TYPE_ARCHIVE" => "kind_archive",
        "MAJOR_TYPE_PGC" => "kind_pgc",
        "MAJOR_TYPE_UGC_SEASON" => "kind_ugc_season",
        "MAJOR_TYPE_OPUS" => "kind_opus",
        "MAJOR_TYPE_DRAW" => "kind_draw",
        "MAJOR_TYPE_ARTICLE" => "kind_article",
        "MAJOR_TYPE_COMMON" => "kind_common",
        "MAJOR_TYPE_LIVE" => "kind_live",
        "MAJOR_TYPE_MUSIC" => "kind_music",
        "" => return "-".to_string(),
        other => return other.to_string(),
    };
    lang.t(key, &[])
}

/// Masks a secret, keeping the first and last two characters of long values.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    match chars.len() {
        0 => "-".to_string(),
        n if n <= 6 => "*".repeat(n),
        n => {
            let mut out: String = chars[..2].iter().collect();
            out.push_str(&"*".repeat(n - 4));
            out.extend(&chars[n - 2..]);
            out
        }
    }
}
