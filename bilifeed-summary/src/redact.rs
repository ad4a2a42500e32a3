//! Secret redaction for error details.

use std::sync::LazyLock;

use regex::Regex;

/// Longest error detail kept, in characters.
pub const ERROR_DETAIL_LIMIT: usize = 1000;

static KEY_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(key=)[^&\s]+").expect("valid regex"));

static BEARER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(Bearer\s+)[A-Za-z0-9\-._]+").expect("valid regex"));

static SECRET_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sk-[A-Za-z0-9\-._]+").expect("valid regex"));

/// Flattens newlines to spaces and trims.
pub fn safe_text(value: &str) -> String {
    value.replace('\n', " ").trim().to_string()
}

/// Masks `key=` query values, bearer tokens and `sk-` keys.
pub fn redact_sensitive(text: &str) -> String {
    let text = KEY_PARAM.replace_all(text, "${1}***");
    let text = BEARER.replace_all(&text, "${1}***");
    SECRET_KEY.replace_all(&text, "sk-***").into_owned()
}

/// Flattens, redacts and caps an error detail at [`ERROR_DETAIL_LIMIT`].
pub fn trim_error(text: &str) -> String {
    let text = redact_sensitive(&safe_text(text));
    if text.chars().count() <= ERROR_DETAIL_LIMIT {
        return text;
    }
    let mut out: String = text.chars().take(ERROR_DETAIL_LIMIT - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer() {
        assert_eq!(redact_sensitive("Bearer abcdef123456"), "Bearer ***");
        assert_eq!(redact_sensitive("bearer  x.y-z"), "bearer  ***");
    }

    #[test]
    fn test_secret_key() {
        assert_eq!(
            redact_sensitive("invalid key sk-AbC123 supplied"),
            "invalid key sk-*** supplied"
        );
    }

    #[test]
    fn test_key_param() {
        assert_eq!(
            redact_sensitive("https://host/v1?key=AIzaSy123&alt=json"),
            "https://host/v1?key=***&alt=json"
        );
        assert_eq!(redact_sensitive("KEY=abc def"), "KEY=*** def");
    }

    #[test]
    fn test_trim_error() {
        assert_eq!(trim_error("  a\nb  "), "a b");

        let long = "x".repeat(1500);
        let trimmed = trim_error(&long);
        assert_eq!(trimmed.chars().count(), ERROR_DETAIL_LIMIT);
        assert!(trimmed.ends_with("..."));

        let exact = "y".repeat(ERROR_DETAIL_LIMIT);
        assert_eq!(trim_error(&exact), exact);
    }
}
