//! Cookie credentials.
//!
//! The feed only accepts browser cookies. They can be supplied as a full
//! `Cookie` header string, as individual values, or both; individual values
//! never override a cookie already present in the string.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::FetchError;

/// Session cookie name.
pub const SESSDATA: &str = "SESSDATA";
/// User id cookie name.
pub const DEDE_USER_ID: &str = "DedeUserID";
/// CSRF token cookie name.
pub const BILI_JCT: &str = "bili_jct";

/// Splits a `Cookie` header value into name/value pairs.
///
/// Fragments without `=` are ignored; values may contain `=`.
pub fn parse_cookie_string(cookie: &str) -> BTreeMap<String, String> {
    cookie
        .split(';')
        .map(str::trim)
        .filter_map(|part| part.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

/// Pre-obtained cookie material.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Full cookie string, `name=value; ...`.
    pub cookie: String,
    /// `SESSDATA` value.
    pub sessdata: String,
    /// `DedeUserID` value.
    pub dedeuserid: String,
    /// `bili_jct` value.
    pub bili_jct: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("cookie", &bilifeed_core::mask(&self.cookie))
            .field("sessdata", &bilifeed_core::mask(&self.sessdata))
            .field("dedeuserid", &self.dedeuserid)
            .field("bili_jct", &bilifeed_core::mask(&self.bili_jct))
            .finish()
    }
}

impl Credentials {
    /// Creates credentials from a cookie string and a `SESSDATA` value.
    pub fn new(cookie: impl Into<String>, sessdata: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            sessdata: sessdata.into(),
            ..Default::default()
        }
    }

    /// Merged cookie map sent with every request.
    pub fn cookie_map(&self) -> BTreeMap<String, String> {
        let mut cookies = parse_cookie_string(&self.cookie);
        for (name, value) in [
            (SESSDATA, &self.sessdata),
            (DEDE_USER_ID, &self.dedeuserid),
            (BILI_JCT, &self.bili_jct),
        ] {
            let value = value.trim();
            if !value.is_empty() {
                cookies
                    .entry(name.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
        cookies
    }

    /// Returns true if no cookie at all is available.
    pub fn is_empty(&self) -> bool {
        self.cookie_map().is_empty()
    }

    /// The `Cookie` header value.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NoCredentials`] if there is nothing to send.
    pub fn cookie_header(&self) -> Result<String, FetchError> {
        let cookies = self.cookie_map();
        if cookies.is_empty() {
            return Err(FetchError::NoCredentials);
        }
        Ok(cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; "))
    }

    /// `(sessdata, cookie)` values that identify this session in the
    /// cache fingerprint.
    pub fn fingerprint_material(&self) -> (String, String) {
        let cookies = self.cookie_map();
        let get = |key: &str| cookies.get(key).cloned().unwrap_or_default();
        (get(SESSDATA), get("Cookie"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_string() {
        let cookies = parse_cookie_string(" SESSDATA=abc%2C; bili_jct = x=y ;broken; =v; ");
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies["SESSDATA"], "abc%2C");
        assert_eq!(cookies["bili_jct"], "x=y");
    }

    #[test]
    fn test_cookie_string_wins_over_fields() {
        let creds = Credentials {
            cookie: "SESSDATA=from_cookie".to_string(),
            sessdata: "from_field".to_string(),
            dedeuserid: "42".to_string(),
            ..Default::default()
        };
        let map = creds.cookie_map();
        assert_eq!(map[SESSDATA], "from_cookie");
        assert_eq!(map[DEDE_USER_ID], "42");
        assert!(!map.contains_key(BILI_JCT));
    }

    #[test]
    fn test_empty_credentials() {
        let creds = Credentials::new("junk", "  ");
        assert!(creds.is_empty());
        assert!(matches!(creds.cookie_header(), Err(FetchError::NoCredentials)));
    }

    #[test]
    fn test_cookie_header() {
        let creds = Credentials::new("b=2; a=1", "s");
        assert_eq!(creds.cookie_header().unwrap(), "SESSDATA=s; a=1; b=2");
        assert_eq!(creds.fingerprint_material(), ("s".to_string(), String::new()));
    }

    #[test]
    fn test_debug_masks_secrets() {
        let creds = Credentials::new("", "supersecretvalue");
        let printed = format!("{creds:?}");
        assert!(!printed.contains("supersecretvalue"));
    }
}
