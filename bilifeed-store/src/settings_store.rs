//! User settings store.
//!
//! Settings live in a single `config.json`. Every field has a default, so a
//! partial file is fine; a file that does not parse at all is ignored with a
//! warning.

use bilifeed_core::{AuthorSort, FeedType, QueryMode, normalize_mid_list};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

// ============================================================================
// Defaults
// ============================================================================

/// Feed endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.bilibili.com/x/polymer/web-dynamic/v1/feed/all";
/// Feature-flag string sent with every page request.
pub const DEFAULT_FEATURES: &str = "itemOpusStyle";
/// Location tag sent with every page request.
pub const DEFAULT_WEB_LOCATION: &str = "333.1365";
/// Pages fetched per run.
pub const DEFAULT_PAGES: u32 = 5;
/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
/// Retries after the first attempt.
pub const DEFAULT_REQUEST_RETRIES: u32 = 2;
/// First retry delay in seconds.
pub const DEFAULT_RETRY_BACKOFF_SECONDS: f64 = 1.0;
/// Retry delay multiplier.
pub const DEFAULT_RETRY_BACKOFF_FACTOR: f64 = 2.0;
/// Records per display page.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Cache lifetime in minutes.
pub const DEFAULT_CACHE_TTL_MINUTES: i64 = 60;
/// Maximum posts handed to the summary pipeline.
pub const DEFAULT_SUMMARY_MAX_ITEMS: usize = 80;
/// Summary request timeout in seconds.
pub const DEFAULT_SUMMARY_TIMEOUT_SECONDS: u64 = 45;
/// Display wrap width.
pub const DEFAULT_UI_WRAP_WIDTH: u16 = 76;

// ============================================================================
// View Mode
// ============================================================================

/// How records are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One line per record.
    #[default]
    Summary,
    /// Every field of every record.
    Detail,
}

impl ViewMode {
    /// Config / CLI spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Detail => "detail",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "detail" => Ok(Self::Detail),
            other => Err(StoreError::Config(format!("unknown view mode: {other}"))),
        }
    }
}

// ============================================================================
// Settings Types
// ============================================================================

/// Query and display defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchDefaults {
    /// Feed category.
    #[serde(rename = "type")]
    pub feed_type: FeedType,
    /// All authors or a selected set.
    pub query_mode: QueryMode,
    /// Comma-separated author ids for `selected_up`.
    pub target_up_mids: String,
    /// Last author-list filter keyword.
    pub up_filter_keyword: String,
    /// Maximum pages per run.
    pub pages: u32,
    /// Ask before each further page.
    pub interactive: bool,
    /// Feed endpoint URL.
    pub endpoint: String,
    /// Feature-flag string.
    pub features: String,
    /// Location tag.
    pub web_location: String,
    /// Per-request timeout.
    pub timeout_seconds: u64,
    /// Author list order.
    pub sort: AuthorSort,
    /// Record list style.
    pub view: ViewMode,
    /// Records per display page.
    pub page_size: usize,
    /// Post keyword filter.
    pub keyword: String,
    /// Window start, `YYYY-MM-DD[ HH:MM[:SS]]`.
    pub time_from: String,
    /// Window end, same format.
    pub time_to: String,
}

impl Default for FetchDefaults {
    fn default() -> Self {
        Self {
            feed_type: FeedType::All,
            query_mode: QueryMode::All,
            target_up_mids: String::new(),
            up_filter_keyword: String::new(),
            pages: DEFAULT_PAGES,
            interactive: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            features: DEFAULT_FEATURES.to_string(),
            web_location: DEFAULT_WEB_LOCATION.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            sort: AuthorSort::Desc,
            view: ViewMode::Summary,
            page_size: DEFAULT_PAGE_SIZE,
            keyword: String::new(),
            time_from: String::new(),
            time_to: String::new(),
        }
    }
}

/// Request pacing and retry knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchTuning {
    /// Pause between pages.
    pub request_interval_seconds: f64,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// First retry delay.
    pub retry_backoff_seconds: f64,
    /// Retry delay multiplier.
    pub retry_backoff_factor: f64,
}

impl Default for FetchTuning {
    fn default() -> Self {
        Self {
            request_interval_seconds: 0.0,
            max_retries: DEFAULT_REQUEST_RETRIES,
            retry_backoff_seconds: DEFAULT_RETRY_BACKOFF_SECONDS,
            retry_backoff_factor: DEFAULT_RETRY_BACKOFF_FACTOR,
        }
    }
}

/// Summary provider options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// `local`, `openai`, `custom_openai` or `gemini`.
    pub provider: String,
    /// `chat_completions` or `responses`.
    pub api_mode: String,
    /// Model name, empty for the provider default.
    pub model: String,
    /// Provider API key.
    pub api_key: String,
    /// Base URL for OpenAI-compatible endpoints.
    pub base_url: String,
    /// Ask chat-completion endpoints for a JSON object.
    pub use_json_format: bool,
    /// Extra request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Maximum sources per summary.
    pub max_items: usize,
    /// Request timeout.
    pub timeout_seconds: u64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            provider: "local".to_string(),
            api_mode: "chat_completions".to_string(),
            model: String::new(),
            api_key: String::new(),
            base_url: String::new(),
            use_json_format: true,
            extra_headers: BTreeMap::new(),
            max_items: DEFAULT_SUMMARY_MAX_ITEMS,
            timeout_seconds: DEFAULT_SUMMARY_TIMEOUT_SECONDS,
        }
    }
}

/// Contents of `config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Raw `Cookie` header value.
    pub cookie: String,
    /// `SESSDATA` cookie value.
    pub sessdata: String,
    /// Display language, empty to detect.
    pub lang: String,
    /// Use the feed cache.
    pub cache: bool,
    /// Cache lifetime; zero or less never expires.
    pub cache_ttl_minutes: i64,
    /// Write auth material passed on the command line back to this file.
    pub auto_save_auth: bool,
    /// Display wrap width.
    pub ui_wrap_width: u16,
    /// Query and display defaults.
    pub defaults: FetchDefaults,
    /// Request pacing.
    pub fetch: FetchTuning,
    /// Summary options.
    pub summary: SummarySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cookie: String::new(),
            sessdata: String::new(),
            lang: String::new(),
            cache: true,
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
            auto_save_auth: false,
            ui_wrap_width: DEFAULT_UI_WRAP_WIDTH,
            defaults: FetchDefaults::default(),
            fetch: FetchTuning::default(),
            summary: SummarySettings::default(),
        }
    }
}

impl Settings {
    /// Clamps numeric fields into their valid ranges and normalizes the
    /// target author list.
    pub fn clamp(&mut self) {
        self.ui_wrap_width = self.ui_wrap_width.clamp(40, 200);

        let d = &mut self.defaults;
        d.pages = d.pages.max(1);
        d.timeout_seconds = d.timeout_seconds.max(1);
        d.page_size = d.page_size.max(1);
        d.target_up_mids = normalize_mid_list(&d.target_up_mids);

        let f = &mut self.fetch;
        f.request_interval_seconds = non_negative(f.request_interval_seconds);
        f.retry_backoff_seconds = non_negative(f.retry_backoff_seconds);
        f.retry_backoff_factor = if f.retry_backoff_factor.is_finite() {
            f.retry_backoff_factor.max(1.0)
        } else {
            DEFAULT_RETRY_BACKOFF_FACTOR
        };

        let s = &mut self.summary;
        s.max_items = s.max_items.max(1);
        s.timeout_seconds = s.timeout_seconds.max(5);
    }

    /// Returns a clamped copy.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.clamp();
        self
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Settings file plus its in-memory copy.
pub struct SettingsStore {
    settings: RwLock<Settings>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store holding defaults for `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: RwLock::new(Settings::default()),
            path,
        }
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from `path`, falling back to defaults.
    pub async fn load(path: PathBuf) -> Self {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json::<Settings>(&path)
                .await
                .map(Settings::clamped)
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Failed to load settings, using defaults");
                    Settings::default()
                })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Self {
            settings: RwLock::new(settings),
            path,
        }
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates the in-memory settings.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Stores non-empty auth material that differs from the saved values.
    ///
    /// Returns true if anything changed; the file is only written then.
    ///
    /// # Errors
    ///
    /// Returns error if the settings file cannot be written.
    pub async fn persist_auth(&self, cookie: &str, sessdata: &str) -> Result<bool, StoreError> {
        let (cookie, sessdata) = (cookie.trim(), sessdata.trim());
        let changed = {
            let mut settings = self.settings.write().await;
            let mut changed = false;
            if !cookie.is_empty() && cookie != settings.cookie {
                settings.cookie = cookie.to_string();
                changed = true;
            }
            if !sessdata.is_empty() && sessdata != settings.sessdata {
                settings.sessdata = sessdata.to_string();
                changed = true;
            }
            changed
        };
        if changed {
            self.save().await?;
        }
        Ok(changed)
    }

    /// Stores the author-list filter keyword if it differs.
    ///
    /// # Errors
    ///
    /// Returns error if the settings file cannot be written.
    pub async fn persist_up_filter_keyword(&self, keyword: &str) -> Result<bool, StoreError> {
        let changed = {
            let mut settings = self.settings.write().await;
            if settings.defaults.up_filter_keyword == keyword {
                false
            } else {
                settings.defaults.up_filter_keyword = keyword.to_string();
                true
            }
        };
        if changed {
            self.save().await?;
        }
        Ok(changed)
    }
}
