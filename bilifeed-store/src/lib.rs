// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `Bilifeed` Store
//!
//! On-disk state for `bilifeed`.
//!
//! This crate provides:
//!
//! - **`CacheStore`**: Fingerprint-keyed feed cache with a TTL
//! - **`SettingsStore`**: The `config.json` settings file
//! - **Persistence**: Atomic, owner-only JSON file helpers
//!
//! ## Usage
//!
//! ```ignore
//! use bilifeed_store::{CacheStore, compute_fingerprint};
//!
//! let cache = CacheStore::default();
//! let key = compute_fingerprint(&shape);
//!
//! let posts = cache.load(&key, 60).await;
//! if posts.is_empty() {
//!     let fresh = fetch().await;
//!     cache.save(&key, &fresh).await?;
//! }
//! ```

pub mod cache;
pub mod error;
pub mod persistence;
pub mod settings_store;

pub use cache::{CacheEntry, CacheStore, compute_fingerprint};
pub use error::StoreError;
pub use persistence::{
    default_cache_dir, default_config_dir, default_lang_dir, default_settings_path, load_json,
    load_json_or_default, save_json,
};
pub use settings_store::{
    DEFAULT_ENDPOINT, DEFAULT_FEATURES, DEFAULT_WEB_LOCATION, FetchDefaults, FetchTuning, Settings,
    SettingsStore, SummarySettings, ViewMode,
};
