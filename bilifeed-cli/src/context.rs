//! Per-invocation state: the settings file and the interface language.

use bilifeed_core::{Localizer, detect_lang};
use bilifeed_store::{SettingsStore, default_lang_dir, default_settings_path};

use crate::Cli;

/// Settings and strings for one command run.
pub struct AppContext {
    /// Loaded settings file.
    pub store: SettingsStore,
    /// Interface strings.
    pub lang: Localizer,
}

impl AppContext {
    /// Loads the settings file named by `--config` (or the default one) and
    /// picks the language from `--lang`, the settings, then the locale.
    pub async fn load(cli: &Cli) -> Self {
        let path = cli.config.clone().unwrap_or_else(default_settings_path);
        let store = SettingsStore::load(path).await;
        let saved = store.get().await.lang;

        let lang = resolve_lang(cli.lang.as_deref(), &saved);
        Self {
            store,
            lang: Localizer::from_dir(&default_lang_dir(), &lang),
        }
    }
}

/// First explicit language wins; `auto` or nothing means the locale.
fn resolve_lang(flag: Option<&str>, saved: &str) -> String {
    [flag.unwrap_or_default(), saved]
        .into_iter()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.eq_ignore_ascii_case("auto"))
        .map_or_else(detect_lang, str::to_string)
}
