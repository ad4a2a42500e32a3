//! Localization context.
//!
//! A [`Localizer`] is built once at start-up and passed by reference to
//! whatever renders user-facing text. There is no global translation state.
//!
//! Tables are flat `key -> template` maps; templates use `{name}`
//! placeholders. Built-in tables exist for `en-US` and `zh-CN`, and a
//! directory of `<lang>.json` files can replace them.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

/// Language used when nothing else matches.
pub const DEFAULT_LANG: &str = "en-US";

const EN_US: &[(&str, &str)] = &[
    ("unknown_error", "Unknown error"),
    (
        "no_cookies",
        "No cookies provided. Set cookie or sessdata in the config file or pass --cookie / --sessdata.",
    ),
    ("request_failed", "Request failed (code={code}): {msg}"),
    ("page_header", "Page {page}: {items} items, has_more={has_more}"),
    ("eta_hint", "Estimated time remaining: {seconds}s"),
    ("page_continue", "Press Enter for the next page, or q to stop: "),
    ("no_data_in_range", "No dynamics found in the selected range."),
    ("cache_hit", "Loaded {count} dynamics from cache."),
    ("time_format_error", "Invalid time '{value}', expected {fmt}."),
    ("auth_saved", "Saved updated auth material to {path}."),
    ("kind_archive", "Video"),
    ("kind_pgc", "Bangumi"),
    ("kind_ugc_season", "Collection"),
    ("kind_opus", "Post"),
    ("kind_draw", "Images"),
    ("kind_article", "Article"),
    ("kind_common", "Card"),
    ("kind_live", "Live"),
    ("kind_music", "Music"),
    (
        "local_summary_collected",
        "Collected {count} dynamics in the selected range.",
    ),
    ("local_summary_types", "Main content types are {value}."),
    ("local_summary_recent", "Recent focus includes: {value}."),
    ("authors_header", "Authors ({count})"),
    ("up_item_label", "{name} ({mid}) - {count}"),
    ("no_author_match", "No author matches '{keyword}'."),
    ("author_not_found", "Author {mid} has no dynamics in the fetched range."),
    ("summary_title", "Summary for {name}"),
    ("summary_provider_used", "Provider: {provider}"),
    ("summary_notice", "Notice: {error} ({detail})"),
    ("summary_sources", "Sources"),
    ("page_of", "Page {page}/{total}"),
    ("label_title", "Title"),
    ("label_time", "Time"),
    ("label_kind", "Kind"),
    ("label_url", "URL"),
    ("label_media", "Media"),
    ("label_text", "Text"),
    ("label_reshared", "Reshared from {name}"),
];

const ZH_CN: &[(&str, &str)] = &[
    ("unknown_error", "未知错误"),
    (
        "no_cookies",
        "未提供 Cookie。请在配置文件中设置 cookie 或 sessdata，或使用 --cookie / --sessdata。",
    ),
    ("request_failed", "请求失败（code={code}）：{msg}"),
    ("page_header", "第 {page} 页：{items} 条，has_more={has_more}"),
    ("eta_hint", "预计剩余时间：{seconds} 秒"),
    ("page_continue", "回车继续下一页，输入 q 停止："),
    ("no_data_in_range", "所选范围内没有动态。"),
    ("cache_hit", "已从缓存加载 {count} 条动态。"),
    ("time_format_error", "时间格式无效：'{value}'，应为 {fmt}。"),
    ("auth_saved", "已将更新的登录信息保存到 {path}。"),
    ("kind_archive", "视频"),
    ("kind_pgc", "番剧"),
    ("kind_ugc_season", "合集"),
    ("kind_opus", "图文"),
    ("kind_draw", "图片"),
    ("kind_article", "专栏"),
    ("kind_common", "卡片"),
    ("kind_live", "直播"),
    ("kind_music", "音频"),
    ("local_summary_collected", "所选范围内共收集到 {count} 条动态。"),
    ("local_summary_types", "主要内容类型为 {value}。"),
    ("local_summary_recent", "近期关注：{value}。"),
    ("authors_header", "UP 主（{count}）"),
    ("up_item_label", "{name}（{mid}）- {count}"),
    ("no_author_match", "没有匹配 '{keyword}' 的 UP 主。"),
    ("author_not_found", "UP 主 {mid} 在本次获取范围内没有动态。"),
    ("summary_title", "{name} 的动态摘要"),
    ("summary_provider_used", "摘要来源：{provider}"),
    ("summary_notice", "提示：{error}（{detail}）"),
    ("summary_sources", "来源"),
    ("page_of", "第 {page}/{total} 页"),
    ("label_title", "标题"),
    ("label_time", "时间"),
    ("label_kind", "类型"),
    ("label_url", "链接"),
    ("label_media", "媒体"),
    ("label_text", "内容"),
    ("label_reshared", "转发自 {name}"),
];

/// Maps a locale string to a supported language code.
fn resolve_lang(raw: &str) -> &'static str {
    if raw.trim().to_lowercase().starts_with("zh") {
        "zh-CN"
    } else {
        DEFAULT_LANG
    }
}

/// Detects the language from `LC_ALL`, then `LANG`.
pub fn detect_lang() -> String {
    let raw = ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_default();
    resolve_lang(&raw).to_string()
}

/// Translation table for one language.
#[derive(Debug, Clone)]
pub struct Localizer {
    lang: String,
    table: HashMap<String, String>,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(DEFAULT_LANG)
    }
}

impl Localizer {
    /// Builds a localizer from the built-in tables.
    pub fn new(lang: &str) -> Self {
        let lang = resolve_lang(lang);
        let source = if lang == "zh-CN" { ZH_CN } else { EN_US };
        Self {
            lang: lang.to_string(),
            table: source
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Loads `<dir>/<lang>.json`, falling back to `<dir>/en-US.json` and
    /// then to the built-in tables.
    pub fn from_dir(dir: &Path, lang: &str) -> Self {
        let candidates = [
            (dir.join(format!("{lang}.json")), lang),
            (dir.join(format!("{DEFAULT_LANG}.json")), DEFAULT_LANG),
        ];
        for (path, loaded) in &candidates {
            if !path.exists() {
                continue;
            }
            match load_table(path) {
                Ok(table) => {
                    debug!(path = %path.display(), keys = table.len(), "Loaded language file");
                    return Self {
                        lang: (*loaded).to_string(),
                        table,
                    };
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring unreadable language file");
                }
            }
        }
        Self::new(lang)
    }

    /// Language code of the loaded table.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Looks up `key` and fills `{name}` placeholders.
    ///
    /// A missing key renders as the key itself.
    pub fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = self.table.get(key).map_or(key, String::as_str);
        fill(template, params)
    }

    /// Like [`Localizer::t`], but renders `default` when the key is missing.
    pub fn t_or(&self, key: &str, default: &str, params: &[(&str, &str)]) -> String {
        let template = self.table.get(key).map_or(default, String::as_str);
        fill(template, params)
    }
}

fn fill(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{name}}}"), value)
        })
}

fn load_table(path: &Path) -> Result<HashMap<String, String>, crate::CoreError> {
    let content = std::fs::read_to_string(path)?;
    let raw: HashMap<String, Value> = serde_json::from_str(&content)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| {
            let text = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, text)
        })
        .collect())
}
