// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `Bilifeed` Core
//!
//! Core types, the payload normalizer and the post filters shared by every
//! other `bilifeed` crate.
//!
//! This crate provides:
//!
//! - Domain models (post records, summary reports, query shapes)
//! - The [`normalize`] module turning raw feed items into [`PostRecord`]s
//! - Time-window, keyword and author filters
//! - Display helpers and an explicit localization context
//! - Error types
//!
//! ## Key Types
//!
//! ### Feed Types
//! - [`PostRecord`] - One normalized dynamic
//! - [`FeedType`] - Feed category requested from the endpoint
//! - [`QueryMode`] - All followed authors or a selected subset
//! - [`QueryShape`] - Everything that identifies a fetch for caching
//!
//! ### Summary Types
//! - [`SummaryReport`] - Result of the summary pipeline
//! - [`SummarySource`] - A numbered source post
//! - [`SummarySentence`] - One sentence with its source references
//!
//! ### Localization
//! - [`Localizer`] - Translation table passed to whoever needs strings

pub mod error;
pub mod filter;
pub mod i18n;
pub mod models;
pub mod normalize;
pub mod text;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Feed types
    FeedType,
    PostRecord,
    QueryMode,
    QueryShape,
    normalize_mid_list,
    // Summary types
    SummaryErrorKind,
    SummaryReport,
    SummarySentence,
    SummarySource,
};

// Re-export the normalizer entry point and filters
pub use filter::{
    AuthorEntry, AuthorSort, apply_filters, group_by_author, match_author_keyword, match_keyword,
    within_range,
};
pub use i18n::{Localizer, detect_lang};
pub use normalize::normalize_item;
pub use text::{format_ts, kind_label, mask, parse_time_input, summarize_text};
