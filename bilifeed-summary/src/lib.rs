// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Bilifeed Summary
//!
//! Attributed summaries of one author's dynamics. Every sentence cites the
//! numbered source posts it is based on.
//!
//! ## Providers
//!
//! | Provider | Name | Auth | Notes |
//! |----------|------|------|-------|
//! | Local | `local`, `none`, empty | - | Extractive, always available |
//! | OpenAI | `openai` | Bearer | Chat completions or responses API |
//! | OpenAI-compatible | `custom_openai` | Bearer | Requires a base URL |
//! | Gemini | `gemini` | Key in query | `generateContent` |
//!
//! Model answers are parsed leniently ([`extract`]), checked against the
//! source indices ([`validate`]), and replaced by the local summary when
//! nothing grounded survives.
//!
//! ## Usage
//!
//! ```ignore
//! use bilifeed_summary::{SummaryOptions, summarize_user_dynamics};
//!
//! let report = summarize_user_dynamics(&posts, &SummaryOptions::default(), &lang).await;
//! for s in &report.sentences {
//!     println!("{} {:?}", s.sentence, s.refs);
//! }
//! ```

pub mod error;
pub mod extract;
pub mod gemini;
pub mod local;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod redact;
pub mod registry;
pub mod sources;
pub mod validate;

pub use error::ProviderError;
pub use extract::extract_json;
pub use gemini::GeminiProvider;
pub use local::local_summary;
pub use openai::{ApiMode, OpenAiConfig, OpenAiProvider};
pub use pipeline::{LOCAL_PROVIDER, SummaryOptions, summarize_user_dynamics, summarize_with};
pub use prompt::build_prompt;
pub use provider::SummaryProvider;
pub use redact::{redact_sensitive, trim_error};
pub use registry::{ProviderKind, ProviderRegistry};
pub use sources::select_sources;
pub use validate::normalize_summary;
