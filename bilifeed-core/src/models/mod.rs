//! Domain models for bilifeed.
//!
//! ## Submodules
//!
//! - [`post`] - The normalized post record
//! - [`query`] - Feed type, query mode and the cacheable query shape
//! - [`report`] - Summary report, sources and sentences

mod post;
mod query;
mod report;

// Re-export everything at the models level
pub use post::PostRecord;
pub use query::{FeedType, QueryMode, QueryShape, normalize_mid_list};
pub use report::{SummaryErrorKind, SummaryReport, SummarySentence, SummarySource};
