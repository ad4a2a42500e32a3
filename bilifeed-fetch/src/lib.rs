// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Bilifeed Fetch
//!
//! Network side of bilifeed: the cookie-authenticated feed session, the
//! retrying page fetcher and the pagination engine.
//!
//! ## Layers
//!
//! - [`credentials::Credentials`] - Cookie material and the `Cookie` header
//! - [`client::FeedClient`] - HTTP implementation of [`source::FeedSource`]
//! - [`retry::fetch_page_with_retry`] - Backoff over any [`source::FeedSource`]
//! - [`pagination::Pager`] - Page walk, author filter, cache and stop rules
//!
//! ## Example
//!
//! ```ignore
//! use bilifeed_fetch::{Credentials, FetchOptions, SilentObserver, fetch_dynamics};
//! use bilifeed_store::CacheStore;
//!
//! let creds = Credentials::new("", sessdata);
//! let options = FetchOptions::from_settings(&settings);
//! let posts = fetch_dynamics(&creds, &options, Some(CacheStore::default()), &SilentObserver).await?;
//! ```

pub mod client;
pub mod context;
pub mod credentials;
pub mod error;
pub mod pagination;
pub mod response;
pub mod retry;
pub mod source;

pub use client::FeedClient;
pub use context::FetchOptions;
pub use credentials::{BILI_JCT, Credentials, DEDE_USER_ID, SESSDATA, parse_cookie_string};
pub use error::FetchError;
pub use pagination::{PageObserver, PageProgress, Pager, SilentObserver, fetch_dynamics};
pub use response::{FeedPage, FeedResponse, PageRequest, SUCCESS_CODE, TRANSPORT_FAILURE_CODE};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper, fetch_page_with_retry};
pub use source::FeedSource;
