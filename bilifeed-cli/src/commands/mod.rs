//! CLI command implementations.

pub mod authors;
pub mod config;
pub mod fetch;
pub mod summary;
