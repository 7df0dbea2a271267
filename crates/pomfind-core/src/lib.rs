//! Core building blocks for pomfind.
//!
//! Provides the shared error taxonomy and the bounded fetch pool that every
//! network request to a Maven repository goes through.

pub mod error;
pub mod fetcher;

pub use error::{Error, Result};
pub use fetcher::{DEFAULT_REPOSITORIES, FetchConfig, Fetched, Fetcher};
