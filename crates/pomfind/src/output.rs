//! Destination of resolved descriptor URLs.
//!
//! Results go to their own stream; diagnostics are emitted through
//! `tracing` and never pass through a [`UrlSink`].

use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Receives one URL per successfully resolved descriptor.
pub trait UrlSink: Send + Sync {
    fn emit(&self, url: &str);
}

/// Writes each URL as a line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl UrlSink for StdoutSink {
    fn emit(&self, url: &str) {
        // Lock per line so concurrent tasks never interleave partial lines.
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{url}") {
            tracing::debug!("Failed to write result line: {}", e);
        }
    }
}

/// Keeps URLs in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectSink {
    urls: Mutex<Vec<String>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn urls(&self) -> Vec<String> {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl UrlSink for CollectSink {
    fn emit(&self, url: &str) {
        let mut urls = self
            .urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        urls.push(url.to_string());
    }
}
