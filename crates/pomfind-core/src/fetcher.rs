//! Bounded pool of HTTP workers probing Maven repositories.
//!
//! Resolution tasks never talk to the network directly. They submit a
//! [`FetchJob`] to a shared bounded queue and wait on a private oneshot
//! channel for exactly one reply. A fixed number of long-lived workers drain
//! the queue, so the number of open connections stays bounded no matter how
//! wide the dependency tree grows.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   async_channel (cap N)   ┌──────────┐    GET repo/path
//! │ resolve t1  │──┐                        │ worker 1 │──────────────────►
//! │ resolve t2  │──┼──────── FetchJob ─────►│   ...    │
//! │ resolve tM  │──┘                        │ worker N │──────────────────►
//! └─────────────┘◄──── oneshot reply ───────└──────────┘
//! ```
//!
//! # Probe rules
//!
//! - A job pinned to a repository only tries that repository.
//! - Otherwise repositories are tried in configured order; first 200 wins.
//! - 404 is authoritative: move to the next repository without retrying.
//! - Any other failure is retried `retries` times with a fixed delay.

use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::StatusCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

/// Maven repositories probed when no custom list is configured.
pub const DEFAULT_REPOSITORIES: &[&str] = &[
    "https://repo.maven.apache.org/maven2",
    "https://dl.google.com/dl/android/maven2",
    "https://repository.sonatype.org/content/groups/sonatype-public-grid",
    "https://plugins.gradle.org/m2",
    "https://jitpack.io",
];

const DEFAULT_WORKERS: usize = 50;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
const DEFAULT_RETRIES: u32 = 2;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Fetch pool settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Number of workers, also the queue capacity.
    pub workers: usize,
    /// Timeout of a single HTTP attempt.
    pub timeout: Duration,
    /// Extra attempts after a non-404 failure, per repository.
    pub retries: u32,
    /// Pause between two attempts against the same URL.
    pub retry_delay: Duration,
    /// Candidate repository base URLs, in probe order.
    pub repositories: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            repositories: DEFAULT_REPOSITORIES
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
        }
    }
}

/// A successfully fetched document.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Absolute URL that answered with 200.
    pub url: String,
    /// Repository base URL the document was found in.
    pub repo: String,
    pub body: Bytes,
}

/// Unit of work for the pool: one relative path, optionally pinned to a repository.
struct FetchJob {
    path: String,
    repo: Option<String>,
    reply: oneshot::Sender<Option<Fetched>>,
}

/// Handle to the worker pool.
///
/// Cheap to clone; all clones share the same queue. Workers exit once every
/// handle has been dropped and the queue is drained.
#[derive(Clone)]
pub struct Fetcher {
    queue: async_channel::Sender<FetchJob>,
    submitted: Arc<AtomicUsize>,
}

impl Fetcher {
    /// Starts `config.workers` workers on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero worker count or an empty
    /// repository list, and [`Error::HttpClient`] if the client cannot be built.
    pub fn new(config: FetchConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(Error::Config("worker count must be at least 1".into()));
        }
        if config.repositories.is_empty() {
            return Err(Error::Config("repository list is empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::HttpClient)?;

        let (tx, rx) = async_channel::bounded(config.workers);
        let workers = config.workers;
        let worker = Arc::new(Worker { client, config });

        for id in 0..workers {
            let worker = Arc::clone(&worker);
            let rx = rx.clone();
            tokio::spawn(async move { worker.run(id, rx).await });
        }

        tracing::debug!(
            "Started fetch pool with {} workers over {} repositories",
            workers,
            worker.config.repositories.len()
        );

        Ok(Self {
            queue: tx,
            submitted: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Fetches `path` from the first repository that has it.
    ///
    /// With `repo` set, only that repository is probed. Blocks while the
    /// queue is full.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(fetched))` - a repository answered with 200
    /// - `Ok(None)` - every candidate repository was exhausted
    /// - `Err(Error::PoolClosed)` - the workers are gone
    pub async fn fetch(&self, path: &str, repo: Option<&str>) -> Result<Option<Fetched>> {
        let (reply, result) = oneshot::channel();
        let job = FetchJob {
            path: path.to_string(),
            repo: repo.map(str::to_string),
            reply,
        };

        self.queue.send(job).await.map_err(|_| Error::PoolClosed)?;
        self.submitted.fetch_add(1, Ordering::Relaxed);

        result.await.map_err(|_| Error::PoolClosed)
    }

    /// Number of jobs accepted by the queue so far.
    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::Relaxed)
    }
}

struct Worker {
    client: reqwest::Client,
    config: FetchConfig,
}

impl Worker {
    async fn run(&self, id: usize, queue: async_channel::Receiver<FetchJob>) {
        while let Ok(job) = queue.recv().await {
            let result = match job.repo.as_deref() {
                Some(repo) => self.try_repos(&job.path, std::slice::from_ref(&repo)).await,
                None => {
                    let repos: Vec<&str> =
                        self.config.repositories.iter().map(String::as_str).collect();
                    self.try_repos(&job.path, &repos).await
                }
            };
            // The submitter may have given up; nothing left to do then.
            let _ = job.reply.send(result);
        }
        tracing::trace!("Fetch worker {} stopped", id);
    }

    async fn try_repos(&self, path: &str, repos: &[&str]) -> Option<Fetched> {
        for repo in repos {
            match self.try_repo(repo, path).await {
                Ok(fetched) => return Some(fetched),
                Err(e) => tracing::debug!("{}", e),
            }
        }
        None
    }

    async fn try_repo(&self, repo: &str, path: &str) -> Result<Fetched> {
        let url = format!("{repo}/{path}");
        let data = self.retry_fetch(&url).await?;
        Ok(Fetched {
            url,
            repo: repo.to_string(),
            body: data,
        })
    }

    async fn retry_fetch(&self, url: &str) -> Result<Bytes> {
        let attempts = self.config.retries.saturating_add(1);
        let mut reason = String::new();

        for attempt in 1..=attempts {
            match self.client.get(url).send().await {
                Ok(resp) if resp.status() == StatusCode::OK => match resp.bytes().await {
                    Ok(body) => return Ok(body),
                    Err(e) => reason = format!("failed to read body: {e}"),
                },
                Ok(resp) if resp.status() == StatusCode::NOT_FOUND => {
                    return Err(Error::Network {
                        url: url.to_string(),
                        reason: "status 404".into(),
                    });
                }
                Ok(resp) => reason = format!("status {}", resp.status().as_u16()),
                Err(e) => reason = e.to_string(),
            }

            if attempt < attempts {
                tracing::warn!(
                    "retrying {}/{} due to {}, url: {}",
                    attempt,
                    self.config.retries,
                    reason,
                    url
                );
                tokio::time::sleep(self.config.retry_delay).await;
            }
        }

        Err(Error::Network {
            url: url.to_string(),
            reason,
        })
    }
}
