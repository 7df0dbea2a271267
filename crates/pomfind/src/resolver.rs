//! Concurrent traversal of the dependency graph.
//!
//! Every node runs in its own task: claim the identity, pick a version from
//! metadata when none is declared, fetch and parse the descriptor, emit its
//! URL and spawn a task per followed child. Network I/O only happens inside
//! the [`Fetcher`] pool, so the number of tasks is unbounded while outbound
//! connections are not.

use crate::options::ResolveOptions;
use crate::output::UrlSink;
use crate::pending::{Pending, PendingGuard};
use dashmap::DashSet;
use pomfind_core::{Error, Fetcher, Result};
use pomfind_maven::{Dependency, Metadata, Project};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A descriptor that was fetched and parsed.
struct Resolved {
    url: String,
    project: Project,
}

/// Handle to one traversal run.
///
/// Cheap to clone. All clones share the dedup set, the failure flag and the
/// outstanding-work counter, so one `Resolver` covers one run.
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<Inner>,
}

struct Inner {
    opts: ResolveOptions,
    fetcher: Fetcher,
    sink: Arc<dyn UrlSink>,
    claimed: DashSet<String>,
    failed: AtomicBool,
    pending: Arc<Pending>,
}

impl Resolver {
    pub fn new(opts: ResolveOptions, fetcher: Fetcher, sink: Arc<dyn UrlSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                opts,
                fetcher,
                sink,
                claimed: DashSet::new(),
                failed: AtomicBool::new(false),
                pending: Pending::new(),
            }),
        }
    }

    /// Starts resolving `dep` and, when recursive, everything below it.
    ///
    /// Returns immediately. The work is registered before the task is
    /// spawned, so a later [`Resolver::wait`] always covers it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn resolve(&self, dep: Dependency) {
        let guard = self.inner.pending.register();
        let resolver = self.clone();
        tokio::spawn(async move { resolver.find_urls(dep, guard).await });
    }

    /// Waits until every resolution started so far, and everything those
    /// resolutions spawned, has finished.
    pub async fn wait(&self) {
        self.inner.pending.wait_idle().await;
    }

    /// True once any branch has failed. Never resets.
    pub fn failed(&self) -> bool {
        self.inner.failed.load(Ordering::Acquire)
    }

    /// Resolutions registered but not yet finished.
    pub fn outstanding(&self) -> usize {
        self.inner.pending.count()
    }

    /// Marks `id` as taken. Returns false if another task already took it.
    fn claim(&self, id: String) -> bool {
        self.inner.claimed.insert(id)
    }

    async fn find_urls(self, dep: Dependency, _guard: PendingGuard) {
        if !self.claim(dep.id()) {
            tracing::trace!("Skipping duplicate {}", dep.id());
            return;
        }

        match self.resolve_dep(&dep).await {
            Ok(Some(resolved)) => {
                self.inner.sink.emit(&resolved.url);
                if self.inner.opts.recursive {
                    self.expand(&resolved.project);
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Failed to resolve {}: {}", dep, e);
                self.inner.failed.store(true, Ordering::Release);
            }
        }
    }

    /// Fetches and parses the descriptor of `dep`.
    ///
    /// `Ok(None)` means the resolved version turned out to be claimed by
    /// another task already.
    async fn resolve_dep(&self, dep: &Dependency) -> Result<Option<Resolved>> {
        let mut target = dep.clone();
        let mut repo = None;

        if !target.has_version() {
            let path = target.metadata_path();
            let Some(fetched) = self.inner.fetcher.fetch(&path, None).await? else {
                return Err(Error::MetadataNotFound { path });
            };

            let metadata =
                Metadata::from_bytes(&fetched.body).map_err(|e| e.in_document(&fetched.url))?;
            let version = metadata.latest();
            if version.is_empty() {
                return Err(Error::DocumentFormat {
                    document: fetched.url,
                    message: "metadata lists no version".into(),
                });
            }

            tracing::debug!("Selected version {} for {}", version, dep);
            target.version = version.to_string();
            if !self.claim(target.id()) {
                tracing::trace!("Skipping duplicate {}", target.id());
                return Ok(None);
            }
            // Descriptors tend to live next to their metadata.
            repo = Some(fetched.repo);
        }

        let path = target.pom_path();
        let Some(fetched) = self.inner.fetcher.fetch(&path, repo.as_deref()).await? else {
            return Err(Error::PomNotFound { path });
        };

        let project =
            Project::from_bytes(&fetched.body).map_err(|e| e.in_document(&fetched.url))?;

        Ok(Some(Resolved {
            url: fetched.url,
            project,
        }))
    }

    /// Starts a resolution for every child the options allow.
    ///
    /// Runs while the caller still holds its own guard, so the outstanding
    /// count cannot drop to zero in between.
    fn expand(&self, project: &Project) {
        for child in project.all_dependencies() {
            if self.inner.opts.excludes(&child) {
                tracing::trace!("Not following {}", child);
                continue;
            }
            self.resolve(child);
        }
    }
}
