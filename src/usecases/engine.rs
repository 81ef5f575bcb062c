//! Download engine: bounded-concurrency execution of planned tasks.
//!
//! - Pre-filters destinations that already exist non-empty (idempotent re-run)
//! - Fans out on tokio under a counting semaphore
//! - Bounded retry loop per task; transport and storage faults are retried
//!   the same way
//! - Failures are logged and counted, never raised to the caller

use crate::domain::{DomainError, DownloadOutcome, DownloadSummary, DownloadTask};
use crate::ports::FetchPort;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Total attempts per task (one initial try plus three retries).
pub const MAX_ATTEMPTS: u32 = 4;

/// Executes a task set against a [`FetchPort`].
pub struct DownloadEngine {
    fetcher: Arc<dyn FetchPort>,
    concurrency: usize,
}

impl DownloadEngine {
    /// `concurrency` must be positive; the config layer rejects 0 before
    /// construction.
    pub fn new(fetcher: Arc<dyn FetchPort>, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
        }
    }

    /// Run all tasks to completion and return the aggregate counts.
    pub async fn run(&self, tasks: Vec<DownloadTask>) -> DownloadSummary {
        let mut summary = DownloadSummary::default();

        let mut pending = Vec::with_capacity(tasks.len());
        for task in tasks {
            if exists_non_empty(&task.destination).await {
                summary.record(DownloadOutcome::SkippedExists);
            } else {
                pending.push(task);
            }
        }
        if summary.skipped > 0 {
            info!(count = summary.skipped, "pictures already exist, ignored");
        }
        if pending.is_empty() {
            info!("download list is empty");
            return summary;
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut set = JoinSet::new();
        for task in pending {
            let sem = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&self.fetcher);
            set.spawn(async move {
                let _permit = sem.acquire().await.expect("semaphore closed");
                download_one(&*fetcher, &task).await
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    error!(error = %e, "download task panicked");
                    summary.record(DownloadOutcome::Failed);
                }
            }
        }

        if summary.is_success() {
            info!(count = summary.downloaded, "all photos downloaded");
        } else {
            warn!(
                failed = summary.failed,
                total = summary.total(),
                "some photos were not downloaded"
            );
        }
        summary
    }
}

/// One task: explicit bounded retry loop holding the last error. The slot in
/// the semaphore stays held across retries.
async fn download_one(fetcher: &dyn FetchPort, task: &DownloadTask) -> DownloadOutcome {
    let mut last_err: Option<DomainError> = None;
    for attempt in 1..=MAX_ATTEMPTS {
        match try_download(fetcher, task).await {
            Ok(()) => {
                debug!(url = %task.source_url, path = %task.destination.display(), "downloaded");
                return DownloadOutcome::Downloaded;
            }
            Err(e) => {
                debug!(url = %task.source_url, attempt, error = %e, "attempt failed");
                last_err = Some(e);
            }
        }
    }
    error!(
        url = %task.source_url,
        path = %task.destination.display(),
        error = %last_err.expect("at least one attempt ran"),
        "problem with downloading image"
    );
    DownloadOutcome::Failed
}

async fn try_download(fetcher: &dyn FetchPort, task: &DownloadTask) -> Result<(), DomainError> {
    let body = fetcher.fetch(&task.source_url).await?;
    if let Some(parent) = task.destination.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
    }
    tokio::fs::write(&task.destination, &body)
        .await
        .map_err(|e| DomainError::Storage(e.to_string()))
}

async fn exists_non_empty(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(_) => false,
    }
}
