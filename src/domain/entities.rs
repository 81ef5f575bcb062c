//! Domain entities. Pure data structures for the core business.
//!
//! No filesystem/HTTP types here — these are produced and consumed by the
//! pipeline services.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// One photo attachment found in a dialog document.
///
/// `photo_url` is the maximum-width size variant of the photo; it is never
/// empty once a record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub owner_id: i64,
    /// Photo upload time, epoch seconds.
    pub timestamp: i64,
    pub photo_url: String,
}

/// The two identities that define a dialog, read from the document's `meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogMeta {
    pub owner_id: i64,
    pub peer_id: i64,
}

/// Identifier segregating records by originating document (file stem).
pub type GroupKey = String;

/// Set of owner identities observed across a corpus. Drives name resolution.
pub type OwnerIdSet = HashSet<i64>;

/// All records extracted from one scan directory, keyed by source document.
///
/// `BTreeMap` keeps group iteration deterministic; within a group, records
/// stay in document traversal order.
#[derive(Debug, Clone, Default)]
pub struct CorpusBundle {
    pub root: PathBuf,
    pub groups: BTreeMap<GroupKey, Vec<PhotoRecord>>,
}

impl CorpusBundle {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            groups: BTreeMap::new(),
        }
    }

    /// True if any group holds at least one record.
    pub fn has_content(&self) -> bool {
        self.groups.values().any(|records| !records.is_empty())
    }

    /// Total record count across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A planned download: where to write and what to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub destination: PathBuf,
    pub source_url: String,
}

/// Per-task result of the download engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded,
    /// Destination already existed with non-zero size; no fetch was issued.
    SkippedExists,
    Failed,
}

/// Aggregate result of one engine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DownloadSummary {
    pub fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded => self.downloaded += 1,
            DownloadOutcome::SkippedExists => self.skipped += 1,
            DownloadOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// How the per-dialog folder segment of destination paths is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderPolicy {
    /// Subfolder named after the source document (its GroupKey).
    PerDocument,
    /// No dialog subfolder; owner folders go directly under the scan root.
    Flat,
    /// Caller-supplied folder name shared by all groups.
    Custom(String),
}
