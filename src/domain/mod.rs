//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod filter;

pub use entities::{
    CorpusBundle, DialogMeta, DownloadOutcome, DownloadSummary, DownloadTask, FolderPolicy,
    GroupKey, OwnerIdSet, PhotoRecord,
};
pub use errors::DomainError;
pub use filter::GrabFilter;
