//! Filesystem adapters.

pub mod scanner;

pub use scanner::{scan_dir, ScanResult, DOCUMENT_SIGNATURE};
