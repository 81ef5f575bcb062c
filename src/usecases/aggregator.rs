//! Corpus aggregation: run the extractor over every validated document of a
//! scan directory and merge results into one bundle.
//!
//! Per-document failures (unreadable, unparsable, malformed structure) are
//! logged and skipped — they never abort the corpus.

use crate::adapters::fs::scanner::{strip_bom, ScanResult};
use crate::domain::{CorpusBundle, DomainError, GrabFilter, GroupKey, OwnerIdSet};
use crate::usecases::extractor::{DialogExtraction, DialogExtractor};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Merges per-document extractions for one scan directory.
pub struct CorpusAggregator {
    extractor: DialogExtractor,
}

impl CorpusAggregator {
    pub fn new(filter: GrabFilter) -> Self {
        Self {
            extractor: DialogExtractor::new(filter),
        }
    }

    /// Parse and extract every file of `scan`, keyed by file stem.
    ///
    /// Returns the bundle plus the union of owner ids across its documents.
    pub async fn aggregate(&self, scan: &ScanResult) -> (CorpusBundle, OwnerIdSet) {
        debug!(
            path = %scan.root.display(),
            count = scan.files.len(),
            "aggregating json documents"
        );

        let mut bundle = CorpusBundle::new(scan.root.clone());
        let mut owner_ids = OwnerIdSet::new();

        for path in &scan.files {
            match self.extract_one(path).await {
                Ok((key, extraction)) => {
                    owner_ids.extend(extraction.owner_ids);
                    // keys cannot collide: one file stem per document per dir
                    bundle.groups.entry(key).or_default().extend(extraction.records);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "document skipped");
                }
            }
        }

        (bundle, owner_ids)
    }

    async fn extract_one(
        &self,
        path: &Path,
    ) -> Result<(GroupKey, DialogExtraction), DomainError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        let doc: Value = serde_json::from_slice(strip_bom(&bytes))
            .map_err(|e| DomainError::Parse(e.to_string()))?;
        let extraction = self.extractor.extract(&doc)?;
        Ok((group_key(path), extraction))
    }
}

/// GroupKey for a document: its file name without extension.
fn group_key(path: &Path) -> GroupKey {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fs::scanner::scan_dir;
    use std::io::Write;

    fn write_doc(dir: &Path, name: &str, content: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    const DIALOG_DOC: &str = r#"{"meta":{"v":"2.0","ownerId":1,"peer":2},"data":[
        {"attachments":[{"type":"photo","photo":{"owner_id":2,"date":1600000000,
            "sizes":[{"width":604,"url":"https://cdn.example/top.jpg"}]}}],
         "fwd_messages":[{"attachments":[{"type":"photo","photo":{"owner_id":1,"date":1600000100,
            "sizes":[{"width":604,"url":"https://cdn.example/fwd.jpg"}]}}]}]}
    ]}"#;

    #[tokio::test]
    async fn merges_documents_under_their_group_keys() {
        let tmp = tempfile::tempdir().unwrap();
        write_doc(tmp.path(), "alice.json", DIALOG_DOC);

        let scan = scan_dir(tmp.path()).await;
        let aggregator = CorpusAggregator::new(GrabFilter::Pair);
        let (bundle, owner_ids) = aggregator.aggregate(&scan).await;

        assert!(bundle.has_content());
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.groups["alice"].len(), 2);
        assert_eq!(owner_ids, OwnerIdSet::from([1, 2]));
    }

    #[tokio::test]
    async fn unparsable_document_is_skipped_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        write_doc(tmp.path(), "good.json", DIALOG_DOC);
        // passes the signature check but is truncated json
        write_doc(tmp.path(), "bad.json", "{\"meta\":{\"v\":\"2.0\",\"ownerId\":1");

        let scan = scan_dir(tmp.path()).await;
        assert_eq!(scan.files.len(), 2);

        let aggregator = CorpusAggregator::new(GrabFilter::All);
        let (bundle, _) = aggregator.aggregate(&scan).await;
        assert_eq!(bundle.groups.len(), 1);
        assert!(bundle.groups.contains_key("good"));
    }

    #[tokio::test]
    async fn aggregated_corpus_plans_distinct_destinations() {
        use crate::domain::FolderPolicy;
        use crate::usecases::planner;

        let tmp = tempfile::tempdir().unwrap();
        write_doc(tmp.path(), "alice.json", DIALOG_DOC);

        let scan = scan_dir(tmp.path()).await;
        let aggregator = CorpusAggregator::new(GrabFilter::Pair);
        let (bundle, _) = aggregator.aggregate(&scan).await;

        let tasks = planner::plan(&bundle, &FolderPolicy::PerDocument, &Default::default());
        assert_eq!(tasks.len(), 2);
        assert_ne!(tasks[0].destination, tasks[1].destination);
        // top-level photo owned by the peer, forwarded one by the owner
        assert!(tasks[0].destination.starts_with(bundle.root.join("alice").join("2")));
        assert!(tasks[1].destination.starts_with(bundle.root.join("alice").join("1")));
    }

    #[tokio::test]
    async fn empty_directory_has_no_content() {
        let tmp = tempfile::tempdir().unwrap();
        let scan = scan_dir(tmp.path()).await;
        let aggregator = CorpusAggregator::new(GrabFilter::All);
        let (bundle, owner_ids) = aggregator.aggregate(&scan).await;
        assert!(!bundle.has_content());
        assert!(owner_ids.is_empty());
    }
}
