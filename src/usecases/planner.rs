//! Download planning: turn a corpus bundle into concrete destination paths.
//!
//! Pure — no I/O. Re-planning the same bundle with the same name map yields
//! byte-identical task lists, which makes re-runs idempotent end to end.

use crate::domain::{CorpusBundle, DownloadTask, FolderPolicy, PhotoRecord};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;

/// Plan one task per record: `root / group / owner / <stamp>_<basename>`.
///
/// `names` substitutes display names for owner folders; missing entries fall
/// back to the decimal owner id.
pub fn plan(
    bundle: &CorpusBundle,
    policy: &FolderPolicy,
    names: &HashMap<i64, String>,
) -> Vec<DownloadTask> {
    let mut tasks = Vec::with_capacity(bundle.len());
    for (key, records) in &bundle.groups {
        let group_segment: Option<&str> = match policy {
            FolderPolicy::PerDocument => Some(key.as_str()),
            FolderPolicy::Flat => None,
            FolderPolicy::Custom(name) => Some(name.as_str()),
        };
        for record in records {
            let mut destination = bundle.root.clone();
            if let Some(segment) = group_segment {
                destination.push(segment);
            }
            destination.push(owner_segment(record, names));
            destination.push(file_segment(record));
            tasks.push(DownloadTask {
                destination,
                source_url: record.photo_url.clone(),
            });
        }
    }
    tasks
}

fn owner_segment(record: &PhotoRecord, names: &HashMap<i64, String>) -> String {
    names
        .get(&record.owner_id)
        .cloned()
        .unwrap_or_else(|| record.owner_id.to_string())
}

/// `YYYYMMDD_HHMMSS_<final url path component>`. UTC, so planned paths are
/// machine-independent.
fn file_segment(record: &PhotoRecord) -> String {
    // out-of-range timestamps (spoofed exports) collapse to the epoch
    let stamp = Utc
        .timestamp_opt(record.timestamp, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .format("%Y%m%d_%H%M%S");
    let basename = record
        .photo_url
        .rsplit('/')
        .next()
        .unwrap_or(record.photo_url.as_str());
    format!("{}_{}", stamp, basename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn bundle() -> CorpusBundle {
        let mut bundle = CorpusBundle::new(PathBuf::from("/archive"));
        bundle.groups.insert(
            "alice".to_string(),
            vec![
                PhotoRecord {
                    owner_id: 1,
                    timestamp: 1_600_000_000,
                    photo_url: "https://cdn.example/a/first.jpg".to_string(),
                },
                PhotoRecord {
                    owner_id: 2,
                    timestamp: 1_600_000_100,
                    photo_url: "https://cdn.example/b/second.jpg".to_string(),
                },
            ],
        );
        bundle
    }

    #[test]
    fn per_document_policy_nests_group_then_owner() {
        let tasks = plan(&bundle(), &FolderPolicy::PerDocument, &HashMap::new());
        assert_eq!(tasks.len(), 2);
        // 2020-09-13T12:26:40Z
        assert_eq!(
            tasks[0].destination,
            Path::new("/archive/alice/1/20200913_122640_first.jpg")
        );
        assert_eq!(
            tasks[1].destination,
            Path::new("/archive/alice/2/20200913_122820_second.jpg")
        );
    }

    #[test]
    fn flat_policy_drops_the_group_segment() {
        let tasks = plan(&bundle(), &FolderPolicy::Flat, &HashMap::new());
        assert_eq!(
            tasks[0].destination,
            Path::new("/archive/1/20200913_122640_first.jpg")
        );
    }

    #[test]
    fn custom_policy_uses_the_supplied_folder() {
        let policy = FolderPolicy::Custom("vacation".to_string());
        let tasks = plan(&bundle(), &policy, &HashMap::new());
        assert!(tasks[0]
            .destination
            .starts_with(Path::new("/archive/vacation")));
    }

    #[test]
    fn resolved_names_replace_owner_ids() {
        let names = HashMap::from([(1, "1 (Alice Smith)".to_string())]);
        let tasks = plan(&bundle(), &FolderPolicy::PerDocument, &names);
        assert_eq!(
            tasks[0].destination,
            Path::new("/archive/alice/1 (Alice Smith)/20200913_122640_first.jpg")
        );
        // unresolved owner falls back to the decimal id
        assert!(tasks[1].destination.to_str().unwrap().contains("/2/"));
    }

    #[test]
    fn planning_is_idempotent() {
        let bundle = bundle();
        let names = HashMap::from([(2, "2 (Bob)".to_string())]);
        let first = plan(&bundle, &FolderPolicy::PerDocument, &names);
        let second = plan(&bundle, &FolderPolicy::PerDocument, &names);
        assert_eq!(first, second);
    }
}
