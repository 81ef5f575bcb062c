//! Source scanner. Discovers and signature-validates dialog documents.
//!
//! Cheap acceptance test: read a small prefix and look for the known schema
//! signature instead of parsing the whole file. Anything unreadable or
//! unrecognized is silently excluded — a bad candidate is not an error.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Literal prefix identifying an exported dialog document (schema v2.0).
pub const DOCUMENT_SIGNATURE: &str = "{\"meta\":{\"v\":\"2.0\"";

/// Bytes read for the signature check. Covers an optional BOM plus the
/// signature itself with room to spare.
const PREFIX_LEN: usize = 64;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Validated documents found in one directory.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Resolved absolute scan directory; downstream paths hang off this.
    pub root: PathBuf,
    /// Validated document paths, sorted by file name.
    pub files: Vec<PathBuf>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Scan one directory (non-recursive) for `.json` files carrying the
/// document signature. A non-directory `dir` yields an empty result.
pub async fn scan_dir(dir: impl AsRef<Path>) -> ScanResult {
    let dir = dir.as_ref();
    let root = fs::canonicalize(dir)
        .await
        .unwrap_or_else(|_| dir.to_path_buf());

    let mut files = Vec::new();
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(path = %dir.display(), error = %e, "scan root not readable, skipping");
            return ScanResult { root, files };
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if has_signature(&path).await {
            files.push(path);
        } else {
            debug!(path = %path.display(), "signature check failed, excluded");
        }
    }

    // read_dir order is platform-dependent; sort for deterministic output
    files.sort();
    ScanResult { root, files }
}

/// True iff the file starts with the document signature (after an optional
/// UTF-8 BOM). I/O failures count as a failed check.
async fn has_signature(path: &Path) -> bool {
    let Ok(mut file) = fs::File::open(path).await else {
        return false;
    };
    let mut prefix = [0u8; PREFIX_LEN];
    let Ok(n) = file.read(&mut prefix).await else {
        return false;
    };
    let head = strip_bom(&prefix[..n]);
    head.starts_with(DOCUMENT_SIGNATURE.as_bytes())
}

pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[tokio::test]
    async fn accepts_signed_json_and_rejects_the_rest() {
        let tmp = tempfile::tempdir().unwrap();
        let valid = write_file(
            tmp.path(),
            "dialog.json",
            b"{\"meta\":{\"v\":\"2.0\",\"ownerId\":1},\"data\":[]}",
        );
        write_file(tmp.path(), "other.json", b"{\"unrelated\": true}");
        write_file(tmp.path(), "notes.txt", b"{\"meta\":{\"v\":\"2.0\"");

        let result = scan_dir(tmp.path()).await;
        let valid_abs = std::fs::canonicalize(&valid).unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(
            std::fs::canonicalize(&result.files[0]).unwrap(),
            valid_abs
        );
    }

    #[tokio::test]
    async fn tolerates_leading_bom() {
        let tmp = tempfile::tempdir().unwrap();
        let mut content = Vec::from(*b"\xef\xbb\xbf");
        content.extend_from_slice(b"{\"meta\":{\"v\":\"2.0\",\"peer\":2},\"data\":[]}");
        write_file(tmp.path(), "bom.json", &content);

        let result = scan_dir(tmp.path()).await;
        assert_eq!(result.files.len(), 1);
    }

    #[tokio::test]
    async fn non_directory_input_yields_empty_result() {
        let result = scan_dir("/definitely/not/a/real/dir").await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn files_are_sorted_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        let body: &[u8] = b"{\"meta\":{\"v\":\"2.0\"},\"data\":[]}";
        write_file(tmp.path(), "b.json", body);
        write_file(tmp.path(), "a.json", body);
        write_file(tmp.path(), "c.json", body);

        let result = scan_dir(tmp.path()).await;
        let names: Vec<_> = result
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a.json", "b.json", "c.json"]);
    }
}
