//! Dialog extraction: walk one parsed document, collect photo records.
//!
//! - Depth-first over `data`, recursing into `fwd_messages` (nesting is
//!   unbounded in exported data, capped here defensively)
//! - Picks the maximum-width size variant per photo (stable on ties)
//! - Applies the grab filter against the dialog's (owner, peer) pair
//! - Returns an immutable per-document result; the aggregator merges

use crate::domain::{DialogMeta, DomainError, GrabFilter, OwnerIdSet, PhotoRecord};
use serde_json::Value;

/// Forward chains deeper than this are treated as malformed input rather
/// than risking stack exhaustion on attacker-adjacent exports.
pub const MAX_FORWARD_DEPTH: usize = 1000;

/// Everything extracted from a single document.
#[derive(Debug, Default)]
pub struct DialogExtraction {
    /// Records in document traversal order.
    pub records: Vec<PhotoRecord>,
    /// Distinct owners of the included records.
    pub owner_ids: OwnerIdSet,
}

/// Walks one parsed dialog document and yields photo records.
pub struct DialogExtractor {
    filter: GrabFilter,
}

impl DialogExtractor {
    pub fn new(filter: GrabFilter) -> Self {
        Self { filter }
    }

    /// Extract all included photo records from `doc`.
    ///
    /// Missing `attachments`/`fwd_messages` keys are treated as empty. A
    /// missing `meta` object is a parse error for the document; a forward
    /// chain past [`MAX_FORWARD_DEPTH`] is a structure error.
    pub fn extract(&self, doc: &Value) -> Result<DialogExtraction, DomainError> {
        let meta = doc
            .get("meta")
            .and_then(Value::as_object)
            .ok_or_else(|| DomainError::Parse("document has no meta object".into()))?;
        let dialog = DialogMeta {
            owner_id: meta.get("ownerId").and_then(Value::as_i64).unwrap_or(0),
            peer_id: meta.get("peer").and_then(Value::as_i64).unwrap_or(0),
        };

        let mut out = DialogExtraction::default();
        if let Some(messages) = doc.get("data").and_then(Value::as_array) {
            for message in messages {
                self.walk_message(message, &dialog, 0, &mut out)?;
            }
        }
        Ok(out)
    }

    fn walk_message(
        &self,
        message: &Value,
        dialog: &DialogMeta,
        depth: usize,
        out: &mut DialogExtraction,
    ) -> Result<(), DomainError> {
        if depth > MAX_FORWARD_DEPTH {
            return Err(DomainError::Structure(format!(
                "forwarded messages nested deeper than {}",
                MAX_FORWARD_DEPTH
            )));
        }

        if let Some(attachments) = message.get("attachments").and_then(Value::as_array) {
            for attachment in attachments {
                self.collect_photo(attachment, dialog, out);
            }
        }

        if let Some(forwards) = message.get("fwd_messages").and_then(Value::as_array) {
            for forward in forwards {
                self.walk_message(forward, dialog, depth + 1, out)?;
            }
        }
        Ok(())
    }

    /// Examine one attachment; push a record if it is an included photo.
    fn collect_photo(&self, attachment: &Value, dialog: &DialogMeta, out: &mut DialogExtraction) {
        if attachment.get("type").and_then(Value::as_str) != Some("photo") {
            return;
        }
        let Some(photo) = attachment.get("photo").and_then(Value::as_object) else {
            return;
        };
        let Some(sizes) = photo.get("sizes").and_then(Value::as_array) else {
            return;
        };
        let Some(best) = widest_size(sizes) else {
            return;
        };
        let Some(url) = best.get("url").and_then(Value::as_str) else {
            return;
        };

        let owner_id = photo.get("owner_id").and_then(Value::as_i64).unwrap_or(0);
        let timestamp = photo.get("date").and_then(Value::as_i64).unwrap_or(0);

        if !self.filter.includes(owner_id, dialog) {
            return;
        }
        out.owner_ids.insert(owner_id);
        out.records.push(PhotoRecord {
            owner_id,
            timestamp,
            photo_url: url.to_string(),
        });
    }
}

/// Stable max: the first entry carrying the maximum `width` wins ties.
fn widest_size(sizes: &[Value]) -> Option<&Value> {
    let mut best: Option<(&Value, i64)> = None;
    for size in sizes {
        let width = size.get("width").and_then(Value::as_i64).unwrap_or(0);
        match best {
            Some((_, best_width)) if width <= best_width => {}
            _ => best = Some((size, width)),
        }
    }
    best.map(|(size, _)| size)
}
