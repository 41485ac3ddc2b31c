//! JSON document sink for normalized records.
//!
//! One file per record under a feed-kind-scoped subdirectory. Names
//! encode `(kind, security, capture stamp)`; publishing is write-to-temp
//! then link-no-replace, so readers never see partial documents and a
//! name clash surfaces as an error instead of an overwrite.

use crate::error::{PersistenceError, PersistenceResult};
use mktwire_core::{FeedKind, NormalizedRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Durable store for normalized records.
#[derive(Debug)]
pub struct DocumentSink {
    root: PathBuf,
}

impl DocumentSink {
    /// Open the sink, creating the storage area if needed.
    ///
    /// Creation is idempotent: an existing tree with records in it is
    /// left untouched.
    pub fn new(root: impl Into<PathBuf>) -> PersistenceResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        for kind in FeedKind::all() {
            std::fs::create_dir_all(root.join(kind.dir_name()))?;
        }
        info!(root = %root.display(), "Document sink ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding documents of one feed kind.
    pub fn kind_dir(&self, kind: FeedKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Write one record as a JSON document, returning its final path.
    ///
    /// All-or-nothing: the document appears under its final name only
    /// once fully written. An existing file under that name fails with
    /// `Collision` and leaves the original intact.
    pub fn persist(&self, record: &NormalizedRecord) -> PersistenceResult<PathBuf> {
        let final_path = self
            .kind_dir(record.feed_kind)
            .join(Self::document_name(record));
        let tmp_path = final_path.with_extension("json.tmp");

        let body = serde_json::to_vec_pretty(record)?;
        std::fs::write(&tmp_path, body)?;

        let published = std::fs::hard_link(&tmp_path, &final_path);
        // The temp file is link source only; remove it on every path.
        let _ = std::fs::remove_file(&tmp_path);

        match published {
            Ok(()) => {
                debug!(
                    path = %final_path.display(),
                    security = %record.security,
                    fields = record.field_count(),
                    "Record persisted"
                );
                Ok(final_path)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(PersistenceError::Collision(final_path))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `{kind}_{security}_{stamp}.json` with the security made
    /// filesystem-safe.
    fn document_name(record: &NormalizedRecord) -> String {
        format!(
            "{}_{}_{}.json",
            record.feed_kind,
            Self::sanitize(&record.security),
            record.timestamp
        )
    }

    fn sanitize(security: &str) -> String {
        security
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mktwire_core::CaptureStamp;
    use tempfile::TempDir;

    fn record(micros: i64) -> NormalizedRecord {
        let mut record = NormalizedRecord::new(
            "AAPL US Equity",
            FeedKind::Market,
            CaptureStamp::from_micros(micros),
        );
        record.insert("last_price", 189.5);
        record
    }

    #[test]
    fn test_persist_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DocumentSink::new(temp_dir.path()).unwrap();

        let path = sink.persist(&record(1_705_311_000_000_123)).unwrap();
        assert!(path.starts_with(sink.kind_dir(FeedKind::Market)));
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "market_AAPL_US_Equity_20240115_093000_000123.json"
        );

        let body = std::fs::read_to_string(&path).unwrap();
        let back: NormalizedRecord = serde_json::from_str(&body).unwrap();
        assert_eq!(back, record(1_705_311_000_000_123));
    }

    #[test]
    fn test_document_has_stable_top_level_keys() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DocumentSink::new(temp_dir.path()).unwrap();

        let path = sink.persist(&record(1_705_311_000_000_123)).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(json["security"], "AAPL US Equity");
        assert_eq!(json["timestamp"], "20240115_093000_000123");
        assert_eq!(json["feedKind"], "market");
        assert_eq!(json["fields"]["last_price"], 189.5);
    }

    #[test]
    fn test_collision_detected_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DocumentSink::new(temp_dir.path()).unwrap();

        let first = record(1_705_311_000_000_123);
        let path = sink.persist(&first).unwrap();

        let mut second = record(1_705_311_000_000_123);
        second.insert("last_price", 999.0);
        let err = sink.persist(&second).unwrap_err();
        assert!(matches!(err, PersistenceError::Collision(_)));

        // First document untouched.
        let body = std::fs::read_to_string(&path).unwrap();
        let kept: NormalizedRecord = serde_json::from_str(&body).unwrap();
        assert_eq!(kept, first);
    }

    #[test]
    fn test_distinct_stamps_make_distinct_documents() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DocumentSink::new(temp_dir.path()).unwrap();

        let a = sink.persist(&record(1_705_311_000_000_123)).unwrap();
        let b = sink.persist(&record(1_705_311_000_000_124)).unwrap();
        assert_ne!(a, b);

        let count = std::fs::read_dir(sink.kind_dir(FeedKind::Market))
            .unwrap()
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_reopen_is_idempotent_and_keeps_records() {
        let temp_dir = TempDir::new().unwrap();

        let path = {
            let sink = DocumentSink::new(temp_dir.path()).unwrap();
            sink.persist(&record(1_705_311_000_000_123)).unwrap()
        };

        // Restart: same root, no error, records survive.
        let sink = DocumentSink::new(temp_dir.path()).unwrap();
        assert!(path.exists());
        assert_eq!(sink.root(), temp_dir.path());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DocumentSink::new(temp_dir.path()).unwrap();

        sink.persist(&record(1_705_311_000_000_123)).unwrap();
        // Collision path also cleans up.
        let _ = sink.persist(&record(1_705_311_000_000_123));

        let leftovers: Vec<_> = std::fs::read_dir(sink.kind_dir(FeedKind::Market))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_kind_subdirectories_created() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DocumentSink::new(temp_dir.path()).unwrap();

        for kind in FeedKind::all() {
            assert!(sink.kind_dir(kind).is_dir());
        }
    }

    #[test]
    fn test_sanitize_security_names() {
        assert_eq!(DocumentSink::sanitize("AAPL US Equity"), "AAPL_US_Equity");
        assert_eq!(DocumentSink::sanitize("BRK/B"), "BRK_B");
        assert_eq!(DocumentSink::sanitize("EUR..USD"), "EUR__USD");
    }
}
