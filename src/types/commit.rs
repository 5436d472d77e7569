use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::hash::{hash_bytes, Hash};
use crate::types::IndexEntry;

/// a commit: snapshot of the staging index plus a link to its parent
///
/// field order is the serialization order; the digest of a commit is the
/// sha256 of its compact JSON encoding, so reordering fields changes every
/// commit id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// commit message
    pub message: String,
    /// ISO-8601 UTC, millisecond precision, `Z` suffix
    pub timestamp: String,
    /// staged entries at commit time, in index order
    pub files: Vec<IndexEntry>,
    /// previous head (None for the root commit)
    pub parent: Option<Hash>,
}

impl Commit {
    /// create a new commit stamped with the current time
    pub fn new(message: impl Into<String>, files: Vec<IndexEntry>, parent: Option<Hash>) -> Self {
        Self::with_timestamp(message, now_timestamp(), files, parent)
    }

    /// create a new commit with explicit timestamp
    pub fn with_timestamp(
        message: impl Into<String>,
        timestamp: impl Into<String>,
        files: Vec<IndexEntry>,
        parent: Option<Hash>,
    ) -> Self {
        Self {
            message: message.into(),
            timestamp: timestamp.into(),
            files,
            parent,
        }
    }

    /// is this the first commit in history
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// canonical byte encoding used for storage and hashing
    pub fn to_canonical_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// decode a commit from its stored bytes
    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// digest this commit is stored under
    pub fn hash(&self) -> crate::Result<Hash> {
        Ok(hash_bytes(&self.to_canonical_bytes()?))
    }
}

/// current time in the commit timestamp format
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, content: &[u8]) -> IndexEntry {
        IndexEntry::new(path, hash_bytes(content))
    }

    #[test]
    fn test_commit_new() {
        let c = Commit::new("message", vec![entry("a.txt", b"a")], None);
        assert_eq!(c.message, "message");
        assert_eq!(c.files.len(), 1);
        assert!(c.is_root());
    }

    #[test]
    fn test_timestamp_format() {
        let ts = now_timestamp();
        // 2024-01-02T03:04:05.678Z
        assert_eq!(ts.len(), 24);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[10..11], "T");
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_commit_with_parent() {
        let parent = hash_bytes(b"parent");
        let c = Commit::new("child", vec![], Some(parent));
        assert!(!c.is_root());
        assert_eq!(c.parent, Some(parent));
    }

    #[test]
    fn test_canonical_encoding_layout() {
        let c = Commit::with_timestamp(
            "first",
            "2024-01-02T03:04:05.678Z",
            vec![IndexEntry::new("foo.txt", Hash::ZERO)],
            None,
        );

        let json = String::from_utf8(c.to_canonical_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            format!(
                r#"{{"message":"first","timestamp":"2024-01-02T03:04:05.678Z","files":[{{"path":"foo.txt","hash":"{}"}}],"parent":null}}"#,
                Hash::ZERO
            )
        );
    }

    #[test]
    fn test_commit_hash_determinism() {
        let make = || {
            Commit::with_timestamp(
                "m",
                "2024-01-02T03:04:05.678Z",
                vec![entry("a", b"1"), entry("b", b"2")],
                Some(hash_bytes(b"p")),
            )
        };

        assert_eq!(make().hash().unwrap(), make().hash().unwrap());
        assert_eq!(
            make().to_canonical_bytes().unwrap(),
            make().to_canonical_bytes().unwrap()
        );
    }

    #[test]
    fn test_commit_hash_sensitive_to_fields() {
        let base = Commit::with_timestamp("m", "2024-01-02T03:04:05.678Z", vec![], None);

        let mut other = base.clone();
        other.message = "n".to_string();
        assert_ne!(base.hash().unwrap(), other.hash().unwrap());

        let mut other = base.clone();
        other.parent = Some(Hash::ZERO);
        assert_ne!(base.hash().unwrap(), other.hash().unwrap());

        // file order is part of identity
        let ab = Commit::with_timestamp("m", "t", vec![entry("a", b"1"), entry("b", b"2")], None);
        let ba = Commit::with_timestamp("m", "t", vec![entry("b", b"2"), entry("a", b"1")], None);
        assert_ne!(ab.hash().unwrap(), ba.hash().unwrap());
    }

    #[test]
    fn test_commit_bytes_roundtrip() {
        let c = Commit::new(
            "message with \"quotes\" and\nnewline",
            vec![entry("dir/name with space.txt", b"x")],
            Some(hash_bytes(b"parent")),
        );

        let parsed = Commit::from_bytes(&c.to_canonical_bytes().unwrap()).unwrap();
        assert_eq!(c, parsed);
        assert_eq!(c.hash().unwrap(), parsed.hash().unwrap());
    }

    #[test]
    fn test_commit_from_garbage() {
        assert!(matches!(
            Commit::from_bytes(b"hello"),
            Err(crate::Error::Json(_))
        ));
    }
}
