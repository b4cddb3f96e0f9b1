#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Installed-file record handling for wheelwright
//!
//! This crate defines the RECORD format for installed packages: one row
//! per installed file carrying its path, content hash, and size. The
//! serialized form is comma-delimited, double-quote-quoted text with rows
//! sorted by posix path, so identical record sets always produce
//! byte-identical content regardless of insertion order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use wheelwright_errors::{Error, RecordError, Result};

mod content;

/// One installed file: path, optional content hash, optional size
///
/// The hash string is opaque here; the installer decides the algorithm
/// and whether to record one at all. Identity is the posix form of the
/// path alone, so two records for the same path are the same entry even
/// when their hash or size differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
}

impl Record {
    /// Create a record for an installed file
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, hash: Option<String>, size: Option<u64>) -> Self {
        Self {
            path: path.into(),
            hash,
            size,
        }
    }

    /// The installed file's path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The recorded content hash, if any
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// The recorded size in bytes, if any
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// The path in posix form, used for identity and serialization
    #[must_use]
    pub fn posix_path(&self) -> String {
        posix_path(&self.path)
    }
}

/// Set of installed-file records, keyed by posix path
///
/// At most one record per distinct posix path. Inserting a record whose
/// path is already present keeps the existing record; updating a record
/// requires removing the old one first. Not concurrency-safe: callers
/// that parallelize file copies must serialize mutation of the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: BTreeMap<String, Record>,
}

impl RecordSet {
    /// Create an empty record set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when a record exists for the path
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.records.contains_key(&posix_path(path))
    }

    /// Look up a record by path
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&Record> {
        self.records.get(&posix_path(path))
    }

    /// Insert a record
    ///
    /// A record already present under the same posix path is kept
    /// unchanged; call [`RecordSet::remove`] first to replace it.
    pub fn add(&mut self, record: Record) {
        self.records.entry(record.posix_path()).or_insert(record);
    }

    /// Remove the record for a path
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] when no record exists for the
    /// path; removing an absent record is a usage error, never ignored.
    pub fn remove(&mut self, path: &Path) -> Result<Record> {
        let key = posix_path(path);
        self.records.remove(&key).ok_or_else(|| {
            Error::from(RecordError::NotFound { path: key })
        })
    }

    /// Records in posix-path order
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Serialize to RECORD text
    ///
    /// One `path,hash,size` row per record, comma-delimited with minimal
    /// double-quote quoting and `\n` terminators, sorted by posix path.
    /// Absent hash and size serialize as empty fields.
    #[must_use]
    pub fn to_content(&self) -> String {
        let mut out = String::new();
        for (path, record) in &self.records {
            content::push_field(&mut out, path);
            out.push(',');
            content::push_field(&mut out, record.hash().unwrap_or(""));
            out.push(',');
            if let Some(size) = record.size() {
                out.push_str(&size.to_string());
            }
            out.push('\n');
        }
        out
    }

    /// Parse RECORD text
    ///
    /// Empty hash and size fields parse as absent; the text format does
    /// not distinguish empty from absent, so callers must treat the two
    /// as equivalent.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Parse`] for a row with the wrong field
    /// count, a non-numeric size field, or an unterminated quote.
    pub fn from_content(text: &str) -> Result<Self> {
        let mut records = Self::new();
        for (line, fields) in content::parse_rows(text)? {
            let [path, hash, size]: [String; 3] =
                fields.try_into().map_err(|fields: Vec<String>| {
                    Error::from(RecordError::Parse {
                        line,
                        message: format!("expected 3 fields, found {}", fields.len()),
                    })
                })?;

            let hash = (!hash.is_empty()).then_some(hash);
            let size = if size.is_empty() {
                None
            } else {
                Some(size.parse::<u64>().map_err(|_| {
                    Error::from(RecordError::Parse {
                        line,
                        message: format!("invalid size field {size:?}"),
                    })
                })?)
            };

            records.add(Record::new(PathBuf::from(path), hash, size));
        }
        Ok(records)
    }

    /// Parse RECORD bytes
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Parse`] when the bytes are not valid UTF-8,
    /// and every error `from_content` returns.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            let line = bytes[..e.valid_up_to()].split(|b| *b == b'\n').count();
            Error::from(RecordError::Parse {
                line,
                message: format!("invalid UTF-8: {e}"),
            })
        })?;
        Self::from_content(text)
    }

    /// Write the serialized form to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn write_to_file(&self, path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), records = self.len(), "writing RECORD");
        tokio::fs::write(path, self.to_content())
            .await
            .map_err(|e| Error::io_with_path(&e, path))
    }

    /// Load a record set from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is
    /// malformed.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?;
        Self::from_bytes(&bytes)
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut records = Self::new();
        for record in iter {
            records.add(record);
        }
        records
    }
}

/// Join a path's components with forward slashes
fn posix_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            Component::CurDir => {}
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}
