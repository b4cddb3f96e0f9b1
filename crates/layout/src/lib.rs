#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Destination scheme resolution for wheel archive contents
//!
//! A wheel reserves a single data-directory segment (e.g. `pkg-1.0.data`)
//! whose immediate children name the destination scheme for everything
//! below them. Every other path in the archive belongs to the root scheme
//! the caller selects from the package metadata. This crate maps each
//! archive-relative path to its [`Scheme`] and performs no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;
use wheelwright_errors::{Error, LayoutError, Result};

/// Destination scheme for an installed file
///
/// Closed set: the five categories a wheel data directory can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Platform-independent library directory
    Purelib,
    /// Platform-specific library directory
    Platlib,
    /// Arbitrary data files
    Data,
    /// Executable scripts
    Scripts,
    /// C header files
    Headers,
}

impl Scheme {
    /// Look up a scheme by its data-directory segment name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "purelib" => Some(Self::Purelib),
            "platlib" => Some(Self::Platlib),
            "data" => Some(Self::Data),
            "scripts" => Some(Self::Scripts),
            "headers" => Some(Self::Headers),
            _ => None,
        }
    }

    /// The segment name used inside the data directory
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Purelib => "purelib",
            Self::Platlib => "platlib",
            Self::Data => "data",
            Self::Scripts => "scripts",
            Self::Headers => "headers",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved archive path and the scheme it installs under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Archive-relative posix path
    pub path: String,
    /// Destination scheme for the file
    pub scheme: Scheme,
}

impl Decision {
    /// Create a decision
    #[must_use]
    pub fn new(path: impl Into<String>, scheme: Scheme) -> Self {
        Self {
            path: path.into(),
            scheme,
        }
    }
}

/// Maps archive-relative paths to destination schemes
///
/// Holds the wheel's reserved data-directory name and the root scheme the
/// caller selected from the package metadata (`Purelib` for
/// platform-independent packages, `Platlib` otherwise).
#[derive(Debug, Clone)]
pub struct SchemeResolver {
    data_name: String,
    root_scheme: Scheme,
}

impl SchemeResolver {
    /// Create a resolver for one wheel
    ///
    /// `root_scheme` must be `Purelib` or `Platlib`; the other variants
    /// only occur inside the data directory.
    #[must_use]
    pub fn new(data_name: impl Into<String>, root_scheme: Scheme) -> Self {
        debug_assert!(matches!(root_scheme, Scheme::Purelib | Scheme::Platlib));
        Self {
            data_name: data_name.into(),
            root_scheme,
        }
    }

    /// The wheel's reserved data-directory name
    #[must_use]
    pub fn data_name(&self) -> &str {
        &self.data_name
    }

    /// The scheme applied to paths outside the data directory
    #[must_use]
    pub fn root_scheme(&self) -> Scheme {
        self.root_scheme
    }

    /// Resolve a single archive-relative path to its destination scheme
    ///
    /// Containment in the data directory is tested as a raw string common
    /// prefix against the data-directory name, not segment-aware. A file
    /// whose name merely starts with the data-directory string is treated
    /// as data-directory content; such a path can never walk up to the
    /// data-directory name and fails with `InvalidScheme`. Kept as-is to
    /// match the established classification behavior.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidScheme`] when the segment directly
    /// under the data directory is not one of the five scheme names, or
    /// when the walk up the path never reaches the data-directory name.
    pub fn resolve(&self, path: &str) -> Result<Decision> {
        if common_prefix_len(&self.data_name, path) == 0 {
            return Ok(Decision::new(path, self.root_scheme));
        }

        let (mut left, mut right) = split_last(path);
        while left != self.data_name {
            if left.is_empty() {
                return Err(invalid_scheme(path, right));
            }
            (left, right) = split_last(left);
        }

        let scheme = Scheme::from_name(right).ok_or_else(|| invalid_scheme(path, right))?;
        Ok(Decision::new(path, scheme))
    }

    /// Resolve every path in order, one decision per input
    ///
    /// # Errors
    ///
    /// Propagates the first [`LayoutError::InvalidScheme`] encountered.
    pub fn resolve_all<I, S>(&self, paths: I) -> Result<Vec<Decision>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .map(|path| self.resolve(path.as_ref()))
            .collect()
    }
}

fn invalid_scheme(path: &str, segment: &str) -> Error {
    LayoutError::InvalidScheme {
        path: path.to_string(),
        segment: segment.to_string(),
    }
    .into()
}

/// Length of the shared leading byte run of two strings
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}

/// Split a posix path into (parent, final segment)
fn split_last(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}
