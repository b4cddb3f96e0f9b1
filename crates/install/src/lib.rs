#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Install planning for wheel archives
//!
//! Bridges an opened wheel (archive listing plus metadata, behind the
//! [`WheelSource`] trait) and the layout resolver: selects the root scheme
//! from the package's platform-independence flag and produces one
//! [`Decision`] per archived file. Extraction, file copying, and the
//! mapping of schemes to physical directories stay with the caller, which
//! appends a [`Record`] per copied file and persists the set afterwards.

use wheelwright_errors::Result;
use wheelwright_layout::{Decision, Scheme, SchemeResolver};
use wheelwright_record::{Record, RecordSet};

/// An opened wheel archive, as the planner needs to see it
///
/// Implementations own extraction and metadata parsing; the planner only
/// reads the ordered file listing, the reserved data-directory name, and
/// the platform-independence flag.
pub trait WheelSource {
    /// Archive-relative posix paths, in archive order
    fn files(&self) -> &[String];

    /// The wheel's reserved data-directory name (e.g. `pkg-1.0.data`)
    fn data_dir_name(&self) -> &str;

    /// Whether the package declares its root as platform-independent
    fn root_is_purelib(&self) -> bool;
}

/// Root scheme for a wheel, from its platform-independence flag
#[must_use]
pub fn root_scheme(source: &impl WheelSource) -> Scheme {
    if source.root_is_purelib() {
        Scheme::Purelib
    } else {
        Scheme::Platlib
    }
}

/// Produce one destination decision per archived file, in archive order
///
/// # Errors
///
/// Propagates [`wheelwright_errors::LayoutError::InvalidScheme`] from the
/// resolver for a data-directory subpath with an unrecognized scheme
/// segment.
pub fn plan(source: &impl WheelSource) -> Result<Vec<Decision>> {
    let resolver = SchemeResolver::new(source.data_dir_name(), root_scheme(source));
    tracing::debug!(
        data_dir = source.data_dir_name(),
        files = source.files().len(),
        root_scheme = %resolver.root_scheme(),
        "planning wheel install"
    );
    resolver.resolve_all(source.files())
}

/// Record one installed file after its copy completed
///
/// Copies may run in parallel, but the record set is not concurrency-safe;
/// callers must funnel results through a single mutator.
pub fn record_installed(records: &mut RecordSet, record: Record) {
    records.add(record);
}
