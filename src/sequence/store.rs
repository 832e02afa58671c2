use log::{debug, warn};
use std::fs::File;
use std::path::Path;

use super::error::{Result, StoreError};
use super::faidx::Faidx;

/// Checks a zero-based inclusive interval before any lookup.
pub(crate) fn validate_interval(start: i64, end: i64) -> Result<()> {
    if start > end {
        return Err(StoreError::InvalidArgument(format!(
            "start must be <= end (got {start} > {end})"
        )));
    }
    if start < 0 {
        return Err(StoreError::InvalidArgument(format!(
            "start must be >= 0 (got {start})"
        )));
    }
    Ok(())
}

/// Random-access store over one indexed FASTA file.
///
/// The store owns at most one index handle. Loading replaces it, dropping the
/// store releases it. Coordinates are zero-based and inclusive on both ends.
///
/// Loading reports failure through its boolean result. Region and ordinal
/// queries raise [`StoreError`]. The count and length probes return `0` and
/// `-1` when nothing is loaded.
///
/// A store can be moved to another thread but not shared. Use one store per
/// thread, as [`ReferenceSet`](super::ReferenceSet) does.
#[derive(Debug, Default)]
pub struct SequenceIndexStore {
    index: Option<Faidx>,
}

impl SequenceIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases the current index, then loads the one belonging to `path`.
    ///
    /// With `create_if_missing` the companion `.fai` is written next to the
    /// FASTA when absent. Returns `false` and leaves the store empty if the
    /// file is unreadable or the index cannot be loaded.
    pub fn load_index<P: AsRef<Path>>(&mut self, path: P, create_if_missing: bool) -> bool {
        if let Some(previous) = self.index.take() {
            debug!("Releasing FASTA index for '{}'", previous.path().display());
        }

        let path = path.as_ref();
        if let Err(e) = File::open(path) {
            warn!("FASTA file '{}' is not readable: {}", path.display(), e);
            return false;
        }

        match Faidx::open(path, create_if_missing) {
            Ok(index) => {
                debug!(
                    "Loaded FASTA index for '{}' ({} sequences)",
                    path.display(),
                    index.num_sequences()
                );
                self.index = Some(index);
                true
            }
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_none()
    }

    /// Path of the FASTA file whose index is loaded.
    pub fn path(&self) -> Option<&Path> {
        self.index.as_ref().map(Faidx::path)
    }

    /// Bases of `name` over `[start, end]`.
    pub fn query_region(&self, name: &str, start: i64, end: i64) -> Result<String> {
        validate_interval(start, end)?;
        let index = self.index.as_ref().ok_or(StoreError::IndexNotLoaded)?;

        let (begin, last) = match (usize::try_from(start), usize::try_from(end)) {
            (Ok(begin), Ok(last)) => (begin, last),
            _ => {
                return Err(StoreError::InvalidArgument(format!(
                    "interval {start}-{end} is not addressable"
                )))
            }
        };

        let bases = index
            .fetch(name, begin, last)
            .ok_or_else(|| StoreError::SequenceNotFound(name.to_string()))?;

        if bases.is_empty() {
            return Err(StoreError::EmptyResult {
                name: name.to_string(),
                start,
                end,
            });
        }
        // htslib clamps to the sequence end; a short read means the interval overran it
        if bases.len() != last - begin + 1 {
            return Err(StoreError::SequenceNotFound(format!(
                "{name}:{start}-{end} extends past the end of '{name}' (length {})",
                index.sequence_length(name)
            )));
        }

        Ok(String::from_utf8_lossy(&bases).into_owned())
    }

    pub fn num_sequences(&self) -> usize {
        self.index.as_ref().map_or(0, Faidx::num_sequences)
    }

    /// Length of `name`; `-1` when no index is loaded or the name is unknown.
    pub fn sequence_length(&self, name: &str) -> i64 {
        match &self.index {
            Some(index) => index.sequence_length(name),
            None => -1,
        }
    }

    /// Name of the sequence at zero-based position `ordinal` in the index.
    pub fn sequence_name(&self, ordinal: i64) -> Result<String> {
        let index = self.index.as_ref().ok_or(StoreError::IndexNotLoaded)?;
        if ordinal < 0 {
            return Err(StoreError::InvalidArgument(format!(
                "ordinal must be >= 0 (got {ordinal})"
            )));
        }
        let num_sequences = index.num_sequences();
        let ordinal = match usize::try_from(ordinal) {
            Ok(ordinal) if ordinal < num_sequences => ordinal,
            _ => {
                return Err(StoreError::InvalidArgument(format!(
                    "ordinal {ordinal} is out of range ({num_sequences} sequences)"
                )))
            }
        };

        index
            .sequence_name(ordinal)
            .ok_or_else(|| StoreError::SequenceNotFound(format!("sequence #{ordinal}")))
    }
}
