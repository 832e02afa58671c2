use log::{info, warn};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::error::{Result, StoreError};
use super::store::{validate_interval, SequenceIndexStore};
use crate::region::Region;

/// Merges `files` with the entries of an optional list file (one path per
/// line, `#` comments allowed), dropping duplicates.
pub fn collect_sequence_paths(
    mut files: Vec<String>,
    sequence_list: Option<&Path>,
) -> std::result::Result<Vec<String>, String> {
    if let Some(list_path) = sequence_list {
        let contents = fs::read_to_string(list_path).map_err(|e| {
            format!("Failed to read --sequence-list '{}': {e}", list_path.display())
        })?;
        for line in contents.lines() {
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            files.push(entry.to_string());
        }
    }

    let mut seen = HashSet::new();
    files.retain(|path| seen.insert(path.clone()));
    Ok(files)
}

/// A reference split over several indexed FASTA files.
///
/// Every sequence name maps to the first file that contains it. Queries run
/// against per-thread stores, so no htslib handle is ever used by two threads.
pub struct ReferenceSet {
    fasta_paths: Vec<PathBuf>,
    /// Name -> (file, length)
    sequence_to_file: HashMap<String, (usize, i64)>,
    sequences: Vec<(String, i64)>,
    /// Per-thread stores keyed by file. Indexed by rayon::current_thread_index().
    thread_stores: Vec<Mutex<HashMap<usize, SequenceIndexStore>>>,
}

impl fmt::Debug for ReferenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceSet")
            .field("fasta_paths", &self.fasta_paths)
            .field("num_sequences", &self.sequences.len())
            .field("num_thread_slots", &self.thread_stores.len())
            .finish_non_exhaustive()
    }
}

impl ReferenceSet {
    pub fn open(
        fasta_files: &[String],
        create_if_missing: bool,
    ) -> std::result::Result<Self, String> {
        if fasta_files.is_empty() {
            return Err("No FASTA files provided".to_string());
        }

        // Phase 1: Parallel - load each index and read its sequence table
        let tables: Vec<_> = fasta_files
            .par_iter()
            .enumerate()
            .map(|(idx, entry)| -> std::result::Result<(usize, PathBuf, Vec<(String, i64)>), String> {
                let path = PathBuf::from(entry);
                let mut store = SequenceIndexStore::new();
                if !store.load_index(&path, create_if_missing) {
                    return Err(format!("Failed to load FASTA index for '{entry}'"));
                }

                let table = (0..store.num_sequences())
                    .map(|ordinal| {
                        let name = store.sequence_name(ordinal as i64)?;
                        let length = store.sequence_length(&name);
                        Ok((name, length))
                    })
                    .collect::<Result<Vec<_>>>()
                    .map_err(|e: StoreError| format!("Failed to read FASTA index for '{entry}': {e}"))?;

                Ok((idx, path, table))
            })
            .collect::<std::result::Result<Vec<_>, String>>()?;

        // Phase 2: Sequential - first file wins on duplicate names
        let mut fasta_paths = Vec::with_capacity(tables.len());
        let mut sequence_to_file: HashMap<String, (usize, i64)> = HashMap::new();
        let mut sequences = Vec::new();

        for (idx, path, table) in tables {
            fasta_paths.push(path);
            for (name, length) in table {
                if let Some(&(owner, _)) = sequence_to_file.get(&name) {
                    warn!(
                        "Sequence '{}' in '{}' is shadowed by '{}'",
                        name,
                        fasta_paths[idx].display(),
                        fasta_paths[owner].display()
                    );
                    continue;
                }
                sequence_to_file.insert(name.clone(), (idx, length));
                sequences.push((name, length));
            }
        }

        info!(
            "Indexed {} sequences across {} FASTA files",
            sequences.len(),
            fasta_paths.len()
        );

        let num_slots = rayon::current_num_threads() + 1;

        Ok(Self {
            fasta_paths,
            sequence_to_file,
            sequences,
            thread_stores: (0..num_slots).map(|_| Mutex::new(HashMap::new())).collect(),
        })
    }

    pub fn fasta_paths(&self) -> &[PathBuf] {
        &self.fasta_paths
    }

    /// `(name, length)` of every reachable sequence, in file order.
    pub fn sequences(&self) -> &[(String, i64)] {
        &self.sequences
    }

    pub fn sequence_length(&self, name: &str) -> Option<i64> {
        self.sequence_to_file.get(name).map(|&(_, length)| length)
    }

    /// Bases of `name` over the zero-based inclusive `[start, end]`.
    pub fn fetch(&self, name: &str, start: i64, end: i64) -> Result<String> {
        validate_interval(start, end)?;
        let &(file_idx, _) = self
            .sequence_to_file
            .get(name)
            .ok_or_else(|| StoreError::SequenceNotFound(name.to_string()))?;

        let thread_idx = rayon::current_thread_index()
            .unwrap_or(usize::MAX)
            .min(self.thread_stores.len() - 1);
        let mut slot = self.thread_stores[thread_idx]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let store = slot.entry(file_idx).or_default();
        // Indices were written by `open`, so never create here
        if store.is_empty() && !store.load_index(&self.fasta_paths[file_idx], false) {
            let fasta_path = &self.fasta_paths[file_idx];
            warn!("Failed to reopen FASTA index for '{}'", fasta_path.display());
            return Err(StoreError::SequenceNotFound(format!(
                "{name}: FASTA '{}' can no longer be loaded",
                fasta_path.display()
            )));
        }

        store.query_region(name, start, end)
    }

    /// Fetches `region`, closing an open end at the sequence's last base.
    /// Returns the resolved region with the bases.
    pub fn fetch_region(&self, region: &Region) -> Result<(Region, String)> {
        let length = self
            .sequence_length(&region.name)
            .ok_or_else(|| StoreError::SequenceNotFound(region.name.clone()))?;
        let resolved = region.resolve(length);
        let end = resolved.end.unwrap_or(length - 1);
        let bases = self.fetch(&resolved.name, resolved.start, end)?;
        Ok((resolved, bases))
    }

    /// Fetches a batch of regions in parallel. Results keep the input order.
    pub fn fetch_many(&self, regions: &[Region]) -> Vec<Result<(Region, String)>> {
        regions
            .par_iter()
            .map(|region| self.fetch_region(region))
            .collect()
    }
}
