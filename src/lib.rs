//! Random-access subsequence queries over faidx-indexed FASTA files.
//!
//! [`SequenceIndexStore`] serves one file; [`ReferenceSet`] spreads a
//! reference over several and answers batches of [`Region`]s in parallel.

pub mod io;
pub mod region;
pub mod sequence;

pub use region::Region;
pub use sequence::{
    collect_sequence_paths, fai_path, ReferenceSet, Result, SequenceIndexStore, StoreError,
};
