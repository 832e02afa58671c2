mod error;
mod faidx;
mod reference_set;
mod store;

// Re-export public API
pub use error::{Result, StoreError};
pub use faidx::fai_path;
pub use reference_set::{collect_sequence_paths, ReferenceSet};
pub use store::SequenceIndexStore;
