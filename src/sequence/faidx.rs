use log::info;
use rust_htslib::faidx::Reader as FastaReader;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Path of the samtools-style companion index (`<fasta>.fai`).
pub fn fai_path(fasta: &Path) -> PathBuf {
    let mut path = OsString::from(fasta.as_os_str());
    path.push(".fai");
    PathBuf::from(path)
}

/// An open htslib faidx handle over a single FASTA file.
///
/// The handle is released by `fai_destroy` when the reader is dropped.
pub struct Faidx {
    reader: FastaReader,
    path: PathBuf,
}

// Safety: the htslib faidx handle has no thread affinity. `Faidx` is not
// `Sync`, so the owner is the only thread that can touch it at a time.
unsafe impl Send for Faidx {}

impl fmt::Debug for Faidx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Faidx")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Faidx {
    /// Loads the index of `fasta`, building `<fasta>.fai` first when it is
    /// missing and `create_if_missing` is set.
    pub fn open(fasta: &Path, create_if_missing: bool) -> Result<Self, String> {
        let fai = fai_path(fasta);
        if !fai.exists() {
            if !create_if_missing {
                return Err(format!("FASTA index '{}' not found", fai.display()));
            }
            info!("Creating FASTA index for '{}'...", fasta.display());
        }

        let reader = FastaReader::from_path(fasta).map_err(|e| {
            format!("Failed to load FASTA index for '{}': {e}", fasta.display())
        })?;

        Ok(Self {
            reader,
            path: fasta.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn num_sequences(&self) -> usize {
        self.reader.n_seqs() as usize
    }

    /// Length of `name`, or -1 when the index does not know it.
    pub fn sequence_length(&self, name: &str) -> i64 {
        if name.contains('\0') {
            return -1;
        }
        // htslib reports unknown names as -1, which arrives here as u64::MAX
        i64::try_from(self.reader.fetch_seq_len(name)).unwrap_or(-1)
    }

    pub fn sequence_name(&self, ordinal: usize) -> Option<String> {
        let ordinal = i32::try_from(ordinal).ok()?;
        self.reader.seq_name(ordinal).ok()
    }

    /// Bases of `name` over the zero-based inclusive interval `[start, end]`.
    ///
    /// Returns `None` when the name is unknown or htslib produces no buffer.
    /// htslib clamps the interval to the sequence, so the result may be
    /// shorter than requested.
    pub fn fetch(&self, name: &str, start: usize, end: usize) -> Option<Vec<u8>> {
        if self.sequence_length(name) < 0 {
            return None;
        }

        let raw_seq = self.reader.fetch_seq(name, start, end).ok()?;
        let seq_vec = raw_seq.to_vec();
        unsafe { libc::free(raw_seq.as_ptr() as *mut std::ffi::c_void) };
        Some(seq_vec)
    }
}
