#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Deterministic pseudo-random bases.
pub fn bases(len: usize, seed: usize) -> String {
    (0..len)
        .map(|i| b"ACGT"[(i * 7 + i / 13 + seed) % 4] as char)
        .collect()
}

/// Writes a FASTA with 60-column lines and returns its path.
pub fn write_fasta(dir: &Path, file_name: &str, records: &[(&str, &str)]) -> PathBuf {
    let mut contents = String::new();
    for (name, seq) in records {
        contents.push('>');
        contents.push_str(name);
        contents.push('\n');
        for line in seq.as_bytes().chunks(60) {
            contents.push_str(std::str::from_utf8(line).unwrap());
            contents.push('\n');
        }
    }
    let path = dir.join(file_name);
    fs::write(&path, contents).unwrap();
    path
}

/// `ref.fa` with chr1 (1000 bp), chr2 (250 bp) and chrM (16 bp).
pub fn reference_fasta(dir: &Path) -> (PathBuf, String, String) {
    let chr1 = bases(1000, 0);
    let chr2 = bases(250, 1);
    let path = write_fasta(
        dir,
        "ref.fa",
        &[("chr1", &chr1), ("chr2", &chr2), ("chrM", "GATCACAGGTCTATCA")],
    );
    (path, chr1, chr2)
}
