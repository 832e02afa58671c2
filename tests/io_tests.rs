//! Integration tests for region lists and FASTA output

mod common;

use flate2::write::GzEncoder;
use flate2::Compression;
use refstore::io::{get_region_reader, parse_region_line, write_regions, LINE_WIDTH};
use refstore::{ReferenceSet, Region};
use std::fs::{self, File};
use std::io::{BufRead, Write};
use tempfile::TempDir;

const REGION_LIST: &str = "# regions\nchr1:1-10\n\nchr2\t100\t130\nchrUn:1-5\nchr1\t10\t10\nchrM\n";

fn read_regions(path: &str) -> Vec<Region> {
    get_region_reader(path)
        .unwrap()
        .lines()
        .filter_map(|line| parse_region_line(&line.unwrap()))
        .filter_map(Result::ok)
        .collect()
}

#[test]
fn test_gzipped_region_list_matches_plain() {
    let dir = TempDir::new().unwrap();

    let plain = dir.path().join("regions.txt");
    fs::write(&plain, REGION_LIST).unwrap();

    let gz = dir.path().join("regions.txt.gz");
    let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
    encoder.write_all(REGION_LIST.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let expected = vec![
        Region::new("chr1", 0, 9),
        Region::new("chr2", 100, 129),
        Region::new("chrUn", 0, 4),
        Region::whole("chrM"),
    ];
    assert_eq!(read_regions(plain.to_str().unwrap()), expected);
    assert_eq!(read_regions(gz.to_str().unwrap()), expected);
}

#[test]
fn test_missing_region_list() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.bed.gz");
    assert!(get_region_reader(missing.to_str().unwrap()).is_err());
}

#[test]
fn test_write_regions_as_fasta() {
    let dir = TempDir::new().unwrap();
    let (primary, chr1, chr2) = common::reference_fasta(dir.path());
    let reference =
        ReferenceSet::open(&[primary.to_str().unwrap().to_string()], true).unwrap();

    let regions = vec![
        Region::new("chr1", 0, 9),
        Region::whole("chrUn"),
        Region::new("chr2", 0, 149),
        Region::whole("chrM"),
    ];
    let mut out = Vec::new();
    write_regions(&reference, &regions, false, &mut out).unwrap();

    let mut expected = format!(">chr1:1-10\n{}\n>chr2:1-150\n", &chr1[..10]);
    for line in chr2[..150].as_bytes().chunks(LINE_WIDTH) {
        expected.push_str(std::str::from_utf8(line).unwrap());
        expected.push('\n');
    }
    expected.push_str(">chrM:1-16\nGATCACAGGTCTATCA\n");
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_write_regions_uppercase() {
    let dir = TempDir::new().unwrap();
    let fasta = common::write_fasta(dir.path(), "soft.fa", &[("chr1", "acgtNNacgt")]);
    let reference = ReferenceSet::open(&[fasta.to_str().unwrap().to_string()], true).unwrap();

    let mut out = Vec::new();
    write_regions(&reference, &[Region::new("chr1", 2, 7)], true, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), ">chr1:3-8\nGTNNAC\n");

    let mut out = Vec::new();
    write_regions(&reference, &[Region::new("chr1", 2, 7)], false, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), ">chr1:3-8\ngtNNac\n");
}
