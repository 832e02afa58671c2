//! Region-list input and FASTA output for the `refstore` binary.

use flate2::read::MultiGzDecoder;
use log::warn;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use crate::region::Region;
use crate::sequence::ReferenceSet;

/// FASTA output line width
pub const LINE_WIDTH: usize = 60;

/// Opens a region list: `-` for stdin, gzip/bgzip by `.gz`/`.bgz` extension,
/// plain text otherwise.
pub fn get_region_reader(path: &str) -> io::Result<Box<dyn BufRead>> {
    if path == "-" {
        Ok(Box::new(BufReader::new(std::io::stdin())))
    } else if path.ends_with(".gz") || path.ends_with(".bgz") {
        let file = File::open(path)?;
        let decoder = MultiGzDecoder::new(file);
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Parses one line of a region list. Tab-separated lines are BED, anything
/// else a region string. Blank lines and `#` comments give `None`.
pub fn parse_region_line(line: &str) -> Option<Result<Region, String>> {
    if line.trim().is_empty() || line.starts_with('#') {
        return None;
    }
    if line.contains('\t') {
        Some(Region::from_bed_line(line))
    } else {
        Some(Region::parse(line))
    }
}

/// Fetch a batch in parallel, then write the records in input order.
/// Regions that cannot be fetched are reported and skipped.
pub fn write_regions<W: Write>(
    reference: &ReferenceSet,
    regions: &[Region],
    uppercase: bool,
    out: &mut W,
) -> io::Result<()> {
    for (region, result) in regions.iter().zip(reference.fetch_many(regions)) {
        let (resolved, mut bases) = match result {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("Failed to fetch '{}': {}", region, e);
                continue;
            }
        };
        if uppercase {
            bases.make_ascii_uppercase();
        }

        writeln!(out, ">{resolved}")?;
        for line in bases.as_bytes().chunks(LINE_WIDTH) {
            out.write_all(line)?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}
