//! Region strings in the samtools `name:start-end` form.
//!
//! A [`Region`] always holds zero-based inclusive coordinates, the convention
//! of [`SequenceIndexStore::query_region`](crate::SequenceIndexStore::query_region).
//! An open `end` reaches to the last base of the sequence.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub start: i64,
    pub end: Option<i64>,
}

impl Region {
    pub fn new(name: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            name: name.into(),
            start,
            end: Some(end),
        }
    }

    /// The whole of sequence `name`.
    pub fn whole(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: 0,
            end: None,
        }
    }

    /// Parses `name`, `name:start` or `name:start-end` with 1-based inclusive
    /// coordinates. Commas inside numbers are ignored.
    ///
    /// The range is taken after the last `:`. If that suffix is not made of
    /// digits, commas and `-`, the whole string is treated as a name, which
    /// keeps names like `HLA-A*02:01:01:02L` addressable.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty region".to_string());
        }

        let Some((name, range)) = s.rsplit_once(':') else {
            return Ok(Self::whole(s));
        };
        if !range
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c == '-')
        {
            return Ok(Self::whole(s));
        }
        if name.is_empty() {
            return Err(format!("Missing sequence name in region '{s}'"));
        }

        let (start, end) = match range.split_once('-') {
            Some((start, "")) => (parse_position(start, s)?, None),
            Some((start, end)) => (parse_position(start, s)?, Some(parse_position(end, s)?)),
            None => (parse_position(range, s)?, None),
        };

        Ok(Self {
            name: name.to_string(),
            start: start - 1,
            end: end.map(|end| end - 1),
        })
    }

    /// Parses a BED line (`name<TAB>start<TAB>end`, zero-based half-open).
    /// Columns past the third are ignored.
    pub fn from_bed_line(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 {
            return Err(format!("Malformed BED line: {line}"));
        }
        let name = fields[0].trim();
        if name.is_empty() {
            return Err(format!("Missing sequence name in BED line: {line}"));
        }
        let start: i64 = fields[1]
            .trim()
            .parse()
            .map_err(|_| format!("Invalid start in BED line: {line}"))?;
        let end: i64 = fields[2]
            .trim()
            .parse()
            .map_err(|_| format!("Invalid end in BED line: {line}"))?;

        if start >= end {
            return Err(format!("Empty or inverted BED interval {start}-{end}: {line}"));
        }
        let last = end
            .checked_sub(1)
            .ok_or_else(|| format!("Invalid end in BED line: {line}"))?;

        Ok(Self::new(name, start, last))
    }

    /// Closes an open end against the sequence length.
    pub fn resolve(&self, length: i64) -> Self {
        Self {
            name: self.name.clone(),
            start: self.start,
            end: Some(self.end.unwrap_or(length - 1)),
        }
    }
}

/// Formats back to the 1-based `name:start-end` form.
impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start.saturating_add(1);
        match self.end {
            Some(end) => write!(f, "{}:{}-{}", self.name, start, end.saturating_add(1)),
            None if self.start == 0 => write!(f, "{}", self.name),
            None => write!(f, "{}:{}-", self.name, start),
        }
    }
}

fn parse_position(text: &str, region: &str) -> Result<i64, String> {
    let digits: String = text.chars().filter(|&c| c != ',').collect();
    let position: i64 = digits
        .parse()
        .map_err(|_| format!("Invalid coordinate '{text}' in region '{region}'"))?;
    if position < 1 {
        return Err(format!("Coordinates are 1-based, got {position} in region '{region}'"));
    }
    Ok(position)
}
