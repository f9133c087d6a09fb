use chrono::{Duration, NaiveDate};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::RawRecord;
use crate::utils::constants::DEFAULT_BUFFER_SIZE;

/// How the base date for relative day offsets is established while parsing
/// one source file.
#[derive(Debug, Clone, PartialEq)]
pub enum DateStrategy {
    /// Base year-month comes from the filename; the first line of the file is
    /// always treated as a column header and skipped.
    FixedFromFilename(NaiveDate),
    /// Base date is (re-)established by in-file `Start : YYYYMMDD` marker
    /// lines; data lines before the first marker are dropped.
    EmbeddedHeader,
}

/// Parses one source file into (timestamp, value) records for one variable.
///
/// Data lines carry `day,hour_code,value`: a 1-based day offset from the
/// active base date, a 4-character hour code whose first two characters are
/// the hour of day, and a decimal value. Malformed lines are skipped, never
/// fatal. Output order is input order; sorting is the merger's job.
pub struct RecordParser {
    use_mmap: bool,
}

impl RecordParser {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    pub fn parse_file(&self, path: &Path, strategy: &DateStrategy) -> Result<Vec<RawRecord>> {
        if self.use_mmap {
            self.parse_file_mmap(path, strategy)
        } else {
            self.parse_file_buffered(path, strategy)
        }
    }

    /// Parse source text directly (memory-mapped path and tests).
    pub fn parse_str(&self, content: &str, strategy: &DateStrategy) -> Vec<RawRecord> {
        let mut session = ParseSession::new(strategy);
        for line in content.lines() {
            session.feed(line);
        }
        session.finish()
    }

    fn parse_file_buffered(&self, path: &Path, strategy: &DateStrategy) -> Result<Vec<RawRecord>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);

        let mut session = ParseSession::new(strategy);
        for line_result in reader.lines() {
            let line = line_result?;
            session.feed(&line);
        }

        Ok(session.finish())
    }

    fn parse_file_mmap(&self, path: &Path, strategy: &DateStrategy) -> Result<Vec<RawRecord>> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let content = std::str::from_utf8(&mmap)
            .map_err(|e| ProcessingError::InvalidFormat(format!("Invalid UTF-8: {}", e)))?;

        Ok(self.parse_str(content, strategy))
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-file parse state: the active base date and the running line count.
struct ParseSession<'a> {
    strategy: &'a DateStrategy,
    base_date: Option<NaiveDate>,
    line_count: usize,
    records: Vec<RawRecord>,
}

impl<'a> ParseSession<'a> {
    fn new(strategy: &'a DateStrategy) -> Self {
        let base_date = match strategy {
            DateStrategy::FixedFromFilename(base) => Some(*base),
            DateStrategy::EmbeddedHeader => None,
        };

        Self {
            strategy,
            base_date,
            line_count: 0,
            records: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        self.line_count += 1;

        match self.strategy {
            DateStrategy::FixedFromFilename(_) => {
                // First line is the column header regardless of content
                if self.line_count == 1 {
                    return;
                }
            }
            DateStrategy::EmbeddedHeader => {
                if let Some(base) = parse_header_date(line) {
                    self.base_date = Some(base);
                    return;
                }
            }
        }

        let Some(base) = self.base_date else {
            debug!(line = self.line_count, "dropping data line before first base-date header");
            return;
        };

        match parse_data_line(line, base) {
            Some(record) => self.records.push(record),
            None => debug!(line = self.line_count, "skipping unparsable line"),
        }
    }

    fn finish(self) -> Vec<RawRecord> {
        self.records
    }
}

/// Parse one `day,hour_code,value` line against the active base date.
/// Returns None for anything that is not a well-formed data line.
fn parse_data_line(line: &str, base_date: NaiveDate) -> Option<RawRecord> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }

    let day: i64 = parts[0].parse().ok()?;
    let value: f64 = parts[2].parse().ok()?;

    // First two characters of the hour code are the hour of day; the
    // trailing two are ignored
    let hour: u32 = parts[1].get(..2)?.parse().ok()?;
    if hour > 23 {
        return None;
    }

    let date = base_date.checked_add_signed(Duration::days(day - 1))?;
    let timestamp = date.and_hms_opt(hour, 0, 0)?;

    Some(RawRecord::new(timestamp, value))
}

/// Recognize a base-date marker: `Start` (any case), optional whitespace, a
/// colon, then an 8-digit YYYYMMDD anywhere in the line. Only year and month
/// are used; the day is anchored to 1.
fn parse_header_date(line: &str) -> Option<NaiveDate> {
    let lower = line.to_ascii_lowercase();
    let pos = lower.find("start")?;

    let rest = line[pos + "start".len()..].trim_start();
    let date_str = rest.strip_prefix(':')?.trim();

    if date_str.len() != 8 || !date_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = date_str[..4].parse().ok()?;
    let month: u32 = date_str[4..6].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}
