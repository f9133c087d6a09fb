use rayon::prelude::*;
use std::collections::HashSet;

use crate::error::Result;
use crate::models::{Fragment, RawRecord, VariableKind, VariableSeries};
use crate::readers::{DateStrategy, RecordParser};

/// Merges all file-fragments of one variable into a single deduplicated,
/// chronologically ordered series.
///
/// Fragments are ordered by declared start month (stable, ties keep encounter
/// order) and parsed in parallel. Records are concatenated in fragment order
/// and deduplicated by timestamp, first-seen-wins: a timestamp covered by an
/// earlier fragment keeps that fragment's value, later occurrences are
/// discarded.
#[derive(Debug, Clone)]
pub struct SeriesMerger {
    embedded_headers: bool,
    use_mmap: bool,
}

impl SeriesMerger {
    pub fn new() -> Self {
        Self {
            embedded_headers: false,
            use_mmap: false,
        }
    }

    /// Resolve base dates from in-file `Start :` markers instead of the
    /// filename period. Used when re-ingesting legacy exports.
    pub fn with_embedded_headers(mut self, embedded_headers: bool) -> Self {
        self.embedded_headers = embedded_headers;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Merge the fragments of one variable. No fragments means no data for
    /// this variable, signalled as `None`, not an error.
    pub fn merge(&self, kind: VariableKind, fragments: &[Fragment]) -> Result<Option<VariableSeries>> {
        if fragments.is_empty() {
            return Ok(None);
        }

        let mut ordered: Vec<&Fragment> = fragments.iter().collect();
        ordered.sort_by_key(|fragment| fragment.start);

        // Parse fragments in parallel; collect keeps fragment order
        let parser = RecordParser::with_mmap(self.use_mmap);
        let parsed: Vec<Vec<RawRecord>> = ordered
            .par_iter()
            .map(|fragment| parser.parse_file(&fragment.path, &self.strategy_for(fragment)))
            .collect::<Result<Vec<_>>>()?;

        // First-seen-wins across the concatenation
        let mut seen = HashSet::new();
        let mut records: Vec<RawRecord> = Vec::new();
        for fragment_records in parsed {
            for record in fragment_records {
                if seen.insert(record.timestamp) {
                    records.push(record);
                }
            }
        }

        records.sort_by_key(|record| record.timestamp);

        Ok(Some(VariableSeries::new(kind, records)))
    }

    fn strategy_for(&self, fragment: &Fragment) -> DateStrategy {
        if self.embedded_headers {
            DateStrategy::EmbeddedHeader
        } else {
            DateStrategy::FixedFromFilename(fragment.start)
        }
    }
}

impl Default for SeriesMerger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_fragment(dir: &Path, name: &str, lines: &[&str]) -> Fragment {
        let path = dir.join(name);
        let mut content = String::from("day,hour,value\n");
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        std::fs::write(&path, content).unwrap();

        let (kind, start, end) = crate::utils::filename::parse_fragment_filename(name).unwrap();
        Fragment::new(path, kind, start, end)
    }

    #[test]
    fn test_merge_no_fragments_is_no_data() {
        let merger = SeriesMerger::new();
        let result = merger.merge(VariableKind::Temperature, &[]).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_merge_sorts_and_deduplicates() {
        let temp_dir = TempDir::new().unwrap();

        // January file reaches into February via day offsets
        let jan = write_fragment(
            temp_dir.path(),
            "temperature_202301_202301.csv",
            &["2, 0000, 2.0", "1, 0000, 1.0", "32, 0000, 99.0"],
        );
        // February file overlaps the Feb 1 timestamp
        let feb = write_fragment(
            temp_dir.path(),
            "temperature_202302_202302.csv",
            &["1, 0000, -5.0", "2, 0000, -6.0"],
        );

        let merger = SeriesMerger::new();
        let series = merger
            .merge(VariableKind::Temperature, &[jan, feb])
            .unwrap()
            .unwrap();

        assert_eq!(series.len(), 4);

        // Strictly increasing timestamps
        for pair in series.records.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }

        // Overlapping Feb 1 keeps the earlier fragment's value
        let feb1 = NaiveDate::from_ymd_opt(2023, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let overlap = series
            .records
            .iter()
            .find(|record| record.timestamp == feb1)
            .unwrap();
        assert_eq!(overlap.value, 99.0);
    }

    #[test]
    fn test_merge_orders_fragments_by_start_month() {
        let temp_dir = TempDir::new().unwrap();

        let feb = write_fragment(
            temp_dir.path(),
            "temperature_202302_202302.csv",
            &["1, 0000, -5.0"],
        );
        let jan = write_fragment(
            temp_dir.path(),
            "temperature_202301_202301.csv",
            &["32, 0000, 99.0"],
        );

        // Encounter order is Feb first, but January's start month wins the
        // overlapping Feb 1 timestamp
        let merger = SeriesMerger::new();
        let series = merger
            .merge(VariableKind::Temperature, &[feb, jan])
            .unwrap()
            .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.records[0].value, 99.0);
    }

    #[test]
    fn test_merge_embedded_headers() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("temperature_202301_202302.csv");
        std::fs::write(
            &path,
            " format: day,hour,value location:60_127 Start : 20230101 \n 1, 0000, 1.500000 \n",
        )
        .unwrap();

        let fragment = Fragment::new(
            path,
            VariableKind::Temperature,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
        );

        let merger = SeriesMerger::new().with_embedded_headers(true);
        let series = merger
            .merge(VariableKind::Temperature, &[fragment])
            .unwrap()
            .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.records[0].value, 1.5);
    }
}
