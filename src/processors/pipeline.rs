use chrono::NaiveDate;
use std::path::PathBuf;
use tokio::task::JoinHandle;

use crate::error::{ProcessingError, Result};
use crate::models::{Fragment, SeriesMap, VariableKind, VariableSeries};
use crate::processors::{DailyAggregator, SeriesMerger, TableJoiner};
use crate::readers::discover_fragments;
use crate::utils::constants::DAILY_FILE_PREFIX;
use crate::utils::filename::{legacy_fragment_filename, period_label};
use crate::utils::progress::ProgressReporter;
use crate::utils::workspace::DataDirs;
use crate::writers::{CsvWriter, SqliteWriter};

type MergeOutcome = Option<(VariableSeries, (NaiveDate, NaiveDate))>;

/// The full batch: discover fragments, merge the three variables
/// concurrently, join into the unified hourly table, aggregate daily
/// statistics, and write every sink.
///
/// The per-variable merges read disjoint inputs and run as independent tasks;
/// all three must settle before the join. Sinks are dropped and recreated on
/// every run, so re-running over unchanged input replaces rather than
/// appends.
pub struct Pipeline {
    embedded_headers: bool,
    use_mmap: bool,
    site_code: String,
}

/// What a run produced, for CLI reporting.
pub struct PipelineSummary {
    pub series_counts: Vec<(VariableKind, usize)>,
    pub unified_rows: usize,
    pub daily_days: usize,
    pub period: (NaiveDate, NaiveDate),
    pub legacy_exports: Vec<PathBuf>,
    pub unified_csv: PathBuf,
    pub unified_db: PathBuf,
    pub daily_csv: PathBuf,
    pub daily_db: PathBuf,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            embedded_headers: false,
            use_mmap: false,
            site_code: crate::utils::constants::DEFAULT_SITE_CODE.to_string(),
        }
    }

    pub fn with_embedded_headers(mut self, embedded_headers: bool) -> Self {
        self.embedded_headers = embedded_headers;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_site_code(mut self, site_code: &str) -> Self {
        self.site_code = site_code.to_string();
        self
    }

    pub async fn run(
        &self,
        dirs: &DataDirs,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineSummary> {
        if let Some(p) = progress {
            p.set_message("Scanning raw exports...");
        }

        let mut groups = discover_fragments(&dirs.raw)?;

        if let Some(p) = progress {
            p.set_message("Merging variable series...");
        }

        let temp_handle = self.spawn_merge(
            VariableKind::Temperature,
            groups.remove(&VariableKind::Temperature).unwrap_or_default(),
        );
        let amount_handle = self.spawn_merge(
            VariableKind::PrecipAmount,
            groups.remove(&VariableKind::PrecipAmount).unwrap_or_default(),
        );
        let type_handle = self.spawn_merge(
            VariableKind::PrecipType,
            groups.remove(&VariableKind::PrecipType).unwrap_or_default(),
        );

        let (temp, amount, ptype) = tokio::try_join!(temp_handle, amount_handle, type_handle)?;

        let csv_writer = CsvWriter::new().with_site_code(&self.site_code);

        let mut series_map = SeriesMap::new();
        let mut periods: Vec<(NaiveDate, NaiveDate)> = Vec::new();
        let mut series_counts = Vec::new();
        let mut legacy_exports = Vec::new();

        for outcome in [temp, amount, ptype] {
            let Some((series, period)) = outcome? else {
                continue;
            };
            if series.is_empty() {
                continue;
            }

            // Write the merged series back in the source-like format
            let export_path = dirs
                .processed
                .join(legacy_fragment_filename(series.kind, period.0, period.1));
            csv_writer.write_legacy_export(&series, period.0, &export_path)?;
            legacy_exports.push(export_path);

            series_counts.push((series.kind, series.len()));
            periods.push(period);
            series_map.insert(series);
        }

        // Temperature anchors the unified table; without it the run is
        // meaningless and must abort
        if !series_map.contains(VariableKind::Temperature) {
            return Err(ProcessingError::MissingData(format!(
                "no temperature data found in {}",
                dirs.raw.display()
            )));
        }

        let start = periods.iter().map(|period| period.0).min();
        let end = periods.iter().map(|period| period.1).max();
        let (Some(start), Some(end)) = (start, end) else {
            return Err(ProcessingError::DataMerge(
                "merged series carry no declared period".to_string(),
            ));
        };
        let label = period_label(start, end);

        if let Some(p) = progress {
            p.set_message("Joining unified hourly table...");
        }

        let unified = TableJoiner::new().join(&series_map);

        let unified_csv = dirs.processed.join(format!("{}.csv", label));
        csv_writer.write_unified(&unified, &unified_csv)?;

        let sqlite_writer = SqliteWriter::new();
        let unified_db = dirs.db.join(format!("{}.db", label));
        sqlite_writer.write_unified(&unified, &unified_db)?;

        if let Some(p) = progress {
            p.set_message("Aggregating daily statistics...");
        }

        let daily = DailyAggregator::new().aggregate(&unified);

        let daily_csv = dirs
            .processed
            .join(format!("{}_{}.csv", DAILY_FILE_PREFIX, label));
        csv_writer.write_daily(&daily, &daily_csv)?;

        let daily_db = dirs.db.join(format!("{}_{}.db", DAILY_FILE_PREFIX, label));
        sqlite_writer.write_daily(&daily, &daily_db)?;

        if let Some(p) = progress {
            p.finish_with_message("Pipeline complete");
        }

        Ok(PipelineSummary {
            series_counts,
            unified_rows: unified.len(),
            daily_days: daily.len(),
            period: (start, end),
            legacy_exports,
            unified_csv,
            unified_db,
            daily_csv,
            daily_db,
        })
    }

    fn spawn_merge(
        &self,
        kind: VariableKind,
        fragments: Vec<Fragment>,
    ) -> JoinHandle<Result<MergeOutcome>> {
        let merger = SeriesMerger::new()
            .with_embedded_headers(self.embedded_headers)
            .with_mmap(self.use_mmap);

        tokio::spawn(async move {
            let start = fragments.iter().map(|fragment| fragment.start).min();
            let end = fragments.iter().map(|fragment| fragment.end).max();
            let (Some(start), Some(end)) = (start, end) else {
                return Ok(None);
            };

            Ok(merger
                .merge(kind, &fragments)?
                .map(|series| (series, (start, end))))
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
