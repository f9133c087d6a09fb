use chrono::{NaiveDate, Timelike};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::models::{DailyStat, UnifiedRow, VariableSeries};
use crate::utils::constants::DEFAULT_SITE_CODE;

/// Flat-file exports: the unified hourly CSV, the daily summary CSV and the
/// legacy per-variable format that round-trips merged series back to
/// source-like text.
pub struct CsvWriter {
    site_code: String,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self {
            site_code: DEFAULT_SITE_CODE.to_string(),
        }
    }

    pub fn with_site_code(mut self, site_code: &str) -> Self {
        self.site_code = site_code.to_string();
        self
    }

    /// Unified table as CSV, same column order as the SQLite sink. Null
    /// readings become empty fields.
    pub fn write_unified(&self, rows: &[UnifiedRow], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(["date", "hour", "temperature", "rain_prob", "rain_type"])?;
        for row in rows {
            writer.serialize((
                row.date_key(),
                row.hour,
                row.temperature,
                row.rain_prob,
                row.rain_type,
            ))?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_daily(&self, stats: &[DailyStat], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(["date", "min_temp", "max_temp"])?;
        for stat in stats {
            writer.serialize((stat.date_key(), stat.min_temp, stat.max_temp))?;
        }

        writer.flush()?;
        Ok(())
    }

    /// One merged series in the source-like format: a `Start :` header line
    /// anchored to the series period, then day-offset records with 4-digit
    /// hour codes and 6-decimal values.
    pub fn write_legacy_export(
        &self,
        series: &VariableSeries,
        start: NaiveDate,
        path: &Path,
    ) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            " format: day,hour,value location:{} Start : {}01 ",
            self.site_code,
            start.format("%Y%m")
        )?;

        for record in &series.records {
            let day = (record.timestamp.date() - start).num_days() + 1;
            let hour_code = record.timestamp.hour() * 100;
            writeln!(writer, " {}, {:04}, {:.6} ", day, hour_code, record.value)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
