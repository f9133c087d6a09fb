use chrono::NaiveDate;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;

use crate::error::Result;
use crate::models::{DailyStat, UnifiedRow};
use crate::utils::constants::{DAILY_TABLE, UNIFIED_TABLE};

/// SQLite sink for the unified hourly table and the daily summary.
///
/// Every write drops and recreates its table, so re-running the pipeline
/// over an overlapping or identical range replaces the previous content
/// instead of appending to it.
pub struct SqliteWriter;

/// Basic facts about a unified database, for the `info` command.
pub struct UnifiedDbInfo {
    pub total_rows: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

impl SqliteWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_unified(&self, rows: &[UnifiedRow], db_path: &Path) -> Result<()> {
        let mut conn = Connection::open(db_path)?;

        conn.execute(&format!("DROP TABLE IF EXISTS {}", UNIFIED_TABLE), [])?;
        conn.execute(
            &format!(
                "CREATE TABLE {} (
                    date TEXT NOT NULL,
                    hour INTEGER NOT NULL,
                    temperature REAL,
                    rain_prob REAL,
                    rain_type REAL
                )",
                UNIFIED_TABLE
            ),
            (),
        )?;

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (date, hour, temperature, rain_prob, rain_type)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                UNIFIED_TABLE
            ))?;

            for row in rows {
                stmt.execute(params![
                    row.date_key(),
                    row.hour,
                    row.temperature,
                    row.rain_prob,
                    row.rain_type,
                ])?;
            }
        }
        tx.commit()?;

        conn.execute(
            &format!("CREATE INDEX idx_date_hour ON {}(date, hour)", UNIFIED_TABLE),
            [],
        )?;

        Ok(())
    }

    pub fn write_daily(&self, stats: &[DailyStat], db_path: &Path) -> Result<()> {
        let mut conn = Connection::open(db_path)?;

        conn.execute(&format!("DROP TABLE IF EXISTS {}", DAILY_TABLE), [])?;
        conn.execute(
            &format!(
                "CREATE TABLE {} (
                    date TEXT NOT NULL,
                    min_temp REAL NOT NULL,
                    max_temp REAL NOT NULL
                )",
                DAILY_TABLE
            ),
            (),
        )?;

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (date, min_temp, max_temp) VALUES (?1, ?2, ?3)",
                DAILY_TABLE
            ))?;

            for stat in stats {
                stmt.execute(params![stat.date_key(), stat.min_temp, stat.max_temp])?;
            }
        }
        tx.commit()?;

        conn.execute(&format!("CREATE INDEX idx_date ON {}(date)", DAILY_TABLE), [])?;

        Ok(())
    }

    /// Read a persisted unified table back, ordered by (date, hour).
    pub fn read_unified(&self, db_path: &Path) -> Result<Vec<UnifiedRow>> {
        let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT date, hour, temperature, rain_prob, rain_type
             FROM {} ORDER BY date, hour",
            UNIFIED_TABLE
        ))?;

        let mapped = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, Option<f64>>(2)?,
                row.get::<_, Option<f64>>(3)?,
                row.get::<_, Option<f64>>(4)?,
            ))
        })?;

        let mut rows = Vec::new();
        for result in mapped {
            let (date_str, hour, temperature, rain_prob, rain_type) = result?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y%m%d")?;
            rows.push(UnifiedRow {
                date,
                hour,
                temperature,
                rain_prob,
                rain_type,
            });
        }

        Ok(rows)
    }

    /// Read the first `limit` rows of a unified table, for display.
    pub fn read_unified_sample(&self, db_path: &Path, limit: usize) -> Result<Vec<UnifiedRow>> {
        let mut rows = self.read_unified(db_path)?;
        rows.truncate(limit);
        Ok(rows)
    }

    pub fn unified_info(&self, db_path: &Path) -> Result<UnifiedDbInfo> {
        let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        let total_rows: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", UNIFIED_TABLE),
            [],
            |row| row.get(0),
        )?;

        let (first_date, last_date): (Option<String>, Option<String>) = conn.query_row(
            &format!("SELECT MIN(date), MAX(date) FROM {}", UNIFIED_TABLE),
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(UnifiedDbInfo {
            total_rows,
            first_date,
            last_date,
        })
    }
}

impl Default for SqliteWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_rows() -> Vec<UnifiedRow> {
        vec![
            UnifiedRow {
                date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                hour: 0,
                temperature: Some(-1.5),
                rain_prob: Some(30.0),
                rain_type: None,
            },
            UnifiedRow {
                date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                hour: 1,
                temperature: None,
                rain_prob: None,
                rain_type: Some(1.0),
            },
        ]
    }

    #[test]
    fn test_unified_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("202301_202301.db");

        let writer = SqliteWriter::new();
        writer.write_unified(&sample_rows(), &db_path).unwrap();

        let rows = writer.read_unified(&db_path).unwrap();
        assert_eq!(rows, sample_rows());

        let info = writer.unified_info(&db_path).unwrap();
        assert_eq!(info.total_rows, 2);
        assert_eq!(info.first_date.as_deref(), Some("20230101"));
        assert_eq!(info.last_date.as_deref(), Some("20230101"));
    }

    #[test]
    fn test_rewrite_replaces_table() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("202301_202301.db");

        let writer = SqliteWriter::new();
        writer.write_unified(&sample_rows(), &db_path).unwrap();
        writer.write_unified(&sample_rows(), &db_path).unwrap();

        // Replace, not append
        let rows = writer.read_unified(&db_path).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_daily_write() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("daily_temp_202301_202301.db");

        let stats = vec![
            DailyStat::new(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), -2.4, 5.2),
            DailyStat::new(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(), 0.0, 3.1),
        ];

        let writer = SqliteWriter::new();
        writer.write_daily(&stats, &db_path).unwrap();

        let conn = Connection::open_with_flags(&db_path, OpenFlags::SQLITE_OPEN_READ_ONLY).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM daily_temperature", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);

        let (min, max): (f64, f64) = conn
            .query_row(
                "SELECT min_temp, max_temp FROM daily_temperature WHERE date = '20230101'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(min, -2.4);
        assert_eq!(max, 5.2);
    }
}
