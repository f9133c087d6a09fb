use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::VariableKind;

/// One row of the unified hourly table: a calendar date, an hour of day and
/// one nullable column per variable. Absent readings stay `None` all the way
/// to the sinks (NULL in SQLite, empty field in CSV) — never a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedRow {
    pub date: NaiveDate,
    pub hour: u32,
    pub temperature: Option<f64>,
    pub rain_prob: Option<f64>,
    pub rain_type: Option<f64>,
}

impl UnifiedRow {
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        Self {
            date: timestamp.date(),
            hour: timestamp.hour(),
            temperature: None,
            rain_prob: None,
            rain_type: None,
        }
    }

    /// Date formatted as the sink key, e.g. `20230115`.
    pub fn date_key(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    pub fn set_value(&mut self, kind: VariableKind, value: f64) {
        match kind {
            VariableKind::Temperature => self.temperature = Some(value),
            VariableKind::PrecipAmount => self.rain_prob = Some(value),
            VariableKind::PrecipType => self.rain_type = Some(value),
        }
    }

    pub fn value(&self, kind: VariableKind) -> Option<f64> {
        match kind {
            VariableKind::Temperature => self.temperature,
            VariableKind::PrecipAmount => self.rain_prob,
            VariableKind::PrecipType => self.rain_type,
        }
    }
}

/// Daily min/max temperature summary, one row per date that had at least one
/// non-null temperature reading. Values are rounded to 1 decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
}

impl DailyStat {
    pub fn new(date: NaiveDate, min_temp: f64, max_temp: f64) -> Self {
        Self {
            date,
            min_temp,
            max_temp,
        }
    }

    pub fn date_key(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }
}
