use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::{DailyStat, UnifiedRow};

/// Reduces the unified hourly table to one min/max-temperature row per
/// calendar date. Dates whose temperature readings are all null are excluded
/// rather than fabricated.
pub struct DailyAggregator;

impl DailyAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, rows: &[UnifiedRow]) -> Vec<DailyStat> {
        let mut extremes: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

        for row in rows {
            let Some(temp) = row.temperature else {
                continue;
            };

            extremes
                .entry(row.date)
                .and_modify(|(min, max)| {
                    if temp < *min {
                        *min = temp;
                    }
                    if temp > *max {
                        *max = temp;
                    }
                })
                .or_insert((temp, temp));
        }

        extremes
            .into_iter()
            .map(|(date, (min, max))| DailyStat::new(date, round_one_decimal(min), round_one_decimal(max)))
            .collect()
    }
}

impl Default for DailyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to one decimal place, half away from zero.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(day: u32, hour: u32, temperature: Option<f64>) -> UnifiedRow {
        UnifiedRow {
            date: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
            hour,
            temperature,
            rain_prob: None,
            rain_type: None,
        }
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let rows = vec![
            row(1, 0, Some(5.12)),
            row(1, 1, Some(5.18)),
            row(1, 2, Some(-2.25)),
            row(1, 3, Some(-2.35)),
        ];

        let stats = DailyAggregator::new().aggregate(&rows);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].min_temp, -2.4);
        assert_eq!(stats[0].max_temp, 5.2);
    }

    #[test]
    fn test_null_temperatures_ignored_within_a_date() {
        let rows = vec![row(1, 0, None), row(1, 1, Some(3.0)), row(1, 2, Some(7.0))];

        let stats = DailyAggregator::new().aggregate(&rows);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].min_temp, 3.0);
        assert_eq!(stats[0].max_temp, 7.0);
    }

    #[test]
    fn test_all_null_dates_excluded() {
        let rows = vec![
            row(1, 0, Some(1.0)),
            row(2, 0, None),
            row(2, 1, None),
            row(3, 0, Some(-1.0)),
        ];

        let stats = DailyAggregator::new().aggregate(&rows);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].date_key(), "20230101");
        assert_eq!(stats[1].date_key(), "20230103");
    }

    #[test]
    fn test_output_ordered_by_date() {
        let rows = vec![row(3, 0, Some(3.0)), row(1, 0, Some(1.0)), row(2, 0, Some(2.0))];

        let stats = DailyAggregator::new().aggregate(&rows);

        let dates: Vec<String> = stats.iter().map(|stat| stat.date_key()).collect();
        assert_eq!(dates, ["20230101", "20230102", "20230103"]);
    }

    #[test]
    fn test_empty_input() {
        let stats = DailyAggregator::new().aggregate(&[]);
        assert!(stats.is_empty());
    }
}
