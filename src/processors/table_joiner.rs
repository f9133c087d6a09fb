use chrono::NaiveDateTime;
use std::collections::{BTreeSet, HashMap};

use crate::models::{SeriesMap, UnifiedRow, VariableKind};

/// Outer-joins the merged variable series by timestamp into the unified
/// hourly table.
///
/// Every timestamp present in any provided series yields exactly one row;
/// variables with no reading at that timestamp stay `None`. The join itself
/// never fails on an absent series — the pipeline enforces the
/// temperature-presence precondition before calling it.
pub struct TableJoiner;

impl TableJoiner {
    pub fn new() -> Self {
        Self
    }

    pub fn join(&self, series_map: &SeriesMap) -> Vec<UnifiedRow> {
        // Union of timestamps across all present series, sorted
        let mut timestamps: BTreeSet<NaiveDateTime> = BTreeSet::new();
        let mut lookups: HashMap<VariableKind, HashMap<NaiveDateTime, f64>> = HashMap::new();

        for kind in VariableKind::ALL {
            if let Some(series) = series_map.get(kind) {
                let lookup = lookups.entry(kind).or_default();
                for record in &series.records {
                    timestamps.insert(record.timestamp);
                    lookup.insert(record.timestamp, record.value);
                }
            }
        }

        let mut rows = Vec::with_capacity(timestamps.len());
        for timestamp in timestamps {
            let mut row = UnifiedRow::from_timestamp(timestamp);
            for kind in VariableKind::ALL {
                if let Some(value) = lookups.get(&kind).and_then(|lookup| lookup.get(&timestamp)) {
                    row.set_value(kind, *value);
                }
            }
            rows.push(row);
        }

        rows
    }
}

impl Default for TableJoiner {
    fn default() -> Self {
        Self::new()
    }
}
