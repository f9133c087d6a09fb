use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One meteorological variable tracked by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    Temperature,
    PrecipAmount,
    PrecipType,
}

impl VariableKind {
    /// All kinds, in the unified-table column order.
    pub const ALL: [VariableKind; 3] = [
        VariableKind::Temperature,
        VariableKind::PrecipAmount,
        VariableKind::PrecipType,
    ];

    pub fn from_file_token(token: &str) -> Option<Self> {
        match token {
            "temperature" => Some(VariableKind::Temperature),
            "precipitation-amount" => Some(VariableKind::PrecipAmount),
            "precipitation-type" => Some(VariableKind::PrecipType),
            _ => None,
        }
    }

    pub fn file_token(&self) -> &'static str {
        match self {
            VariableKind::Temperature => "temperature",
            VariableKind::PrecipAmount => "precipitation-amount",
            VariableKind::PrecipType => "precipitation-type",
        }
    }

    /// Column name in the unified table.
    pub fn column_name(&self) -> &'static str {
        match self {
            VariableKind::Temperature => "temperature",
            VariableKind::PrecipAmount => "rain_prob",
            VariableKind::PrecipType => "rain_type",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VariableKind::Temperature => "Temperature",
            VariableKind::PrecipAmount => "Precipitation (Amount)",
            VariableKind::PrecipType => "Precipitation (Type)",
        }
    }
}

/// One parsed observation: naive local timestamp plus measured value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl RawRecord {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// The merged series for one variable. Post-merge invariant: timestamps
/// strictly increasing with no duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSeries {
    pub kind: VariableKind,
    pub records: Vec<RawRecord>,
}

impl VariableSeries {
    pub fn new(kind: VariableKind, records: Vec<RawRecord>) -> Self {
        Self { kind, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Capability-checked mapping from variable kind to its merged series. The
/// join iterates `VariableKind::ALL` and queries presence here instead of
/// branching on per-variable flags.
#[derive(Debug, Default)]
pub struct SeriesMap {
    inner: HashMap<VariableKind, VariableSeries>,
}

impl SeriesMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: VariableSeries) {
        self.inner.insert(series.kind, series);
    }

    pub fn get(&self, kind: VariableKind) -> Option<&VariableSeries> {
        self.inner.get(&kind)
    }

    pub fn contains(&self, kind: VariableKind) -> bool {
        self.inner.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Kinds present, in column order.
    pub fn kinds(&self) -> impl Iterator<Item = VariableKind> + '_ {
        VariableKind::ALL
            .into_iter()
            .filter(|kind| self.inner.contains_key(kind))
    }
}
