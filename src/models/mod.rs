pub mod fragment;
pub mod unified;
pub mod variable;

pub use fragment::Fragment;
pub use unified::{DailyStat, UnifiedRow};
pub use variable::{RawRecord, SeriesMap, VariableKind, VariableSeries};
