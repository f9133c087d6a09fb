use chrono::NaiveDate;
use std::path::PathBuf;

use crate::models::VariableKind;

/// One source file's contribution to a variable's overall time range, with
/// the period declared by its filename (months anchored to day 1).
#[derive(Debug, Clone)]
pub struct Fragment {
    pub path: PathBuf,
    pub kind: VariableKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Fragment {
    pub fn new(path: PathBuf, kind: VariableKind, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            path,
            kind,
            start,
            end,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
