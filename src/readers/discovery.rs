use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;
use crate::models::{Fragment, VariableKind};
use crate::utils::filename::parse_fragment_filename;

/// Scan a source directory and group fragment files by variable kind.
///
/// Files that do not match `<variable>_<YYYYMM>_<YYYYMM>.csv` are skipped
/// with a diagnostic; the scan never fails on them. Directory entries are
/// visited in filename order so the merge tie-break stays deterministic, and
/// each group is ordered by declared start month (stable, so equal starts
/// keep encounter order).
pub fn discover_fragments(source_dir: &Path) -> Result<HashMap<VariableKind, Vec<Fragment>>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(source_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut groups: HashMap<VariableKind, Vec<Fragment>> = HashMap::new();

    for path in paths {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        match parse_fragment_filename(&name) {
            Some((kind, start, end)) => {
                groups
                    .entry(kind)
                    .or_default()
                    .push(Fragment::new(path, kind, start, end));
            }
            None => {
                warn!(
                    file = %name,
                    "skipping file that does not match <variable>_<YYYYMM>_<YYYYMM>.csv"
                );
            }
        }
    }

    for fragments in groups.values_mut() {
        fragments.sort_by_key(|fragment| fragment.start);
    }

    Ok(groups)
}
