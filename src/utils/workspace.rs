use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::constants::{DB_DIR, PROCESSED_DIR, RAW_DIR};

/// Data directory layout rooted at a base path: `raw` holds source exports,
/// `processed` the merged and unified CSV artifacts, `db` the SQLite sinks.
#[derive(Debug, Clone)]
pub struct DataDirs {
    pub raw: PathBuf,
    pub processed: PathBuf,
    pub db: PathBuf,
}

impl DataDirs {
    pub fn new(base: &Path) -> Self {
        Self {
            raw: base.join(RAW_DIR),
            processed: base.join(PROCESSED_DIR),
            db: base.join(DB_DIR),
        }
    }

    /// Create the directory tree. Deployment/init concern, invoked once
    /// before the pipeline runs.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.raw)?;
        std::fs::create_dir_all(&self.processed)?;
        std::fs::create_dir_all(&self.db)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_creates_tree() {
        let temp_dir = TempDir::new().unwrap();
        let dirs = DataDirs::new(temp_dir.path());

        assert!(!dirs.raw.exists());
        dirs.ensure().unwrap();

        assert!(dirs.raw.is_dir());
        assert!(dirs.processed.is_dir());
        assert!(dirs.db.is_dir());

        // Second call is a no-op on an existing tree
        dirs.ensure().unwrap();
    }
}
