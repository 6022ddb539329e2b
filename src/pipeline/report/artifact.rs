use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::ModuleId;

/// A generated report. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub module: ModuleId,
    pub file_name: &'static str,
    pub bytes: Arc<[u8]>,
}

impl ReportArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write under `dir` using the module's file name. Returns the path.
    pub fn write_to_dir(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name);
        std::fs::write(&path, &self.bytes)?;
        tracing::info!(
            module = %self.module,
            path = %path.display(),
            bytes = self.bytes.len(),
            "Report written"
        );
        Ok(path)
    }
}
