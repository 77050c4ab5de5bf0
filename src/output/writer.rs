//! Atomic file placement for rendered documents.
//!
//! Each file is written to a temporary file in the output directory and then
//! renamed over its final name, so readers never see a partial document.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{GeneratedFile, RenderedOutput};
use crate::error::ConvertError;

pub struct JsonWriter {
    dir: PathBuf,
}

impl JsonWriter {
    /// Create the output directory (and its parents) if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ConvertError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ConvertError::fatal(
                "F004",
                format!("Failed to create output directory {}: {}", dir.display(), e),
            )
        })?;
        Ok(JsonWriter { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every file in order; stops at the first failure.
    pub fn write(&self, output: &RenderedOutput) -> Result<Vec<PathBuf>, ConvertError> {
        output.files.iter().map(|f| self.write_file(f)).collect()
    }

    pub fn write_file(&self, file: &GeneratedFile) -> Result<PathBuf, ConvertError> {
        let target = self.dir.join(&file.path);
        let io_error = |e: std::io::Error| {
            ConvertError::io("W001", format!("Failed to write {}: {}", target.display(), e))
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_error)?;
        tmp.write_all(file.content.as_bytes()).map_err(io_error)?;
        tmp.as_file().sync_all().map_err(io_error)?;
        tmp.persist(&target).map_err(|e| io_error(e.error))?;

        debug!(path = %target.display(), bytes = file.content.len(), "wrote document");
        Ok(target)
    }
}
