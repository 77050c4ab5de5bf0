//! Post-run check of the output directory.
//!
//! Counts the layout and graph documents present and compares the total
//! with what the run is expected to have produced.

use std::path::Path;

use tracing::{info, warn};

use crate::error::ConvertError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub expected: usize,
    pub diagrams: usize,
    pub graphs: usize,
}

impl VerifyReport {
    pub fn found(&self) -> usize {
        self.diagrams + self.graphs
    }

    pub fn is_ok(&self) -> bool {
        self.found() >= self.expected && self.diagrams == self.graphs
    }
}

/// Count `<dbId>.json` and `<dbId>.graph.json` files directly under `dir`.
pub fn verify_output(dir: &Path, expected: usize) -> Result<VerifyReport, ConvertError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        ConvertError::io("W003", format!("Failed to read output directory {}: {}", dir.display(), e))
    })?;

    let mut report = VerifyReport {
        expected,
        diagrams: 0,
        graphs: 0,
    };
    for entry in entries {
        let entry = entry.map_err(|e| ConvertError::io("W003", e.to_string()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(stem) = name.strip_suffix(".graph.json") {
            if is_db_id(stem) {
                report.graphs += 1;
            }
        } else if let Some(stem) = name.strip_suffix(".json") {
            if is_db_id(stem) {
                report.diagrams += 1;
            }
        }
    }

    if report.is_ok() {
        info!(found = report.found(), expected, "output verified");
    } else {
        warn!(
            diagrams = report.diagrams,
            graphs = report.graphs,
            expected,
            "output directory has fewer documents than expected"
        );
    }
    Ok(report)
}

fn is_db_id(stem: &str) -> bool {
    !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_document_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10.json", "10.graph.json", "11.json", "notes.json", "11.graph.json.tmp"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        let report = verify_output(dir.path(), 2).unwrap();
        assert_eq!(report.diagrams, 2);
        assert_eq!(report.graphs, 1);
        assert!(!report.is_ok());
    }

    #[test]
    fn complete_output_passes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("5.json"), "{}").unwrap();
        std::fs::write(dir.path().join("5.graph.json"), "{}").unwrap();
        assert!(verify_output(dir.path(), 2).unwrap().is_ok());
    }

    #[test]
    fn missing_directory_is_an_io_failure() {
        let err = verify_output(Path::new("/nonexistent/output"), 0).unwrap_err();
        assert_eq!(err.code, "W003");
    }
}
