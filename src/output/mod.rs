//! Output pass: Diagram + Graph → `<dbId>.json` and `<dbId>.graph.json`.
//!
//! Public API: `render(diagram, graph) -> RenderedOutput`, then
//! `JsonWriter::write` to place the files atomically.

mod writer;

pub use writer::JsonWriter;

use serde::Serialize;

use crate::error::ConvertError;
use crate::graph::types::Graph;
use crate::layout::types::Diagram;

/// A rendered file with its name (relative to the output directory) and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// The two documents of one pathway, layout first.
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub files: Vec<GeneratedFile>,
}

pub fn diagram_file_name(db_id: i64) -> String {
    format!("{}.json", db_id)
}

pub fn graph_file_name(db_id: i64) -> String {
    format!("{}.graph.json", db_id)
}

/// Serialize both documents. Output is deterministic for equal inputs.
pub fn render(diagram: &Diagram, graph: &Graph) -> Result<RenderedOutput, ConvertError> {
    Ok(RenderedOutput {
        files: vec![
            GeneratedFile {
                path: diagram_file_name(diagram.db_id),
                content: to_json(diagram)?,
            },
            GeneratedFile {
                path: graph_file_name(graph.db_id),
                content: to_json(graph)?,
            },
        ],
    })
}

/// Pretty JSON, newline-terminated.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, ConvertError> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| ConvertError::io("W002", format!("Failed to serialize document: {}", e)))?;
    json.push('\n');
    Ok(json)
}
