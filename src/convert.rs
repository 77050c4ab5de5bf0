//! Batch conversion: every `PathwayDiagram` record → two JSON documents.
//!
//! Pathways are converted one after another; a failure skips only the
//! pathway it occurred in.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, info_span, warn};

use crate::error::{ConvertError, ErrorKind};
use crate::graph::{self, Graph};
use crate::layout::{self, Diagram, LayoutContext, LayoutMode};
use crate::output::{self, JsonWriter};
use crate::parse::{self, ProcessSchema};
use crate::source::class::{self, attr};
use crate::source::{Database, Record};
use crate::trivial::TrivialChemicals;

/// A pathway that was not converted, with the reason.
#[derive(Debug, Clone)]
pub struct Skipped {
    /// The `PathwayDiagram` record id.
    pub record_id: i64,
    pub error: ConvertError,
}

#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    /// `PathwayDiagram` record ids whose two documents were written.
    pub converted: Vec<i64>,
    pub skipped: Vec<Skipped>,
    /// True when the run stopped early on a cancellation request.
    pub cancelled: bool,
}

impl ConversionReport {
    /// Number of files a complete run is expected to have produced.
    pub fn expected_files(&self) -> usize {
        self.converted.len() * 2
    }

    pub fn skipped_with(&self, kind: ErrorKind) -> usize {
        self.skipped.iter().filter(|s| s.error.kind == kind).count()
    }
}

/// Both documents of one pathway diagram, keyed by the diagram record id.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub diagram: Diagram,
    pub graph: Graph,
}

pub struct Converter<'a> {
    db: &'a dyn Database,
    schema: &'a ProcessSchema,
    trivial: &'a TrivialChemicals,
    cancel: Arc<AtomicBool>,
}

impl<'a> Converter<'a> {
    pub fn new(db: &'a dyn Database, schema: &'a ProcessSchema, trivial: &'a TrivialChemicals) -> Self {
        Converter {
            db,
            schema,
            trivial,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a cancellation flag; it is checked before each pathway.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Convert every `PathwayDiagram` record and write the results.
    pub fn convert_all(&self, writer: &JsonWriter) -> ConversionReport {
        let records = self.db.list_by_class(class::PATHWAY_DIAGRAM);
        info!(records = records.len(), output = %writer.dir().display(), "starting conversion");

        let mut report = ConversionReport::default();
        for record in records {
            if self.cancel.load(Ordering::Relaxed) {
                warn!("conversion cancelled");
                report.cancelled = true;
                break;
            }

            let span = info_span!("pathway", record = record.id());
            let _enter = span.enter();

            match self.convert_and_write(record, writer) {
                Ok(db_id) => report.converted.push(db_id),
                Err(err) => {
                    log_skip(&err);
                    report.skipped.push(Skipped {
                        record_id: record.id(),
                        error: err,
                    });
                }
            }
        }

        info!(
            converted = report.converted.len(),
            skipped = report.skipped.len(),
            "conversion finished"
        );
        report
    }

    fn convert_and_write(&self, record: &Record, writer: &JsonWriter) -> Result<i64, ConvertError> {
        let conversion = self.convert(record)?;
        let rendered = output::render(&conversion.diagram, &conversion.graph)?;
        writer.write(&rendered)?;
        info!(
            db_id = conversion.diagram.db_id,
            nodes = conversion.diagram.nodes.len(),
            shadows = conversion.diagram.shadows.len(),
            "pathway converted"
        );
        Ok(conversion.diagram.db_id)
    }

    /// Run the in-memory pipeline for one `PathwayDiagram` record.
    pub fn convert(&self, record: &Record) -> Result<Conversion, ConvertError> {
        let pathway = self.represented_pathway(record)?;

        let xml = record
            .text(attr::STORED_ATXML)
            .filter(|xml| !xml.trim().is_empty())
            .ok_or_else(|| {
                ConvertError::missing(
                    "C002",
                    format!("Pathway diagram {} has no stored ATXML", record.id()),
                )
            })?;

        let process = parse::parse(xml, self.schema)?;
        if process.is_empty() {
            return Err(ConvertError::empty(
                "C003",
                format!("Pathway {} has no components", pathway.id()),
            ));
        }

        let ctx = LayoutContext {
            db_id: record.id(),
            pathway,
            mode: LayoutMode::PathwayDiagram,
        };
        let mut diagram = layout::build(&process, self.db, &ctx)?;
        let graph = graph::build(&diagram, self.db, pathway)?;
        layout::create_shadows(&mut diagram, &graph)?;
        self.trivial.annotate(&mut diagram, &graph);

        Ok(Conversion { diagram, graph })
    }

    fn represented_pathway(&self, record: &Record) -> Result<&'a Record, ConvertError> {
        let pathway = record
            .reference(attr::REPRESENTED_PATHWAY)
            .and_then(|id| self.db.record(id))
            .ok_or_else(|| {
                ConvertError::missing(
                    "C001",
                    format!("Pathway diagram {} has no represented pathway", record.id()),
                )
            })?;
        if !class::is_pathway(&pathway.schema_class) {
            return Err(ConvertError::missing(
                "C004",
                format!(
                    "Pathway diagram {} represents {} ({}), not a pathway",
                    record.id(),
                    pathway.id(),
                    pathway.schema_class
                ),
            ));
        }
        Ok(pathway)
    }
}

fn log_skip(err: &ConvertError) {
    let reference = err.reference.as_deref().unwrap_or_default();
    if err.kind.is_warning() {
        warn!(code = %err.code, kind = %err.kind, "{}", err.message);
    } else {
        error!(code = %err.code, kind = %err.kind, reference, "{}", err.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{AttrValue, MemoryDatabase};

    fn diagram_record(id: i64, pathway: Option<i64>, xml: &str) -> Record {
        let mut record = Record::new(id, class::PATHWAY_DIAGRAM)
            .with(attr::STORED_ATXML, AttrValue::Text(xml.into()));
        if let Some(p) = pathway {
            record = record.with(attr::REPRESENTED_PATHWAY, AttrValue::Ref { target: p });
        }
        record
    }

    fn convert_one(db: &MemoryDatabase, id: i64) -> Result<Conversion, ConvertError> {
        let schema = ProcessSchema::builtin().unwrap();
        let trivial = TrivialChemicals::default();
        let converter = Converter::new(db, &schema, &trivial);
        converter.convert(db.record(id).unwrap())
    }

    #[test]
    fn missing_represented_pathway_is_a_prerequisite_failure() {
        let db = MemoryDatabase::from_records([diagram_record(1, None, "<Process/>")]);
        let err = convert_one(&db, 1).unwrap_err();
        assert_eq!(err.code, "C001");
        assert_eq!(err.kind, ErrorKind::MissingPrerequisite);
    }

    #[test]
    fn represented_record_that_is_not_a_pathway_is_skipped() {
        let db = MemoryDatabase::from_records([
            diagram_record(1, Some(2), "<Process/>"),
            Record::new(2, "Reaction"),
        ]);
        let err = convert_one(&db, 1).unwrap_err();
        assert_eq!(err.code, "C004");
        assert!(err.kind.is_warning());
    }

    #[test]
    fn blank_atxml_is_a_prerequisite_failure() {
        let db = MemoryDatabase::from_records([
            diagram_record(1, Some(2), "  "),
            Record::new(2, class::PATHWAY),
        ]);
        assert_eq!(convert_one(&db, 1).unwrap_err().code, "C002");
    }

    #[test]
    fn process_without_components_is_empty() {
        let db = MemoryDatabase::from_records([
            diagram_record(1, Some(2), "<Process><Nodes/></Process>"),
            Record::new(2, class::PATHWAY),
        ]);
        let err = convert_one(&db, 1).unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyDiagram);
    }

    #[test]
    fn documents_are_keyed_by_the_diagram_record() {
        let xml = r#"<Process><Nodes>
            <Node id="1" reactomeId="3" x="0" y="0" width="10" height="10"/>
        </Nodes></Process>"#;
        let db = MemoryDatabase::from_records([
            diagram_record(1, Some(2), xml),
            Record::new(2, class::PATHWAY).with(attr::DISPLAY_NAME, AttrValue::Text("P".into())),
            Record::new(3, "SimpleEntity"),
        ]);
        let conversion = convert_one(&db, 1).unwrap();
        assert_eq!(conversion.diagram.db_id, 1);
        assert_eq!(conversion.graph.db_id, 1);
        assert_eq!(conversion.diagram.display_name, "P");
    }

    #[test]
    fn cancelled_run_converts_nothing() {
        let db = MemoryDatabase::from_records([
            diagram_record(1, Some(2), "<Process/>"),
            Record::new(2, class::PATHWAY),
        ]);
        let schema = ProcessSchema::builtin().unwrap();
        let trivial = TrivialChemicals::default();
        let dir = tempfile::tempdir().unwrap();
        let writer = JsonWriter::new(dir.path()).unwrap();
        let report = Converter::new(&db, &schema, &trivial)
            .with_cancel(Arc::new(AtomicBool::new(true)))
            .convert_all(&writer);
        assert!(report.cancelled);
        assert!(report.converted.is_empty());
        assert!(report.skipped.is_empty());
    }
}
