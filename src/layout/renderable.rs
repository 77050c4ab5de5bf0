//! The closed set of renderable variants and how a node's variant is derived.

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::parse::types::{NodeDescriptor, NodeType};
use crate::source::class::{self, attr};
use crate::source::{Database, Record};

/// Viewers switch on exactly these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderableClass {
    Protein,
    Complex,
    Chemical,
    Rna,
    Dna,
    EntitySet,
    Gene,
    ProcessNode,
    ReactionGlyph,
    Compartment,
    Shadow,
}

/// Derive the variant of an entity node. An explicit type tag wins; `Entity`
/// or a missing tag is resolved from the referenced record's schema class.
pub fn derive(
    descriptor: &NodeDescriptor,
    record: Option<&Record>,
    db: &dyn Database,
) -> Result<RenderableClass, ConvertError> {
    let explicit = match descriptor.node_type {
        Some(NodeType::Protein) => Some(RenderableClass::Protein),
        Some(NodeType::Complex) => Some(RenderableClass::Complex),
        Some(NodeType::Chemical) => Some(RenderableClass::Chemical),
        Some(NodeType::Rna) => Some(RenderableClass::Rna),
        Some(NodeType::Dna) => Some(RenderableClass::Dna),
        Some(NodeType::EntitySet) => Some(RenderableClass::EntitySet),
        Some(NodeType::Gene) => Some(RenderableClass::Gene),
        Some(NodeType::ProcessNode) => Some(RenderableClass::ProcessNode),
        Some(NodeType::Entity) | None => None,
    };
    if let Some(class) = explicit {
        return Ok(class);
    }

    let Some(record) = record else {
        return Err(ConvertError::inconsistent(
            "I007",
            format!(
                "Node {} has an ambiguous type and its entity {} is not in the database",
                descriptor.id, descriptor.reactome_id
            ),
            descriptor.reactome_id,
        ));
    };

    from_schema_class(record, db).ok_or_else(|| {
        ConvertError::inconsistent(
            "I008",
            format!(
                "Cannot derive a renderable class for node {} from schema class '{}'",
                descriptor.id, record.schema_class
            ),
            descriptor.reactome_id,
        )
    })
}

fn from_schema_class(record: &Record, db: &dyn Database) -> Option<RenderableClass> {
    let schema_class = record.schema_class.as_str();
    match schema_class {
        "EntityWithAccessionedSequence" => {
            let reference_class = record
                .reference(attr::REFERENCE_ENTITY)
                .and_then(|id| db.record(id))
                .map(|r| r.schema_class.as_str());
            Some(match reference_class {
                Some("ReferenceRNASequence") => RenderableClass::Rna,
                Some("ReferenceDNASequence") => RenderableClass::Dna,
                _ => RenderableClass::Protein,
            })
        }
        "GenomeEncodedEntity" => Some(RenderableClass::Protein),
        "Complex" | "Polymer" => Some(RenderableClass::Complex),
        "SimpleEntity" | "ChemicalDrug" => Some(RenderableClass::Chemical),
        s if class::is_entity_set(s) => Some(RenderableClass::EntitySet),
        s if class::is_pathway(s) => Some(RenderableClass::ProcessNode),
        _ => None,
    }
}
