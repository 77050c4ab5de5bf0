#![allow(dead_code)]

use std::collections::HashSet;

use diagram_converter::convert::{Conversion, Converter};
use diagram_converter::error::ConvertError;
use diagram_converter::parse::ProcessSchema;
use diagram_converter::source::class::{self, attr};
use diagram_converter::source::{AttrValue, Database, MemoryDatabase, Record};
use diagram_converter::trivial::TrivialChemicals;

pub const SINGLE_REACTION: &str = include_str!("../fixtures/single_reaction.xml");
pub const SHARED_WATER: &str = include_str!("../fixtures/shared_water.xml");
pub const SUBPATHWAY: &str = include_str!("../fixtures/subpathway.xml");
pub const COMPARTMENTS: &str = include_str!("../fixtures/compartments.xml");
pub const DANGLING_EDGE: &str = include_str!("../fixtures/dangling_edge.xml");

// =============================================================================
// Record builders
// =============================================================================

pub fn refs(ids: &[i64]) -> AttrValue {
    AttrValue::List(ids.iter().map(|&target| AttrValue::Ref { target }).collect())
}

fn named(id: i64, schema_class: &str, name: &str) -> Record {
    Record::new(id, schema_class)
        .with(attr::DISPLAY_NAME, AttrValue::Text(name.into()))
        .with(attr::STABLE_IDENTIFIER, AttrValue::Text(format!("R-HSA-{}", id)))
}

pub fn pathway(id: i64, name: &str, events: &[i64]) -> Record {
    named(id, class::PATHWAY, name).with(attr::HAS_EVENT, refs(events))
}

pub fn reaction(id: i64, name: &str) -> Record {
    named(id, "Reaction", name)
}

pub fn entity(id: i64, schema_class: &str, name: &str) -> Record {
    named(id, schema_class, name)
}

/// A small molecule pointing at the reference record `reference`.
pub fn chemical(id: i64, name: &str, reference: i64) -> Record {
    named(id, "SimpleEntity", name)
        .with(attr::REFERENCE_ENTITY, AttrValue::Ref { target: reference })
}

pub fn reference_molecule(id: i64, identifier: &str, database: &str) -> Record {
    Record::new(id, "ReferenceMolecule")
        .with(attr::IDENTIFIER, AttrValue::Text(identifier.into()))
        .with(attr::DATABASE_NAME, AttrValue::Text(database.into()))
}

pub fn pathway_diagram(id: i64, represented: i64, atxml: &str) -> Record {
    Record::new(id, class::PATHWAY_DIAGRAM)
        .with(attr::REPRESENTED_PATHWAY, AttrValue::Ref { target: represented })
        .with(attr::STORED_ATXML, AttrValue::Text(atxml.into()))
}

// =============================================================================
// Databases for the fixtures
// =============================================================================

/// Pathway 100 drawn by diagram 1000: A (300) → B (301) through reaction 200.
pub fn single_reaction_db() -> MemoryDatabase {
    MemoryDatabase::from_records([
        pathway(100, "Single step", &[200]),
        reaction(200, "A to B"),
        entity(300, "SimpleEntity", "A"),
        entity(301, "SimpleEntity", "B"),
        pathway_diagram(1000, 100, SINGLE_REACTION),
    ])
}

/// Pathway 110 drawn by diagram 1100: water (310) feeds both reactions, C (311) only the first.
pub fn shared_water_db() -> MemoryDatabase {
    MemoryDatabase::from_records([
        pathway(110, "Shared water", &[200, 201]),
        reaction(200, "First"),
        reaction(201, "Second"),
        entity(300, "SimpleEntity", "X"),
        entity(301, "SimpleEntity", "Y"),
        chemical(310, "H2O", 410),
        chemical(311, "C", 411),
        reference_molecule(410, "15377", "CHEBI"),
        reference_molecule(411, "CHEBI:99999", "CHEBI"),
        pathway_diagram(1100, 110, SHARED_WATER),
    ])
}

/// The dictionary used with `shared_water_db`: water and C.
pub fn water_and_c() -> TrivialChemicals {
    TrivialChemicals::parse("CHEBI:15377\nCHEBI:99999\n")
}

/// Pathway 120 with sub-pathway 500 (containing reaction 200) and reaction 202.
pub fn subpathway_db() -> MemoryDatabase {
    MemoryDatabase::from_records([
        pathway(120, "Parent", &[500, 202]),
        pathway(500, "Child", &[200]),
        reaction(200, "N1 to N2"),
        reaction(202, "N2 to N3"),
        entity(300, "SimpleEntity", "N1"),
        entity(301, "EntityWithAccessionedSequence", "N2"),
        entity(302, "Complex", "N3"),
        pathway_diagram(1200, 120, SUBPATHWAY),
    ])
}

pub fn compartments_db() -> MemoryDatabase {
    MemoryDatabase::from_records([
        pathway(130, "Nuclear import", &[200]),
        reaction(200, "A to B"),
        entity(300, "SimpleEntity", "A"),
        entity(301, "SimpleEntity", "B"),
        pathway_diagram(1300, 130, COMPARTMENTS),
    ])
}

// =============================================================================
// Pipeline helpers
// =============================================================================

pub fn convert(
    db: &MemoryDatabase,
    diagram_record: i64,
    trivial: &TrivialChemicals,
) -> Result<Conversion, ConvertError> {
    let schema = ProcessSchema::builtin().unwrap();
    let record = db.record(diagram_record).unwrap();
    Converter::new(db, &schema, trivial).convert(record)
}

/// Check the cross-document invariants every successful conversion must hold.
pub fn assert_invariants(conversion: &Conversion, trivial: &TrivialChemicals) {
    let diagram = &conversion.diagram;
    let graph = &conversion.graph;
    let node_ids: HashSet<i64> = diagram.nodes.iter().map(|n| n.id).collect();
    assert_eq!(node_ids.len(), diagram.nodes.len(), "node ids are unique");

    for edge in &diagram.edges {
        assert!(node_ids.contains(&edge.source), "edge {} source resolves", edge.id);
        assert!(node_ids.contains(&edge.target), "edge {} target resolves", edge.id);
    }

    let entity_ids: HashSet<i64> = graph.nodes.iter().map(|n| n.db_id).collect();
    for event in &graph.edges {
        for participant in event.participants() {
            assert!(entity_ids.contains(&participant), "event {} participant {}", event.db_id, participant);
        }
        for id in &event.diagram_ids {
            assert!(node_ids.contains(id));
        }
    }
    for node in &graph.nodes {
        assert!(!node.diagram_ids.is_empty());
        for id in &node.diagram_ids {
            assert!(node_ids.contains(id), "diagramId {} resolves", id);
        }
    }
    for (entity, ids) in &graph.entity_node_map {
        assert!(!ids.is_empty(), "entity {} has drawings", entity);
        assert!(ids.iter().all(|id| node_ids.contains(id)));
    }

    for shadow in &diagram.shadows {
        let subpathway = graph
            .subpathways
            .iter()
            .find(|s| s.db_id == shadow.reactome_id)
            .unwrap();
        let participants: HashSet<i64> = subpathway
            .events
            .iter()
            .filter_map(|e| graph.event(*e))
            .flat_map(|e| e.participants())
            .collect();
        assert!(diagram
            .nodes
            .iter()
            .any(|n| participants.contains(&n.reactome_id)));
    }

    for node in diagram.nodes.iter().filter(|n| n.trivial == Some(true)) {
        let identifier = graph
            .entity(node.reactome_id)
            .and_then(|e| e.identifier.as_deref())
            .unwrap();
        assert!(trivial.contains(identifier));
        let reactions: HashSet<i64> = diagram
            .edges
            .iter()
            .filter(|e| e.participant() == node.id)
            .map(|e| e.reaction_id)
            .collect();
        assert!(reactions.len() <= 1);
    }
}
