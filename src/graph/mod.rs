//! Graph phase: Diagram → Graph.
//!
//! Every geometric node resolves to one biological entity (de-duplicated by
//! `reactomeId`), every reaction glyph to one event, and the represented
//! pathway's event hierarchy yields the sub-pathways.

pub mod hierarchy;
pub mod types;

pub use hierarchy::EventHierarchy;
pub use types::*;

use std::collections::BTreeMap;

use crate::error::ConvertError;
use crate::layout::types::Diagram;
use crate::parse::types::Role;
use crate::source::class::attr;
use crate::source::{self, Database, Record};

/// Build the Graph for a Diagram. `pathway` is the pathway the diagram represents.
pub fn build(diagram: &Diagram, db: &dyn Database, pathway: &Record) -> Result<Graph, ConvertError> {
    let entity_node_map = entity_node_map(diagram);

    let mut nodes = Vec::with_capacity(entity_node_map.len());
    for (&entity_id, diagram_ids) in &entity_node_map {
        let record = require(db, entity_id, diagram_ids)?;
        nodes.push(EntityNode {
            db_id: entity_id,
            st_id: source::stable_identifier(db, record).unwrap_or_default(),
            display_name: record.display_name().unwrap_or_default().to_string(),
            schema_class: record.schema_class.clone(),
            identifier: source::reference_identifier(db, record),
            compartment: record.reference(attr::COMPARTMENT),
            diagram_ids: diagram_ids.clone(),
        });
    }

    let edges = build_events(diagram, db)?;
    let subpathways = build_subpathways(db, pathway);

    Ok(Graph {
        db_id: diagram.db_id,
        st_id: diagram.stable_id.clone(),
        display_name: diagram.display_name.clone(),
        nodes,
        edges,
        subpathways,
        entity_node_map,
    })
}

/// Entity id → ids of every non-glyph Diagram node drawing it.
pub fn entity_node_map(diagram: &Diagram) -> BTreeMap<i64, Vec<i64>> {
    let mut map: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for node in diagram.nodes.iter().filter(|n| !n.is_reaction_glyph()) {
        map.entry(node.reactome_id).or_default().push(node.id);
    }
    map
}

fn require<'a>(db: &'a dyn Database, db_id: i64, diagram_ids: &[i64]) -> Result<&'a Record, ConvertError> {
    db.record(db_id).ok_or_else(|| {
        ConvertError::inconsistent(
            "I007",
            format!(
                "Diagram node(s) {:?} reference database record {} which does not exist",
                diagram_ids, db_id
            ),
            db_id,
        )
    })
}

/// One event per reaction; glyphs drawing the same reaction are merged.
fn build_events(diagram: &Diagram, db: &dyn Database) -> Result<Vec<EventNode>, ConvertError> {
    let entity_of: BTreeMap<i64, i64> = diagram
        .nodes
        .iter()
        .filter(|n| !n.is_reaction_glyph())
        .map(|n| (n.id, n.reactome_id))
        .collect();

    let mut events: Vec<EventNode> = Vec::new();
    for glyph in diagram.nodes.iter().filter(|n| n.is_reaction_glyph()) {
        let position = match events.iter().position(|e| e.db_id == glyph.reactome_id) {
            Some(p) => p,
            None => {
                let record = require(db, glyph.reactome_id, &[glyph.id])?;
                events.push(EventNode {
                    db_id: glyph.reactome_id,
                    st_id: source::stable_identifier(db, record).unwrap_or_default(),
                    display_name: record.display_name().unwrap_or_default().to_string(),
                    schema_class: record.schema_class.clone(),
                    ..EventNode::default()
                });
                events.len() - 1
            }
        };
        let event = &mut events[position];
        event.diagram_ids.push(glyph.id);

        for edge in diagram.edges.iter().filter(|e| e.reaction_id == glyph.id) {
            let participant = edge.participant();
            let Some(&entity) = entity_of.get(&participant) else {
                return Err(ConvertError::inconsistent(
                    "I003",
                    format!("Edge {} of reaction {} ends at unknown node {}", edge.id, glyph.id, participant),
                    participant,
                ));
            };
            let list = match edge.role {
                Role::Input => &mut event.inputs,
                Role::Output => &mut event.outputs,
                Role::Catalyst => &mut event.catalysts,
                Role::Activator => &mut event.activators,
                Role::Inhibitor => &mut event.inhibitors,
                Role::Modifier => &mut event.modifiers,
            };
            if !list.contains(&entity) {
                list.push(entity);
            }
        }
    }
    Ok(events)
}

fn build_subpathways(db: &dyn Database, pathway: &Record) -> Vec<Subpathway> {
    let hierarchy = EventHierarchy::build(db, pathway);
    hierarchy
        .subpathways()
        .into_iter()
        .filter_map(|id| db.record(id))
        .map(|record| Subpathway {
            db_id: record.id(),
            st_id: source::stable_identifier(db, record).unwrap_or_default(),
            display_name: record.display_name().unwrap_or_default().to_string(),
            events: hierarchy.closure(record.id()),
        })
        .collect()
}
