//! Layout phase: Process → Diagram.
//!
//! Folds the parsed Process and attributes read from the database into the
//! geometric document. Every reaction becomes a glyph node with one edge per
//! role participant; polylines are copied verbatim from the Process.

pub mod containment;
pub mod renderable;
pub mod shadows;
pub mod types;

pub use renderable::RenderableClass;
pub use shadows::create_shadows;
pub use types::*;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::ConvertError;
use crate::parse::types::{Coordinate, EdgeDescriptor, NodeDescriptor, Process, ReactionDescriptor, Role};
use crate::source::{self, Database, Record};
use crate::validate;
use containment::Placeable;

/// Side of the square drawn for a reaction glyph.
pub const REACTION_GLYPH_SIZE: f64 = 12.0;

/// Which kind of record the Process was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// A normal pathway render: disease-overlay shapes are suppressed.
    Pathway,
    /// A pathway-diagram record: disease-overlay shapes are kept and tagged.
    PathwayDiagram,
}

pub struct LayoutContext<'a> {
    /// Identifier of the document being produced: the `PathwayDiagram` record id.
    pub db_id: i64,
    /// The pathway the diagram represents; supplies display name and stable id.
    pub pathway: &'a Record,
    pub mode: LayoutMode,
}

/// Build the Diagram for a validated-on-entry Process.
pub fn build(
    process: &Process,
    db: &dyn Database,
    ctx: &LayoutContext,
) -> Result<Diagram, ConvertError> {
    let mut errors = validate::validate_process(process).into_iter();
    if let Some(first) = errors.next() {
        for other in errors {
            debug!(db_id = ctx.db_id, error = %other, "additional process inconsistency");
        }
        return Err(first);
    }

    let keep_disease = ctx.mode == LayoutMode::PathwayDiagram;
    let suppressed: HashSet<i64> = if keep_disease {
        HashSet::new()
    } else {
        let nodes = process.nodes.iter().filter(|n| n.disease).map(|n| n.id);
        let reactions = process.reactions.iter().filter(|r| r.disease).map(|r| r.id);
        nodes.chain(reactions).collect()
    };

    let mut nodes = Vec::new();
    for descriptor in process.nodes.iter().filter(|n| !suppressed.contains(&n.id)) {
        nodes.push(entity_node(descriptor, db, keep_disease)?);
    }
    let reactions: Vec<&ReactionDescriptor> = process
        .reactions
        .iter()
        .filter(|r| !suppressed.contains(&r.id))
        .collect();
    for reaction in &reactions {
        nodes.push(reaction_glyph(reaction, db, keep_disease));
    }

    let edges = build_edges(process, &reactions, &nodes, &suppressed)?;
    attach_anchors(&mut nodes, &edges);

    let compartments = build_compartments(process, db, &nodes)?;

    let mut diagram = Diagram {
        db_id: ctx.db_id,
        display_name: ctx.pathway.display_name().unwrap_or_default().to_string(),
        stable_id: source::stable_identifier(db, ctx.pathway).unwrap_or_default(),
        is_disease: nodes.iter().any(|n| n.disease == Some(true)).then_some(true),
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
        nodes,
        edges,
        compartments,
        shadows: vec![],
    };
    diagram.update_bounds();
    Ok(diagram)
}

fn entity_node(
    descriptor: &NodeDescriptor,
    db: &dyn Database,
    keep_disease: bool,
) -> Result<DiagramNode, ConvertError> {
    let record = db.record(descriptor.reactome_id);
    let renderable_class = renderable::derive(descriptor, record, db)?;
    let bounds = Bounds::from_rect(&descriptor.bounds);
    Ok(DiagramNode {
        id: descriptor.id,
        reactome_id: descriptor.reactome_id,
        display_name: display_name(&descriptor.label, record),
        schema_class: record.map(|r| r.schema_class.clone()),
        renderable_class,
        position: bounds.center(),
        prop: bounds.prop(),
        min_x: bounds.min_x,
        min_y: bounds.min_y,
        max_x: bounds.max_x,
        max_y: bounds.max_y,
        anchors: vec![],
        disease: (keep_disease && descriptor.disease).then_some(true),
        trivial: None,
    })
}

fn reaction_glyph(reaction: &ReactionDescriptor, db: &dyn Database, keep_disease: bool) -> DiagramNode {
    let record = db.record(reaction.reactome_id);
    let bounds = Bounds::around(reaction.position, REACTION_GLYPH_SIZE);
    DiagramNode {
        id: reaction.id,
        reactome_id: reaction.reactome_id,
        display_name: display_name(&reaction.label, record),
        schema_class: record.map(|r| r.schema_class.clone()),
        renderable_class: RenderableClass::ReactionGlyph,
        position: reaction.position,
        prop: bounds.prop(),
        min_x: bounds.min_x,
        min_y: bounds.min_y,
        max_x: bounds.max_x,
        max_y: bounds.max_y,
        anchors: vec![],
        disease: (keep_disease && reaction.disease).then_some(true),
        trivial: None,
    }
}

fn display_name(label: &str, record: Option<&Record>) -> String {
    if !label.is_empty() {
        return label.to_string();
    }
    record
        .and_then(|r| r.display_name())
        .unwrap_or_default()
        .to_string()
}

/// One edge per role participant. Inputs and regulators point at the glyph,
/// outputs leave it.
fn build_edges(
    process: &Process,
    reactions: &[&ReactionDescriptor],
    nodes: &[DiagramNode],
    suppressed: &HashSet<i64>,
) -> Result<Vec<DiagramEdge>, ConvertError> {
    let polylines: HashMap<(i64, i64, Role), &EdgeDescriptor> = process
        .edges
        .iter()
        .map(|e| ((e.reaction, e.node, e.role), e))
        .collect();
    let centers: HashMap<i64, Coordinate> = nodes.iter().map(|n| (n.id, n.position)).collect();

    let mut last_id = process.max_id();
    let mut edges = Vec::new();
    for reaction in reactions {
        for (role, participant) in reaction.participants() {
            if suppressed.contains(&participant.id) {
                continue;
            }
            let center = centers.get(&participant.id).copied().ok_or_else(|| {
                ConvertError::inconsistent(
                    "I002",
                    format!(
                        "Reaction {} has {} participant {} with no node",
                        reaction.id, role, participant.id
                    ),
                    participant.id,
                )
            })?;

            let outgoing = role == Role::Output;
            let (source, target) = if outgoing {
                (reaction.id, participant.id)
            } else {
                (participant.id, reaction.id)
            };
            let points = match polylines.get(&(reaction.id, participant.id, role)) {
                Some(descriptor) if !descriptor.points.is_empty() => descriptor.points.clone(),
                _ if outgoing => vec![reaction.position, center],
                _ => vec![center, reaction.position],
            };

            let id = next_free_id(last_id)?;
            edges.push(DiagramEdge {
                id,
                reactome_id: reaction.reactome_id,
                reaction_id: reaction.id,
                role,
                source,
                target,
                stoichiometry: participant.stoichiometry,
                points,
            });
            last_id = id;
        }
    }
    Ok(edges)
}

/// The id after `last`, or I010 once the id space is exhausted.
pub(crate) fn next_free_id(last: i64) -> Result<i64, ConvertError> {
    last.checked_add(1).ok_or_else(|| {
        ConvertError::inconsistent("I010", format!("No free id left after {}", last), last)
    })
}

fn attach_anchors(nodes: &mut [DiagramNode], edges: &[DiagramEdge]) {
    let index: HashMap<i64, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
    for edge in edges {
        let participant = edge.participant();
        let end = if edge.source == participant {
            edge.points.first()
        } else {
            edge.points.last()
        };
        let (Some(&i), Some(&point)) = (index.get(&participant), end) else {
            continue;
        };
        if !nodes[i].anchors.contains(&point) {
            nodes[i].anchors.push(point);
        }
    }
}

fn build_compartments(
    process: &Process,
    db: &dyn Database,
    nodes: &[DiagramNode],
) -> Result<Vec<DiagramCompartment>, ConvertError> {
    let hints: HashMap<i64, i64> = process
        .nodes
        .iter()
        .filter_map(|n| n.compartment.map(|c| (n.id, c)))
        .collect();
    let placeables: Vec<Placeable> = nodes
        .iter()
        .map(|n| Placeable {
            id: n.id,
            bounds: n.bounds(),
            hint: hints.get(&n.id).copied(),
        })
        .collect();
    let mut members = containment::resolve(&process.compartments, &placeables)?;

    Ok(process
        .compartments
        .iter()
        .map(|c| {
            let bounds = Bounds::from_rect(&c.bounds);
            DiagramCompartment {
                id: c.id,
                reactome_id: c.reactome_id,
                display_name: display_name(&c.label, db.record(c.reactome_id)),
                renderable_class: RenderableClass::Compartment,
                prop: bounds.prop(),
                min_x: bounds.min_x,
                min_y: bounds.min_y,
                max_x: bounds.max_x,
                max_y: bounds.max_y,
                component_ids: members.remove(&c.id).unwrap_or_default(),
            }
        })
        .collect())
}
