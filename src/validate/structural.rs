//! Cross-reference rules for a parsed Process (I001–I005, I009).

use std::collections::{HashMap, HashSet};

use crate::error::ConvertError;
use crate::parse::types::{Process, Role};

/// Run all structural rules. Returns all errors found.
pub fn validate_structural(process: &Process) -> Vec<ConvertError> {
    let mut errors = Vec::new();

    i001_unique_ids(process, &mut errors);
    i002_participants_reference_nodes(process, &mut errors);
    i003_edges_reference_existing_nodes(process, &mut errors);
    i004_edges_reference_existing_reactions(process, &mut errors);
    i005_containment_hints_resolve(process, &mut errors);
    i009_edges_match_participants(process, &mut errors);

    errors
}

fn i001_unique_ids(process: &Process, errors: &mut Vec<ConvertError>) {
    let mut seen = HashSet::new();
    let ids = process
        .nodes
        .iter()
        .map(|n| n.id)
        .chain(process.compartments.iter().map(|c| c.id))
        .chain(process.reactions.iter().map(|r| r.id))
        .chain(process.edges.iter().map(|e| e.id));
    for id in ids {
        if !seen.insert(id) {
            errors.push(ConvertError::inconsistent(
                "I001",
                format!("Id {} is declared more than once", id),
                id,
            ));
        }
    }
}

fn i002_participants_reference_nodes(process: &Process, errors: &mut Vec<ConvertError>) {
    let node_ids: HashSet<i64> = process.nodes.iter().map(|n| n.id).collect();
    for reaction in &process.reactions {
        for (role, participant) in reaction.participants() {
            if !node_ids.contains(&participant.id) {
                errors.push(ConvertError::inconsistent(
                    "I002",
                    format!(
                        "Reaction {} has {} participant {} with no node descriptor",
                        reaction.id, role, participant.id
                    ),
                    participant.id,
                ));
            }
        }
    }
}

fn i003_edges_reference_existing_nodes(process: &Process, errors: &mut Vec<ConvertError>) {
    let node_ids: HashSet<i64> = process.nodes.iter().map(|n| n.id).collect();
    for edge in &process.edges {
        if !node_ids.contains(&edge.node) {
            errors.push(ConvertError::inconsistent(
                "I003",
                format!("Edge {} references unknown node {}", edge.id, edge.node),
                edge.node,
            ));
        }
    }
}

fn i004_edges_reference_existing_reactions(process: &Process, errors: &mut Vec<ConvertError>) {
    let reaction_ids: HashSet<i64> = process.reactions.iter().map(|r| r.id).collect();
    for edge in &process.edges {
        if !reaction_ids.contains(&edge.reaction) {
            errors.push(ConvertError::inconsistent(
                "I004",
                format!("Edge {} references unknown reaction {}", edge.id, edge.reaction),
                edge.reaction,
            ));
        }
    }
}

fn i005_containment_hints_resolve(process: &Process, errors: &mut Vec<ConvertError>) {
    let compartment_ids: HashSet<i64> = process.compartments.iter().map(|c| c.id).collect();
    for node in &process.nodes {
        if let Some(hint) = node.compartment {
            if !compartment_ids.contains(&hint) {
                errors.push(ConvertError::inconsistent(
                    "I005",
                    format!("Node {} is placed in unknown compartment {}", node.id, hint),
                    hint,
                ));
            }
        }
    }
    for compartment in &process.compartments {
        if let Some(parent) = compartment.parent {
            if parent == compartment.id || !compartment_ids.contains(&parent) {
                errors.push(ConvertError::inconsistent(
                    "I005",
                    format!(
                        "Compartment {} has invalid parent compartment {}",
                        compartment.id, parent
                    ),
                    parent,
                ));
            }
        }
    }
}

/// An edge polyline must belong to an actual (reaction, node, role) participation.
fn i009_edges_match_participants(process: &Process, errors: &mut Vec<ConvertError>) {
    let mut participations: HashMap<i64, HashSet<(i64, Role)>> = HashMap::new();
    for reaction in &process.reactions {
        let entry = participations.entry(reaction.id).or_default();
        for (role, participant) in reaction.participants() {
            entry.insert((participant.id, role));
        }
    }
    for edge in &process.edges {
        let Some(entry) = participations.get(&edge.reaction) else {
            continue; // reported by I004
        };
        if !entry.contains(&(edge.node, edge.role)) {
            errors.push(ConvertError::inconsistent(
                "I009",
                format!(
                    "Edge {} links node {} as {} of reaction {}, which the reaction does not declare",
                    edge.id, edge.node, edge.role, edge.reaction
                ),
                edge.node,
            ));
        }
    }
}
