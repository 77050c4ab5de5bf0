//! Compartment containment.
//!
//! Compartments are ranked by area, largest first. Every compartment and
//! every placed shape attaches to the smallest compartment whose box contains
//! it; an explicit hint from the Process overrides the geometric choice.
//! Geometric parents are always larger than their children, so only hints can
//! close a cycle, and a cycle is rejected.

use std::collections::{BTreeMap, HashMap};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::Bounds;
use crate::error::ConvertError;
use crate::parse::types::CompartmentDescriptor;

/// A shape that can be placed inside a compartment.
#[derive(Debug, Clone, Copy)]
pub struct Placeable {
    pub id: i64,
    pub bounds: Bounds,
    pub hint: Option<i64>,
}

/// Resolve direct members per compartment id. Member lists are sorted.
pub fn resolve(
    compartments: &[CompartmentDescriptor],
    items: &[Placeable],
) -> Result<BTreeMap<i64, Vec<i64>>, ConvertError> {
    let mut ranked: Vec<(i64, Bounds, Option<i64>)> = compartments
        .iter()
        .map(|c| (c.id, Bounds::from_rect(&c.bounds), c.parent))
        .collect();
    ranked.sort_by(|a, b| b.1.area().total_cmp(&a.1.area()).then(a.0.cmp(&b.0)));

    let mut members: BTreeMap<i64, Vec<i64>> =
        ranked.iter().map(|(id, _, _)| (*id, Vec::new())).collect();

    let mut graph: DiGraph<i64, ()> = DiGraph::new();
    let indices: HashMap<i64, NodeIndex> = ranked
        .iter()
        .map(|(id, _, _)| (*id, graph.add_node(*id)))
        .collect();

    for (pos, (id, bounds, hint)) in ranked.iter().enumerate() {
        let parent = hint.or_else(|| smallest_containing(&ranked[..pos], bounds));
        if let Some(parent) = parent {
            if let (Some(&p), Some(&c)) = (indices.get(&parent), indices.get(id)) {
                graph.add_edge(p, c, ());
            }
            if let Some(list) = members.get_mut(&parent) {
                list.push(*id);
            }
        }
    }

    if let Err(cycle) = toposort(&graph, None) {
        let id = graph[cycle.node_id()];
        return Err(ConvertError::inconsistent(
            "I006",
            format!("Compartment containment hints form a cycle through compartment {}", id),
            id,
        ));
    }

    for item in items {
        let parent = item
            .hint
            .or_else(|| smallest_containing(&ranked, &item.bounds));
        if let Some(list) = parent.and_then(|p| members.get_mut(&p)) {
            list.push(item.id);
        }
    }

    for list in members.values_mut() {
        list.sort_unstable();
        list.dedup();
    }
    Ok(members)
}

/// `candidates` are ranked largest first, so the last match is the smallest.
fn smallest_containing(candidates: &[(i64, Bounds, Option<i64>)], bounds: &Bounds) -> Option<i64> {
    candidates
        .iter()
        .rev()
        .find(|(_, b, _)| b.contains(bounds))
        .map(|(id, _, _)| *id)
}
