//! Shadow synthesis: one translucent region per sub-pathway.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use super::next_free_id;
use super::renderable::RenderableClass;
use super::types::{Bounds, Diagram, Shadow};
use crate::error::ConvertError;
use crate::graph::types::Graph;

/// Append a shadow for every sub-pathway of `graph` that has at least one
/// participant drawn in `diagram`. The shadow box is the union of the boxes
/// of those participant nodes; reaction glyphs are not included.
pub fn create_shadows(diagram: &mut Diagram, graph: &Graph) -> Result<(), ConvertError> {
    let participants: BTreeMap<i64, Vec<i64>> = graph
        .edges
        .iter()
        .map(|event| (event.db_id, event.participants()))
        .collect();

    let mut last_id = diagram.max_id();
    let mut shadows = Vec::new();
    for subpathway in &graph.subpathways {
        let entities: HashSet<i64> = subpathway
            .events
            .iter()
            .filter_map(|event| participants.get(event))
            .flatten()
            .copied()
            .collect();

        let boxes: Vec<Bounds> = diagram
            .nodes
            .iter()
            .filter(|n| !n.is_reaction_glyph() && entities.contains(&n.reactome_id))
            .map(|n| n.bounds())
            .collect();

        let Some(bounds) = Bounds::union_all(&boxes) else {
            debug!(
                db_id = diagram.db_id,
                subpathway = subpathway.db_id,
                "sub-pathway has no drawn participants; no shadow"
            );
            continue;
        };

        let id = next_free_id(last_id)?;
        shadows.push(Shadow {
            id,
            reactome_id: subpathway.db_id,
            display_name: subpathway.display_name.clone(),
            renderable_class: RenderableClass::Shadow,
            prop: bounds.prop(),
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            max_x: bounds.max_x,
            max_y: bounds.max_y,
        });
        last_id = id;
    }

    diagram.shadows = shadows;
    diagram.update_bounds();
    Ok(())
}
