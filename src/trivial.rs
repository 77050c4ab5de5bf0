//! Trivial chemical annotation.
//!
//! Small molecules such as water or ATP are flagged so viewers can demote
//! them, but only where they carry no reaction-specific meaning: a node is
//! trivial when its entity's reference identifier is in the dictionary and
//! the node is attached to at most one reaction.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use crate::error::ConvertError;
use crate::graph::types::Graph;
use crate::layout::types::Diagram;

const BUILTIN_DICTIONARY: &str = include_str!("../resources/trivial_chemicals.txt");

#[derive(Debug, Clone, Default)]
pub struct TrivialChemicals {
    identifiers: BTreeSet<String>,
}

impl TrivialChemicals {
    /// The dictionary shipped with the converter.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_DICTIONARY)
    }

    /// One identifier per line; `#` starts a comment, blank lines are ignored.
    pub fn parse(text: &str) -> Self {
        let identifiers = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        TrivialChemicals { identifiers }
    }

    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::fatal(
                "F002",
                format!("Failed to read trivial chemicals {}: {}", path.display(), e),
            )
        })?;
        Ok(Self::parse(&text))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Set `trivial = true` on qualifying Diagram nodes. Geometry is untouched.
    /// Returns the number of nodes marked.
    pub fn annotate(&self, diagram: &mut Diagram, graph: &Graph) -> usize {
        let mut reactions_per_node: HashMap<i64, HashSet<i64>> = HashMap::new();
        for edge in &diagram.edges {
            reactions_per_node
                .entry(edge.participant())
                .or_default()
                .insert(edge.reaction_id);
        }

        let candidates: HashSet<i64> = graph
            .nodes
            .iter()
            .filter(|n| n.identifier.as_deref().is_some_and(|id| self.contains(id)))
            .filter_map(|n| graph.entity_node_map.get(&n.db_id))
            .flatten()
            .copied()
            .collect();

        let mut marked = 0;
        for node in diagram.nodes.iter_mut().filter(|n| candidates.contains(&n.id)) {
            let reactions = reactions_per_node.get(&node.id).map_or(0, HashSet::len);
            if reactions <= 1 {
                node.trivial = Some(true);
                marked += 1;
            }
        }
        marked
    }
}
