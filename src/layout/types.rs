//! Diagram (layout) document types.
//!
//! Field names and field order are the contract with downstream viewers:
//! serde emits struct fields in declaration order, and optional fields that
//! are unset are omitted rather than written as `null`.

use serde::{Deserialize, Serialize};

use super::renderable::RenderableClass;
use crate::parse::types::{Coordinate, Rect, Role};

// =============================================================================
// GEOMETRY
// =============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_rect(rect: &Rect) -> Self {
        Bounds {
            min_x: rect.x,
            min_y: rect.y,
            max_x: rect.x + rect.width,
            max_y: rect.y + rect.height,
        }
    }

    /// Square of side `size` centred on `center`.
    pub fn around(center: Coordinate, size: f64) -> Self {
        let half = size / 2.0;
        Bounds {
            min_x: center.x - half,
            min_y: center.y - half,
            max_x: center.x + half,
            max_y: center.y + half,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn contains(&self, other: &Bounds) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Union of all boxes, or `None` for an empty iterator.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a Bounds>) -> Option<Bounds> {
        boxes
            .into_iter()
            .fold(None, |acc: Option<Bounds>, b| match acc {
                Some(a) => Some(a.union(b)),
                None => Some(*b),
            })
    }

    pub fn prop(&self) -> Prop {
        Prop {
            x: self.min_x,
            y: self.min_y,
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }
}

/// Position and size of a shape, as consumed by the viewers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// =============================================================================
// DIAGRAM
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub db_id: i64,
    pub display_name: String,
    pub stable_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_disease: Option<bool>,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    pub compartments: Vec<DiagramCompartment>,
    pub shadows: Vec<Shadow>,
}

impl Diagram {
    /// Largest id used by any element of the document.
    pub fn max_id(&self) -> i64 {
        let nodes = self.nodes.iter().map(|n| n.id);
        let edges = self.edges.iter().map(|e| e.id);
        let compartments = self.compartments.iter().map(|c| c.id);
        let shadows = self.shadows.iter().map(|s| s.id);
        nodes
            .chain(edges)
            .chain(compartments)
            .chain(shadows)
            .max()
            .unwrap_or(0)
    }

    pub fn node(&self, id: i64) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Recompute the whole-document bounds from nodes, compartments and shadows.
    pub fn update_bounds(&mut self) {
        let boxes: Vec<Bounds> = self
            .nodes
            .iter()
            .map(|n| n.bounds())
            .chain(self.compartments.iter().map(|c| c.bounds()))
            .chain(self.shadows.iter().map(|s| s.bounds()))
            .collect();
        let bounds = Bounds::union_all(&boxes).unwrap_or(Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        });
        self.min_x = bounds.min_x;
        self.min_y = bounds.min_y;
        self.max_x = bounds.max_x;
        self.max_y = bounds.max_y;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    pub id: i64,
    pub reactome_id: i64,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_class: Option<String>,
    pub renderable_class: RenderableClass,
    pub position: Coordinate,
    pub prop: Prop,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    /// Points where edges attach to this node.
    pub anchors: Vec<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trivial: Option<bool>,
}

impl DiagramNode {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        }
    }

    pub fn is_reaction_glyph(&self) -> bool {
        self.renderable_class == RenderableClass::ReactionGlyph
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEdge {
    pub id: i64,
    /// Biological id of the reaction this edge belongs to.
    pub reactome_id: i64,
    /// Diagram id of the reaction glyph node.
    pub reaction_id: i64,
    pub role: Role,
    pub source: i64,
    pub target: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stoichiometry: Option<u32>,
    pub points: Vec<Coordinate>,
}

impl DiagramEdge {
    /// The participant end of the edge (the end that is not the glyph).
    pub fn participant(&self) -> i64 {
        if self.source == self.reaction_id {
            self.target
        } else {
            self.source
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramCompartment {
    pub id: i64,
    pub reactome_id: i64,
    pub display_name: String,
    pub renderable_class: RenderableClass,
    pub prop: Prop,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    /// Direct members: nodes, glyphs and nested compartments.
    pub component_ids: Vec<i64>,
}

impl DiagramCompartment {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub id: i64,
    /// Biological id of the sub-pathway.
    pub reactome_id: i64,
    pub display_name: String,
    pub renderable_class: RenderableClass,
    pub prop: Prop,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Shadow {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        }
    }
}
