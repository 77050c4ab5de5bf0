//! In-memory Process tree produced from ATXML.
//!
//! These types stay close to the XML vocabulary: one descriptor per `Node`,
//! `Compartment`, `Reaction` and `Edge` element. Role groups are always
//! materialised, so an absent `<Catalysts>` is an empty vector.

use serde::{Deserialize, Serialize};

// =============================================================================
// TOP-LEVEL PROCESS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub reactome_id: Option<i64>,
    pub nodes: Vec<NodeDescriptor>,
    pub compartments: Vec<CompartmentDescriptor>,
    pub reactions: Vec<ReactionDescriptor>,
    pub edges: Vec<EdgeDescriptor>,
}

impl Process {
    /// True when nothing drawable was recorded.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.reactions.is_empty() && self.compartments.is_empty()
    }

    /// Largest id used by any descriptor.
    pub fn max_id(&self) -> i64 {
        let nodes = self.nodes.iter().map(|n| n.id);
        let compartments = self.compartments.iter().map(|c| c.id);
        let reactions = self.reactions.iter().map(|r| r.id);
        let edges = self.edges.iter().map(|e| e.id);
        nodes
            .chain(compartments)
            .chain(reactions)
            .chain(edges)
            .max()
            .unwrap_or(0)
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

/// Rectangle as written in ATXML: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> Coordinate {
        Coordinate {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// Shape tag from the `type` attribute of a `Node`.
/// `Entity` (or no tag at all) leaves the variant to be resolved from the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Protein,
    Complex,
    Chemical,
    Rna,
    Dna,
    EntitySet,
    Gene,
    ProcessNode,
    Entity,
}

impl NodeType {
    pub fn from_tag(tag: &str) -> Option<NodeType> {
        match tag {
            "Protein" => Some(NodeType::Protein),
            "Complex" => Some(NodeType::Complex),
            "Chemical" => Some(NodeType::Chemical),
            "RNA" | "Rna" => Some(NodeType::Rna),
            "DNA" | "Dna" => Some(NodeType::Dna),
            "EntitySet" => Some(NodeType::EntitySet),
            "Gene" => Some(NodeType::Gene),
            "ProcessNode" => Some(NodeType::ProcessNode),
            "Entity" => Some(NodeType::Entity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub id: i64,
    pub reactome_id: i64,
    pub node_type: Option<NodeType>,
    pub label: String,
    pub bounds: Rect,
    /// Explicit containment hint.
    pub compartment: Option<i64>,
    pub disease: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompartmentDescriptor {
    pub id: i64,
    pub reactome_id: i64,
    pub label: String,
    pub bounds: Rect,
    /// Explicit containment hint.
    pub parent: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Input,
    Output,
    Catalyst,
    Activator,
    Inhibitor,
    Modifier,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Input,
        Role::Output,
        Role::Catalyst,
        Role::Activator,
        Role::Inhibitor,
        Role::Modifier,
    ];

    pub fn from_tag(tag: &str) -> Option<Role> {
        match tag {
            "input" => Some(Role::Input),
            "output" => Some(Role::Output),
            "catalyst" => Some(Role::Catalyst),
            "activator" => Some(Role::Activator),
            "inhibitor" => Some(Role::Inhibitor),
            "modifier" => Some(Role::Modifier),
            _ => None,
        }
    }

    /// Element names of the role group and of its members, e.g. `Inputs`/`Input`.
    pub fn group_elements(self) -> (&'static str, &'static str) {
        match self {
            Role::Input => ("Inputs", "Input"),
            Role::Output => ("Outputs", "Output"),
            Role::Catalyst => ("Catalysts", "Catalyst"),
            Role::Activator => ("Activators", "Activator"),
            Role::Inhibitor => ("Inhibitors", "Inhibitor"),
            Role::Modifier => ("Modifiers", "Modifier"),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Input => "input",
            Role::Output => "output",
            Role::Catalyst => "catalyst",
            Role::Activator => "activator",
            Role::Inhibitor => "inhibitor",
            Role::Modifier => "modifier",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRef {
    pub id: i64,
    pub stoichiometry: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionDescriptor {
    pub id: i64,
    pub reactome_id: i64,
    pub label: String,
    pub position: Coordinate,
    pub disease: bool,
    pub inputs: Vec<RoleRef>,
    pub outputs: Vec<RoleRef>,
    pub catalysts: Vec<RoleRef>,
    pub activators: Vec<RoleRef>,
    pub inhibitors: Vec<RoleRef>,
    pub modifiers: Vec<RoleRef>,
}

impl ReactionDescriptor {
    pub fn role(&self, role: Role) -> &[RoleRef] {
        match role {
            Role::Input => &self.inputs,
            Role::Output => &self.outputs,
            Role::Catalyst => &self.catalysts,
            Role::Activator => &self.activators,
            Role::Inhibitor => &self.inhibitors,
            Role::Modifier => &self.modifiers,
        }
    }

    pub fn role_mut(&mut self, role: Role) -> &mut Vec<RoleRef> {
        match role {
            Role::Input => &mut self.inputs,
            Role::Output => &mut self.outputs,
            Role::Catalyst => &mut self.catalysts,
            Role::Activator => &mut self.activators,
            Role::Inhibitor => &mut self.inhibitors,
            Role::Modifier => &mut self.modifiers,
        }
    }

    /// Every participant with its role, inputs first and modifiers last.
    pub fn participants(&self) -> impl Iterator<Item = (Role, &RoleRef)> + '_ {
        Role::ALL
            .into_iter()
            .flat_map(move |role| self.role(role).iter().map(move |r| (role, r)))
    }
}

/// Polyline drawn between a reaction and one of its participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    pub id: i64,
    pub reaction: i64,
    pub node: i64,
    pub role: Role,
    pub points: Vec<Coordinate>,
}
