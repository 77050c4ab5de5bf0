//! Parse phase: ATXML → Process tree.

pub mod schema;
pub mod types;

pub use schema::ProcessSchema;
pub use types::*;

use roxmltree::{Document, Node};

use crate::error::ConvertError;

/// Parse and schema-validate an ATXML document into a `Process`.
pub fn parse(xml: &str, schema: &ProcessSchema) -> Result<Process, ConvertError> {
    let doc = Document::parse(xml)
        .map_err(|e| ConvertError::malformed("P001", format!("Failed to parse ATXML: {}", e)))?;
    let root = doc.root_element();
    schema.validate(root)?;

    let mut process = Process {
        reactome_id: opt_i64(root, "reactomeId")?,
        ..Process::default()
    };

    for group in root.children().filter(|n| n.is_element()) {
        match group.tag_name().name() {
            "Nodes" => {
                for node in elements(group, "Node") {
                    process.nodes.push(parse_node(node)?);
                }
            }
            "Compartments" => {
                for node in elements(group, "Compartment") {
                    process.compartments.push(parse_compartment(node)?);
                }
            }
            "Reactions" => {
                for node in elements(group, "Reaction") {
                    process.reactions.push(parse_reaction(node)?);
                }
            }
            "Edges" => {
                for node in elements(group, "Edge") {
                    process.edges.push(parse_edge(node)?);
                }
            }
            _ => {}
        }
    }

    Ok(process)
}

fn parse_node(node: Node) -> Result<NodeDescriptor, ConvertError> {
    let node_type = match node.attribute("type") {
        Some(tag) => Some(NodeType::from_tag(tag).ok_or_else(|| {
            ConvertError::malformed("P006", format!("Unknown node type tag '{}'", tag))
        })?),
        None => None,
    };
    Ok(NodeDescriptor {
        id: req_i64(node, "id")?,
        reactome_id: req_i64(node, "reactomeId")?,
        node_type,
        label: label_of(node),
        bounds: rect_of(node)?,
        compartment: opt_i64(node, "compartment")?,
        disease: flag(node, "disease"),
    })
}

fn parse_compartment(node: Node) -> Result<CompartmentDescriptor, ConvertError> {
    Ok(CompartmentDescriptor {
        id: req_i64(node, "id")?,
        reactome_id: req_i64(node, "reactomeId")?,
        label: label_of(node),
        bounds: rect_of(node)?,
        parent: opt_i64(node, "parent")?,
    })
}

fn parse_reaction(node: Node) -> Result<ReactionDescriptor, ConvertError> {
    let mut reaction = ReactionDescriptor {
        id: req_i64(node, "id")?,
        reactome_id: req_i64(node, "reactomeId")?,
        label: label_of(node),
        position: Coordinate {
            x: req_f64(node, "x")?,
            y: req_f64(node, "y")?,
        },
        disease: flag(node, "disease"),
        inputs: vec![],
        outputs: vec![],
        catalysts: vec![],
        activators: vec![],
        inhibitors: vec![],
        modifiers: vec![],
    };

    for role in Role::ALL {
        let (group_name, member_name) = role.group_elements();
        let mut refs = Vec::new();
        for group in elements(node, group_name) {
            for member in elements(group, member_name) {
                refs.push(RoleRef {
                    id: req_i64(member, "id")?,
                    stoichiometry: stoichiometry_of(member)?,
                });
            }
        }
        *reaction.role_mut(role) = refs;
    }

    Ok(reaction)
}

fn parse_edge(node: Node) -> Result<EdgeDescriptor, ConvertError> {
    let role_tag = node.attribute("role").unwrap_or_default();
    let role = Role::from_tag(role_tag)
        .ok_or_else(|| ConvertError::malformed("P006", format!("Unknown edge role '{}'", role_tag)))?;
    let mut points = Vec::new();
    for point in elements(node, "Point") {
        points.push(Coordinate {
            x: req_f64(point, "x")?,
            y: req_f64(point, "y")?,
        });
    }
    Ok(EdgeDescriptor {
        id: req_i64(node, "id")?,
        reaction: req_i64(node, "reaction")?,
        node: req_i64(node, "node")?,
        role,
        points,
    })
}

// ---------------------------------------------------------------------------
// Attribute helpers
// ---------------------------------------------------------------------------

fn elements<'a, 'input>(
    parent: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent.children().filter(move |n| n.has_tag_name(name))
}

fn label_of(node: Node) -> String {
    node.children()
        .find(|n| n.has_tag_name("Label"))
        .and_then(|n| n.text())
        .or_else(|| node.attribute("label"))
        .map(|s| s.trim().replace('\r', ""))
        .unwrap_or_default()
}

fn flag(node: Node, name: &str) -> bool {
    matches!(node.attribute(name), Some("true") | Some("1"))
}

fn req_f64(node: Node, name: &str) -> Result<f64, ConvertError> {
    opt_f64(node, name)?.ok_or_else(|| {
        ConvertError::malformed(
            "P004",
            format!("Element '{}' is missing attribute '{}'", node.tag_name().name(), name),
        )
    })
}

fn opt_f64(node: Node, name: &str) -> Result<Option<f64>, ConvertError> {
    match node.attribute(name) {
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(ConvertError::malformed(
                "P005",
                format!("Attribute '{}' is not a finite number: '{}'", name, raw),
            )),
        },
        None => Ok(None),
    }
}

fn req_i64(node: Node, name: &str) -> Result<i64, ConvertError> {
    opt_i64(node, name)?.ok_or_else(|| {
        ConvertError::malformed(
            "P004",
            format!("Element '{}' is missing attribute '{}'", node.tag_name().name(), name),
        )
    })
}

fn opt_i64(node: Node, name: &str) -> Result<Option<i64>, ConvertError> {
    match node.attribute(name) {
        Some(raw) => raw.trim().parse::<i64>().map(Some).map_err(|_| {
            ConvertError::malformed(
                "P005",
                format!("Attribute '{}' is not an integer id: '{}'", name, raw),
            )
        }),
        None => Ok(None),
    }
}

fn stoichiometry_of(member: Node) -> Result<Option<u32>, ConvertError> {
    opt_i64(member, "stoichiometry")?
        .map(|s| {
            u32::try_from(s).map_err(|_| {
                ConvertError::malformed("P005", format!("Stoichiometry out of range: {}", s))
            })
        })
        .transpose()
}

fn rect_of(node: Node) -> Result<Rect, ConvertError> {
    let rect = Rect {
        x: req_f64(node, "x")?,
        y: req_f64(node, "y")?,
        width: req_f64(node, "width")?,
        height: req_f64(node, "height")?,
    };
    if rect.width < 0.0 || rect.height < 0.0 {
        return Err(ConvertError::malformed(
            "P007",
            format!(
                "Element '{}' has a negative size: {} x {}",
                node.tag_name().name(),
                rect.width,
                rect.height
            ),
        ));
    }
    Ok(rect)
}
