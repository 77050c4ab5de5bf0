//! Graph (biological) document types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub db_id: i64,
    pub st_id: String,
    pub display_name: String,
    pub nodes: Vec<EntityNode>,
    pub edges: Vec<EventNode>,
    pub subpathways: Vec<Subpathway>,
    /// Entity id → Diagram node ids. Serialized through each node's `diagramIds`.
    #[serde(skip)]
    pub entity_node_map: BTreeMap<i64, Vec<i64>>,
}

impl Graph {
    pub fn entity(&self, db_id: i64) -> Option<&EntityNode> {
        self.nodes.iter().find(|n| n.db_id == db_id)
    }

    pub fn event(&self, db_id: i64) -> Option<&EventNode> {
        self.edges.iter().find(|e| e.db_id == db_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityNode {
    pub db_id: i64,
    pub st_id: String,
    pub display_name: String,
    pub schema_class: String,
    /// Reference identifier, e.g. `CHEBI:15377`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartment: Option<i64>,
    pub diagram_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNode {
    pub db_id: i64,
    pub st_id: String,
    pub display_name: String,
    pub schema_class: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalysts: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activators: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inhibitors: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<i64>,
    pub diagram_ids: Vec<i64>,
}

impl EventNode {
    /// Every participating entity, in role order, without duplicates.
    pub fn participants(&self) -> Vec<i64> {
        let mut all: Vec<i64> = Vec::new();
        let roles = [
            &self.inputs,
            &self.outputs,
            &self.catalysts,
            &self.activators,
            &self.inhibitors,
            &self.modifiers,
        ];
        for id in roles.into_iter().flatten() {
            if !all.contains(id) {
                all.push(*id);
            }
        }
        all
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subpathway {
    pub db_id: i64,
    pub st_id: String,
    pub display_name: String,
    /// Reaction-like events reachable from this sub-pathway, in stored order.
    pub events: Vec<i64>,
}
