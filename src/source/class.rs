//! Schema class and attribute names understood by the converter.

pub const PATHWAY_DIAGRAM: &str = "PathwayDiagram";
pub const PATHWAY: &str = "Pathway";
pub const TOP_LEVEL_PATHWAY: &str = "TopLevelPathway";

pub mod attr {
    pub const REPRESENTED_PATHWAY: &str = "representedPathway";
    pub const STORED_ATXML: &str = "storedATXML";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const STABLE_IDENTIFIER: &str = "stableIdentifier";
    pub const HAS_EVENT: &str = "hasEvent";
    pub const COMPARTMENT: &str = "compartment";
    pub const REFERENCE_ENTITY: &str = "referenceEntity";
    pub const IDENTIFIER: &str = "identifier";
    pub const DATABASE_NAME: &str = "databaseName";
}

pub fn is_pathway(schema_class: &str) -> bool {
    matches!(schema_class, PATHWAY | TOP_LEVEL_PATHWAY)
}

pub fn is_entity_set(schema_class: &str) -> bool {
    matches!(schema_class, "EntitySet" | "DefinedSet" | "CandidateSet" | "OpenSet")
}
