//! Structural schema for ATXML documents.
//!
//! The schema is a table of element rules: which children an element may
//! hold, which attributes it must carry and which attributes must be numeric.
//! It is loaded once and shared immutably by every parse.

use std::collections::BTreeMap;
use std::path::Path;

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

const BUILTIN_SCHEMA: &str = include_str!("../../resources/process_schema.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementRule {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub numeric: Vec<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSchema {
    pub root: String,
    pub elements: BTreeMap<String, ElementRule>,
}

impl ProcessSchema {
    /// The schema shipped with the converter.
    pub fn builtin() -> Result<Self, ConvertError> {
        Self::from_json_str(BUILTIN_SCHEMA)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConvertError> {
        let schema: ProcessSchema = serde_json::from_str(json)
            .map_err(|e| ConvertError::fatal("F001", format!("Failed to parse process schema: {}", e)))?;
        if !schema.elements.contains_key(&schema.root) {
            return Err(ConvertError::fatal(
                "F001",
                format!("Process schema does not declare its root element '{}'", schema.root),
            ));
        }
        Ok(schema)
    }

    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::fatal(
                "F001",
                format!("Failed to read process schema {}: {}", path.display(), e),
            )
        })?;
        Self::from_json_str(&json)
    }

    /// Validate a parsed document against the schema. Stops at the first violation.
    pub fn validate(&self, root: Node) -> Result<(), ConvertError> {
        let name = root.tag_name().name();
        if name != self.root {
            return Err(ConvertError::malformed(
                "P002",
                format!("Expected root element '{}', found '{}'", self.root, name),
            ));
        }
        self.validate_element(root)
    }

    fn validate_element(&self, element: Node) -> Result<(), ConvertError> {
        let name = element.tag_name().name();
        let Some(rule) = self.elements.get(name) else {
            return Err(ConvertError::malformed(
                "P003",
                format!("Element '{}' is not declared in the process schema", name),
            ));
        };

        for attr in &rule.required {
            if element.attribute(attr.as_str()).is_none() {
                return Err(ConvertError::malformed(
                    "P004",
                    format!("Element '{}' is missing required attribute '{}'", name, attr),
                ));
            }
        }

        for attr in &rule.numeric {
            if let Some(value) = element.attribute(attr.as_str()) {
                if !value.trim().parse::<f64>().is_ok_and(f64::is_finite) {
                    return Err(ConvertError::malformed(
                        "P005",
                        format!(
                            "Attribute '{}' of element '{}' is not a finite number: '{}'",
                            attr, name, value
                        ),
                    ));
                }
            }
        }

        for child in element.children().filter(|c| c.is_element()) {
            let child_name = child.tag_name().name();
            if !rule.children.iter().any(|c| c == child_name) {
                return Err(ConvertError::malformed(
                    "P003",
                    format!("Element '{}' is not allowed inside '{}'", child_name, name),
                ));
            }
            self.validate_element(child)?;
        }

        Ok(())
    }
}
