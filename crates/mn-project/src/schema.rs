//! Network file schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDef {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Mass name (`m1`, `m2`, ...) to value. The numeric suffix picks the
    /// coordinate the mass sits on.
    pub masses: BTreeMap<String, f64>,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
    #[serde(default)]
    pub excitation: ExcitationDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDef {
    pub name: String,
    pub kind: ElementKindDef,
    pub value: f64,
    /// Coordinate names of the two ends, e.g. `[x1, x2]`.
    pub between: [String; 2],
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ElementKindDef {
    Spring,
    Damper,
    Inerter,
}

/// Force applied at the first coordinate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExcitationDef {
    Constant { value: f64 },
    /// `gain * s^power`
    Laplace { power: u32, gain: f64 },
    Parameter { name: String },
}

impl Default for ExcitationDef {
    fn default() -> Self {
        ExcitationDef::Parameter {
            name: "F".to_string(),
        }
    }
}
