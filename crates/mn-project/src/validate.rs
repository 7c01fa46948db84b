//! Network file validation.

use std::collections::HashSet;

use mn_core::ensure_positive;
use mn_graph::{parse_coordinate_name, parse_mass_name};

use crate::schema::{ExcitationDef, LATEST_VERSION, NetworkDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_network(network: &NetworkDef) -> Result<(), ValidationError> {
    if network.version == 0 || network.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: network.version,
        });
    }

    if network.masses.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "masses".to_string(),
            value: "{}".to_string(),
            reason: "at least one mass is required".to_string(),
        });
    }

    let mut labels = HashSet::new();
    for (name, &value) in &network.masses {
        let label = parse_mass_name(name).map_err(|e| ValidationError::InvalidValue {
            field: "mass name".to_string(),
            value: name.clone(),
            reason: e.to_string(),
        })?;
        // m1 and m01 land on the same coordinate
        if !labels.insert(label) {
            return Err(ValidationError::DuplicateName {
                name: name.clone(),
                context: format!("masses (coordinate x{label})"),
            });
        }
        positive(&format!("mass '{name}'"), value)?;
    }

    if let Some(gap) = (1..=labels.len() as u32).find(|k| !labels.contains(k)) {
        return Err(ValidationError::MissingReference {
            name: format!("x{gap}"),
            context: "masses (coordinates are numbered x1..xN)".to_string(),
        });
    }

    let mut element_names = HashSet::new();
    for element in &network.elements {
        if !element_names.insert(&element.name) {
            return Err(ValidationError::DuplicateName {
                name: element.name.clone(),
                context: "elements".to_string(),
            });
        }
        positive(&format!("element '{}'", element.name), element.value)?;

        let [a, b] = &element.between;
        for end in [a, b] {
            let label = parse_coordinate_name(end, &element.name).map_err(|e| {
                ValidationError::InvalidValue {
                    field: format!("element '{}' between", element.name),
                    value: end.clone(),
                    reason: e.to_string(),
                }
            })?;
            if !labels.contains(&label) {
                return Err(ValidationError::MissingReference {
                    name: end.clone(),
                    context: format!("element '{}' (no mass sits there)", element.name),
                });
            }
        }
        if a == b {
            return Err(ValidationError::InvalidValue {
                field: format!("element '{}' between", element.name),
                value: format!("[{a}, {b}]"),
                reason: "an element must connect two different coordinates".to_string(),
            });
        }
    }

    validate_excitation(&network.excitation)
}

fn validate_excitation(excitation: &ExcitationDef) -> Result<(), ValidationError> {
    match excitation {
        ExcitationDef::Constant { value } => finite_nonzero("excitation value", *value),
        ExcitationDef::Laplace { gain, .. } => finite_nonzero("excitation gain", *gain),
        ExcitationDef::Parameter { name } => {
            let valid = name.chars().next().is_some_and(char::is_alphabetic)
                && name.chars().all(|c| c.is_alphanumeric() || c == '_');
            if valid {
                Ok(())
            } else {
                Err(ValidationError::InvalidValue {
                    field: "excitation parameter".to_string(),
                    value: name.clone(),
                    reason: "expected an identifier such as 'F'".to_string(),
                })
            }
        }
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    ensure_positive(value, field)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn finite_nonzero(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value != 0.0 {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: "must be finite and non-zero".to_string(),
    })
}
