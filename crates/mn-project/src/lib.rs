//! mn-project: network file format and validation.

pub mod convert;
pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_network};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Graph(#[from] mn_graph::GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<NetworkDef> {
    let content = std::fs::read_to_string(path)?;
    let network: NetworkDef = serde_yaml::from_str(&content)?;
    validate_network(&network)?;
    Ok(network)
}

pub fn save_yaml(path: &std::path::Path, network: &NetworkDef) -> ProjectResult<()> {
    validate_network(network)?;
    let content = serde_yaml::to_string(network)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<NetworkDef> {
    let content = std::fs::read_to_string(path)?;
    let network: NetworkDef = serde_json::from_str(&content)?;
    validate_network(&network)?;
    Ok(network)
}

pub fn save_json(path: &std::path::Path, network: &NetworkDef) -> ProjectResult<()> {
    validate_network(network)?;
    let content = serde_json::to_string_pretty(network)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &std::path::Path) -> ProjectResult<NetworkDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
