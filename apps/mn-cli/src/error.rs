use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load network file {path}: {source}")]
    Load {
        path: PathBuf,
        source: mn_project::ProjectError,
    },

    #[error("Network error: {0}")]
    Project(#[from] mn_project::ProjectError),

    #[error("Solver error: {0}")]
    Solver(#[from] mn_solver::SolverError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type CliResult<T> = Result<T, CliError>;
