//! Error types for the simulation core.

use thiserror::Error;

/// Main error type for simulator operations.
#[derive(Error, Debug)]
pub enum SimError {
    /// Configuration failed validation at simulator construction.
    #[error("Invalid configuration: {0}")]
    Config(#[from] anyhow::Error),

    /// The controller and fitness collections do not describe the same
    /// population.
    #[error("Population misaligned: {controllers} controllers for {sinks} fitness sinks")]
    PopulationMismatch { controllers: usize, sinks: usize },
}

/// Result type alias for simulator operations.
pub type Result<T> = std::result::Result<T, SimError>;
