//! Error types for the workflow crate.

use thiserror::Error;

/// Errors raised while configuring or running a variational workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VqeError {
    /// The run configuration is inconsistent. Raised before any evaluation.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A parameter vector does not fit the ansatz.
    #[error("Ansatz expects {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Length required by the ansatz.
        expected: usize,
        /// Length supplied.
        got: usize,
    },

    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] spinvqe_ir::IrError),

    /// Simulation failed.
    #[error("Simulation error: {0}")]
    Sim(#[from] spinvqe_sim::SimError),

    /// Optimizer setup failed.
    #[error("Optimizer error: {0}")]
    Opt(#[from] spinvqe_opt::OptError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialisation failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type for workflow operations.
pub type VqeResult<T> = Result<T, VqeError>;
