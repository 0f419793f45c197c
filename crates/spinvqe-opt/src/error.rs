//! Error types for the optimizer crate.

use thiserror::Error;

/// Errors raised by the optimizers themselves.
///
/// Objective functions carry their own error type; the optimizers convert
/// these into it through `From<OptError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OptError {
    /// Nothing to optimise.
    #[error("Initial parameter vector is empty")]
    EmptyParameters,

    /// A constraint's coefficient vector does not match the parameter vector.
    #[error("Constraint {index} has {got} coefficients but the parameter vector has {expected}")]
    DimensionMismatch {
        /// Position of the constraint in its set.
        index: usize,
        /// Parameter vector length.
        expected: usize,
        /// Coefficient count.
        got: usize,
    },

    /// No feasible point could be reached from the initial guess.
    #[error("Constraints could not be satisfied (max violation {violation:.3e})")]
    Infeasible {
        /// Largest remaining violation after projection.
        violation: f64,
    },

    /// Unknown optimizer name.
    #[error("Unknown optimizer '{0}' (expected 'SLSQP' or 'Nelder-Mead')")]
    UnknownMethod(String),

    /// Dense linear algebra failed.
    #[error("Linear algebra failure: {0}")]
    LinearAlgebra(String),
}

/// Result type for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;
