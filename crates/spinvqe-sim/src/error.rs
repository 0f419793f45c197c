//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while building Hamiltonians or simulating circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A spin chain needs at least one site.
    #[error("Spin chain needs at least 1 qubit, got {0}")]
    InvalidQubitCount(u32),

    /// The register is too wide to index or to store densely.
    #[error("{n_qubits} qubits exceed the limit of {max} for {context}")]
    RegisterTooLarge {
        /// What needed the register.
        context: &'static str,
        /// Requested width.
        n_qubits: u32,
        /// Largest supported width.
        max: u32,
    },

    /// A Pauli string references a qubit index that is out of range.
    #[error("Pauli string references qubit {qubit} but the Hamiltonian only has {n_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// Number of qubits of the Hamiltonian.
        n_qubits: u32,
    },

    /// State, circuit or Hamiltonian disagree on the register width.
    #[error("Dimension mismatch in {context}: expected {expected} qubits, got {got}")]
    DimensionMismatch {
        /// What was being combined.
        context: &'static str,
        /// Width of the state.
        expected: u32,
        /// Width of the other operand.
        got: u32,
    },

    /// Eigendecomposition did not converge.
    #[error("Eigendecomposition of a {dimension}x{dimension} Hamiltonian did not converge")]
    Diagonalization {
        /// Matrix dimension.
        dimension: usize,
    },

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] spinvqe_ir::IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
