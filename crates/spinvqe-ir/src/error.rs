//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside the circuit register.
    #[error("Qubit {qubit} not found in {num_qubits}-qubit circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The offending qubit.
        qubit: QubitId,
        /// Register width of the circuit.
        num_qubits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// The same qubit appears twice in one instruction.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Dense matrix has the wrong number of entries for its qubit count.
    #[error("Unitary '{gate_name}' needs {expected} matrix entries, got {got}")]
    InvalidMatrix {
        /// Name of the gate.
        gate_name: String,
        /// Expected entry count (4^n).
        expected: usize,
        /// Actual entry count.
        got: usize,
    },

    /// Noise probability outside [0, 1].
    #[error("Noise channel '{channel}' has probability {p}, expected a value in [0, 1]")]
    InvalidProbability {
        /// Channel name.
        channel: String,
        /// The rejected probability.
        p: f64,
    },
}

#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
