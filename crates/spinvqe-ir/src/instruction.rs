//! Circuit instructions.

use serde::{Deserialize, Serialize};

use crate::gate::Gate;
use crate::noise::NoiseChannel;
use crate::qubit::QubitId;

/// What an instruction does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary gate.
    Gate(Gate),
    /// A single-qubit noise channel.
    Noise(NoiseChannel),
}

/// A single operation applied to a list of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The operation.
    pub kind: InstructionKind,
    /// Target qubits, in gate order.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a noise instruction on one qubit.
    pub fn noise(channel: NoiseChannel, qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Noise(channel),
            qubits: vec![qubit],
        }
    }

    /// Name of the operation.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Noise(n) => n.name(),
        }
    }

    /// Number of qubits the operation expects.
    pub fn arity(&self) -> u32 {
        match &self.kind {
            InstructionKind::Gate(g) => g.num_qubits(),
            InstructionKind::Noise(_) => 1,
        }
    }

    /// Whether this is a noise channel.
    pub fn is_noise(&self) -> bool {
        matches!(self.kind, InstructionKind::Noise(_))
    }
}
