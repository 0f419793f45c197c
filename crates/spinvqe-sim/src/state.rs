//! Representation-agnostic quantum state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use spinvqe_ir::Circuit;

use crate::density_matrix::DensityMatrix;
use crate::error::SimResult;
use crate::hamiltonian::Hamiltonian;
use crate::statevector::Statevector;

/// Which state representation to simulate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    /// Pure state; noise is trajectory-sampled.
    Statevector,
    /// Mixed state; noise is exact.
    #[default]
    DensityMatrix,
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateKind::Statevector => write!(f, "statevector"),
            StateKind::DensityMatrix => write!(f, "density_matrix"),
        }
    }
}

impl StateKind {
    /// Widest register this representation is simulated for.
    ///
    /// A state vector holds `2^n` amplitudes, a density matrix `4^n` entries.
    pub fn max_qubits(self) -> u32 {
        match self {
            StateKind::Statevector => 26,
            StateKind::DensityMatrix => 14,
        }
    }
}

/// A simulated register in either representation.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantumState {
    /// Pure state.
    Vector(Statevector),
    /// Mixed state.
    Density(DensityMatrix),
}

impl QuantumState {
    /// Fresh |0...0⟩ state of the requested kind.
    pub fn new(kind: StateKind, num_qubits: u32) -> Self {
        match kind {
            StateKind::Statevector => QuantumState::Vector(Statevector::new(num_qubits)),
            StateKind::DensityMatrix => QuantumState::Density(DensityMatrix::new(num_qubits)),
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        match self {
            QuantumState::Vector(sv) => sv.num_qubits(),
            QuantumState::Density(dm) => dm.num_qubits(),
        }
    }

    /// Apply a circuit. The RNG is only drawn from for trajectory noise.
    pub fn apply_circuit<R: Rng>(&mut self, circuit: &Circuit, rng: &mut R) -> SimResult<()> {
        match self {
            QuantumState::Vector(sv) => sv.apply_circuit(circuit, rng),
            QuantumState::Density(dm) => dm.apply_circuit(circuit),
        }
    }

    /// Real-valued expectation of `hamiltonian`.
    pub fn expectation(&self, hamiltonian: &Hamiltonian) -> SimResult<f64> {
        match self {
            QuantumState::Vector(sv) => sv.expectation(hamiltonian),
            QuantumState::Density(dm) => dm.expectation(hamiltonian),
        }
    }
}
