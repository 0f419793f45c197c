//! `spinvqe-sim`: spin-chain Hamiltonians and small-register simulation.
//!
//! Provides everything a variational loop needs on the quantum side:
//!
//! - **Pauli Hamiltonians** with XY and transverse-field Ising chain builders
//! - **Exact diagonalisation** for the reference ground energy and the
//!   `exp(−iHt)` propagator used by time-evolution ansätze
//! - **State-vector** and **density-matrix** simulators executing
//!   `spinvqe_ir::Circuit`s, including Pauli noise channels
//!
//! # Quick start
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use spinvqe_ir::{Circuit, QubitId};
//! use spinvqe_sim::{Boundary, QuantumState, StateKind, ising_hamiltonian};
//!
//! let h = ising_hamiltonian(2, 1.0, 1.0, Boundary::Open).unwrap();
//!
//! let mut circuit = Circuit::new("ansatz", 2);
//! circuit.ry(0.4, QubitId(0)).unwrap();
//! circuit.ry(-0.9, QubitId(1)).unwrap();
//!
//! let mut state = QuantumState::new(StateKind::DensityMatrix, 2);
//! state.apply_circuit(&circuit, &mut StdRng::seed_from_u64(1)).unwrap();
//! let energy = state.expectation(&h).unwrap();
//!
//! // cosθ·cosφ + sinθ + sinφ
//! let expected = 0.4f64.cos() * (-0.9f64).cos() + 0.4f64.sin() + (-0.9f64).sin();
//! assert!((energy - expected).abs() < 1e-10);
//! ```

pub mod density_matrix;
pub mod error;
pub mod hamiltonian;
mod kernels;
pub mod spectrum;
pub mod spin_chain;
pub mod state;
pub mod statevector;

pub use density_matrix::DensityMatrix;
pub use error::{SimError, SimResult};
pub use hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp, PauliString};
pub use spectrum::{MAX_DENSE_QUBITS, Propagator, ground_state_energy};
pub use spin_chain::{Boundary, ising_hamiltonian, xy_hamiltonian};
pub use state::{QuantumState, StateKind};
pub use statevector::Statevector;
