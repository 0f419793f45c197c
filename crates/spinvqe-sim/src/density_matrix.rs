//! Mixed-state simulation.
//!
//! ρ is stored as a dense `nalgebra::DMatrix`. A gate U is applied as
//! `ρ → UρU†` by running the amplitude kernels over every column of ρ,
//! taking the adjoint, and repeating. Noise channels are applied exactly
//! as Pauli mixtures.

use nalgebra::DMatrix;
use num_complex::Complex64;

use spinvqe_ir::{Circuit, Gate, InstructionKind, NoiseChannel, QubitId};

use crate::error::{SimError, SimResult};
use crate::hamiltonian::{Hamiltonian, PauliOp};
use crate::kernels;
use crate::statevector::Statevector;

/// A density matrix over `num_qubits` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    rho: DMatrix<Complex64>,
    num_qubits: u32,
}

impl DensityMatrix {
    /// The pure state |0...0⟩⟨0...0|.
    pub fn new(num_qubits: u32) -> Self {
        let dim = 1usize << num_qubits;
        let mut rho = DMatrix::zeros(dim, dim);
        rho[(0, 0)] = Complex64::new(1.0, 0.0);
        Self { rho, num_qubits }
    }

    /// |ψ⟩⟨ψ| for a pure state.
    pub fn from_statevector(state: &Statevector) -> Self {
        let dim = state.amplitudes().len();
        let rho = DMatrix::from_fn(dim, dim, |r, c| {
            state.amplitudes()[r] * state.amplitudes()[c].conj()
        });
        Self {
            rho,
            num_qubits: state.num_qubits(),
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &DMatrix<Complex64> {
        &self.rho
    }

    /// Real part of Tr(ρ).
    pub fn trace(&self) -> f64 {
        self.rho.trace().re
    }

    /// Tr(ρ²); 1 for pure states, 1/2^n for the maximally mixed state.
    pub fn purity(&self) -> f64 {
        self.rho.iter().map(Complex64::norm_sqr).sum()
    }

    /// Diagonal of ρ.
    pub fn probabilities(&self) -> Vec<f64> {
        (0..self.rho.nrows()).map(|i| self.rho[(i, i)].re).collect()
    }

    /// ρ → UρU† for an operator given by an in-place amplitude kernel.
    fn conjugate_by(&mut self, kernel: impl Fn(&mut [Complex64])) {
        let dim = self.rho.nrows();
        for col in self.rho.as_mut_slice().chunks_mut(dim) {
            kernel(col);
        }
        self.rho.adjoint_mut();
        for col in self.rho.as_mut_slice().chunks_mut(dim) {
            kernel(col);
        }
        self.rho.adjoint_mut();
    }

    /// Apply a gate to specific qubits.
    pub fn apply_gate(&mut self, gate: &Gate, qubits: &[QubitId]) {
        self.conjugate_by(|amps| kernels::apply_gate(amps, gate, qubits));
    }

    /// Apply a noise channel exactly: `ρ → (1−p)ρ + Σ_k w_k PₖρPₖ`.
    pub fn apply_noise(&mut self, channel: &NoiseChannel, qubit: QubitId) {
        let weights = channel.pauli_weights();
        let total: f64 = weights.iter().sum();
        if total == 0.0 {
            return;
        }

        let mut mixed = self.rho.map(|x| x * (1.0 - total));
        for (op, w) in [PauliOp::X, PauliOp::Y, PauliOp::Z].into_iter().zip(weights) {
            if w == 0.0 {
                continue;
            }
            let Some(m) = op.gate().and_then(|g| g.matrix()) else {
                continue;
            };
            let mut branch = self.clone();
            branch.conjugate_by(|amps| kernels::apply_matrix2(amps, &m, qubit.index()));
            mixed += branch.rho * Complex64::new(w, 0.0);
        }
        self.rho = mixed;
    }

    /// Apply every instruction of `circuit` in order.
    pub fn apply_circuit(&mut self, circuit: &Circuit) -> SimResult<()> {
        if circuit.num_qubits() != self.num_qubits {
            return Err(SimError::DimensionMismatch {
                context: "density-matrix circuit",
                expected: self.num_qubits,
                got: circuit.num_qubits(),
            });
        }
        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Gate(gate) => self.apply_gate(gate, &inst.qubits),
                InstructionKind::Noise(channel) => self.apply_noise(channel, inst.qubits[0]),
            }
        }
        Ok(())
    }

    /// Real part of Tr(ρH).
    pub fn expectation(&self, hamiltonian: &Hamiltonian) -> SimResult<f64> {
        if hamiltonian.n_qubits() != self.num_qubits {
            return Err(SimError::DimensionMismatch {
                context: "density-matrix expectation",
                expected: self.num_qubits,
                got: hamiltonian.n_qubits(),
            });
        }
        let dim = self.rho.nrows();
        let mut total = 0.0;
        for term in hamiltonian.terms() {
            // Tr(ρP) = Σ_i ρ[i, j(i)]·phase(i) where P|i⟩ = phase(i)|j(i)⟩
            let mut acc = Complex64::new(0.0, 0.0);
            for i in 0..dim {
                let (j, phase) = term.pauli.apply_to_basis(i);
                acc += self.rho[(i, j)] * phase;
            }
            total += term.coeff * acc.re;
        }
        Ok(total)
    }
}
