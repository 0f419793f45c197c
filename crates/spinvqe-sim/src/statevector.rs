//! Pure-state simulation.

use num_complex::Complex64;
use rand::Rng;

use spinvqe_ir::{Circuit, Gate, InstructionKind, NoiseChannel, QubitId};

use crate::error::{SimError, SimResult};
use crate::hamiltonian::{Hamiltonian, PauliOp};
use crate::kernels;

/// A statevector representing a pure quantum state.
///
/// Noise channels are handled by trajectory sampling: each channel
/// application draws one Pauli (or none) from the caller's RNG, so a single
/// run is one stochastic unravelling of the mixed state.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: u32,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: u32) -> Self {
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Squared norm; 1 for a normalised state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Measurement probabilities in the computational basis.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Apply a gate to specific qubits.
    pub fn apply_gate(&mut self, gate: &Gate, qubits: &[QubitId]) {
        kernels::apply_gate(&mut self.amplitudes, gate, qubits);
    }

    /// Apply a single Pauli operator.
    pub fn apply_pauli(&mut self, op: PauliOp, qubit: QubitId) {
        if let Some(m) = op.gate().and_then(|g| g.matrix()) {
            kernels::apply_matrix2(&mut self.amplitudes, &m, qubit.index());
        }
    }

    /// Sample one trajectory of a noise channel.
    pub fn apply_noise<R: Rng>(
        &mut self,
        channel: &NoiseChannel,
        qubit: QubitId,
        rng: &mut R,
    ) {
        let [px, py, pz] = channel.pauli_weights();
        let u = rng.gen_range(0.0..1.0);
        let op = if u < px {
            PauliOp::X
        } else if u < px + py {
            PauliOp::Y
        } else if u < px + py + pz {
            PauliOp::Z
        } else {
            return;
        };
        self.apply_pauli(op, qubit);
    }

    /// Apply every instruction of `circuit` in order.
    pub fn apply_circuit<R: Rng>(
        &mut self,
        circuit: &Circuit,
        rng: &mut R,
    ) -> SimResult<()> {
        if circuit.num_qubits() != self.num_qubits {
            return Err(SimError::DimensionMismatch {
                context: "statevector circuit",
                expected: self.num_qubits,
                got: circuit.num_qubits(),
            });
        }
        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Gate(gate) => self.apply_gate(gate, &inst.qubits),
                InstructionKind::Noise(channel) => self.apply_noise(channel, inst.qubits[0], rng),
            }
        }
        Ok(())
    }

    /// Real part of ⟨ψ|H|ψ⟩.
    pub fn expectation(&self, hamiltonian: &Hamiltonian) -> SimResult<f64> {
        if hamiltonian.n_qubits() != self.num_qubits {
            return Err(SimError::DimensionMismatch {
                context: "statevector expectation",
                expected: self.num_qubits,
                got: hamiltonian.n_qubits(),
            });
        }
        let mut total = 0.0;
        for term in hamiltonian.terms() {
            let mut acc = Complex64::new(0.0, 0.0);
            for (i, amp) in self.amplitudes.iter().enumerate() {
                let (j, phase) = term.pauli.apply_to_basis(i);
                acc += self.amplitudes[j].conj() * phase * amp;
            }
            total += term.coeff * acc.re;
        }
        Ok(total)
    }
}
