//! Hamiltonian data structures.
//!
//! A Hamiltonian is a sum of weighted Pauli strings on a fixed register:
//!
//!   H = Σ_k  c_k · P_k
//!
//! where each P_k is a tensor product of single-qubit Pauli operators
//! (I, X, Y, Z) and c_k ∈ ℝ. Qubit `i` is bit `i` of the basis index.
//!
//! # Example
//!
//! ```rust
//! use spinvqe_sim::hamiltonian::{Hamiltonian, HamiltonianTerm};
//!
//! // H = -1.0·Z₀Z₁  +  0.5·X₀
//! let h = Hamiltonian::new(2, vec![
//!     HamiltonianTerm::zz(0, 1, -1.0),
//!     HamiltonianTerm::x(0, 0.5),
//! ]).unwrap();
//! assert_eq!(h.n_terms(), 2);
//! assert_eq!(h.dimension(), 4);
//! ```

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use spinvqe_ir::StandardGate;

use crate::error::{SimError, SimResult};

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// The corresponding gate, or `None` for the identity.
    pub fn gate(self) -> Option<StandardGate> {
        match self {
            PauliOp::I => None,
            PauliOp::X => Some(StandardGate::X),
            PauliOp::Y => Some(StandardGate::Y),
            PauliOp::Z => Some(StandardGate::Z),
        }
    }
}

impl fmt::Display for PauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PauliOp::I => "I",
            PauliOp::X => "X",
            PauliOp::Y => "Y",
            PauliOp::Z => "Z",
        };
        write!(f, "{s}")
    }
}

/// A tensor product of Pauli operators on named qubits.
///
/// Stored as a sorted `Vec<(qubit_index, PauliOp)>` with Identity terms
/// omitted. Qubits not listed are implicitly I.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<(u32, PauliOp)>,
}

impl PauliString {
    /// Construct a PauliString from an iterator of (qubit, op) pairs.
    ///
    /// Identity operators are dropped; the remaining ops are sorted by qubit.
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> Self {
        let mut v: Vec<(u32, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(q, _)| *q);
        Self { ops: v }
    }

    /// Return the non-identity (qubit, op) pairs, sorted by qubit index.
    pub fn ops(&self) -> &[(u32, PauliOp)] {
        &self.ops
    }

    /// True if there are no non-identity operators.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// The highest qubit index referenced, or `None` for an identity string.
    pub fn max_qubit(&self) -> Option<u32> {
        self.ops.last().map(|(q, _)| *q)
    }

    /// Action on a computational basis state: `P|i⟩ = phase · |j⟩`.
    ///
    /// Returns `(j, phase)`.
    #[inline]
    pub fn apply_to_basis(&self, index: usize) -> (usize, Complex64) {
        let mut target = index;
        let mut phase = Complex64::new(1.0, 0.0);
        for &(q, op) in &self.ops {
            let mask = 1usize << q;
            let bit_set = index & mask != 0;
            match op {
                PauliOp::I => {}
                PauliOp::X => target ^= mask,
                PauliOp::Y => {
                    target ^= mask;
                    // Y|0⟩ = i|1⟩, Y|1⟩ = -i|0⟩
                    phase *= if bit_set {
                        Complex64::new(0.0, -1.0)
                    } else {
                        Complex64::new(0.0, 1.0)
                    };
                }
                PauliOp::Z => {
                    if bit_set {
                        phase = -phase;
                    }
                }
            }
        }
        (target, phase)
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return write!(f, "I");
        }
        for (i, (q, op)) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{op}[{q}]")?;
        }
        Ok(())
    }
}

/// A single weighted Pauli term: `coeff · pauli`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// The Pauli string.
    pub pauli: PauliString,
}

impl HamiltonianTerm {
    /// Create a new term.
    pub fn new(coeff: f64, pauli: PauliString) -> Self {
        Self { coeff, pauli }
    }

    /// Shorthand: single-qubit X term.
    pub fn x(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::X)]))
    }

    /// Shorthand: single-qubit Z term.
    pub fn z(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::Z)]))
    }

    /// Shorthand: XX coupling term.
    pub fn xx(q0: u32, q1: u32, coeff: f64) -> Self {
        Self::new(
            coeff,
            PauliString::from_ops([(q0, PauliOp::X), (q1, PauliOp::X)]),
        )
    }

    /// Shorthand: YY coupling term.
    pub fn yy(q0: u32, q1: u32, coeff: f64) -> Self {
        Self::new(
            coeff,
            PauliString::from_ops([(q0, PauliOp::Y), (q1, PauliOp::Y)]),
        )
    }

    /// Shorthand: ZZ coupling term.
    pub fn zz(q0: u32, q1: u32, coeff: f64) -> Self {
        Self::new(
            coeff,
            PauliString::from_ops([(q0, PauliOp::Z), (q1, PauliOp::Z)]),
        )
    }
}

impl fmt::Display for HamiltonianTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coeff >= 0.0 {
            write!(f, "+{:.4} {}", self.coeff, self.pauli)
        } else {
            write!(f, "{:.4} {}", self.coeff, self.pauli)
        }
    }
}

/// A sum-of-Pauli-strings Hamiltonian on `n_qubits` qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hamiltonian {
    n_qubits: u32,
    terms: Vec<HamiltonianTerm>,
}

impl Hamiltonian {
    /// Create from a list of terms, checking every qubit is in range.
    pub fn new(n_qubits: u32, terms: Vec<HamiltonianTerm>) -> SimResult<Self> {
        if n_qubits == 0 {
            return Err(SimError::InvalidQubitCount(n_qubits));
        }
        // basis states are indexed by usize bit masks
        if n_qubits >= usize::BITS {
            return Err(SimError::RegisterTooLarge {
                context: "basis indexing",
                n_qubits,
                max: usize::BITS - 1,
            });
        }
        if let Some(qubit) = terms
            .iter()
            .filter_map(|t| t.pauli.max_qubit())
            .find(|&q| q >= n_qubits)
        {
            return Err(SimError::QubitOutOfRange { qubit, n_qubits });
        }
        Ok(Self { n_qubits, terms })
    }

    /// All terms.
    pub fn terms(&self) -> &[HamiltonianTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Register width.
    pub fn n_qubits(&self) -> u32 {
        self.n_qubits
    }

    /// Hilbert-space dimension `2^n`.
    pub fn dimension(&self) -> usize {
        1 << self.n_qubits
    }

    /// Dense Hermitian matrix of the operator.
    pub fn to_matrix(&self) -> DMatrix<Complex64> {
        let dim = self.dimension();
        let mut m = DMatrix::<Complex64>::zeros(dim, dim);
        for term in &self.terms {
            for col in 0..dim {
                let (row, phase) = term.pauli.apply_to_basis(col);
                m[(row, col)] += phase * term.coeff;
            }
        }
        m
    }
}

impl fmt::Display for Hamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Hamiltonian ({} terms, {} qubits):",
            self.n_terms(),
            self.n_qubits
        )?;
        for term in &self.terms {
            writeln!(f, "  {term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_phases() {
        let y = PauliString::from_ops([(0, PauliOp::Y)]);
        assert_eq!(y.apply_to_basis(0), (1, Complex64::new(0.0, 1.0)));
        assert_eq!(y.apply_to_basis(1), (0, Complex64::new(0.0, -1.0)));
    }

    #[test]
    fn test_to_matrix_is_hermitian() {
        let h = Hamiltonian::new(
            2,
            vec![
                HamiltonianTerm::xx(0, 1, 0.7),
                HamiltonianTerm::yy(0, 1, 0.3),
                HamiltonianTerm::z(1, -0.4),
            ],
        )
        .unwrap();
        let m = h.to_matrix();
        let diff = &m - m.adjoint();
        assert!(diff.norm() < 1e-12);
    }

    #[test]
    fn test_register_wider_than_index_is_rejected() {
        for n in [usize::BITS, 64, u32::MAX] {
            assert!(matches!(
                Hamiltonian::new(n, vec![HamiltonianTerm::z(0, 1.0)]),
                Err(SimError::RegisterTooLarge { n_qubits, .. }) if n_qubits == n
            ));
        }
        let widest = Hamiltonian::new(usize::BITS - 1, vec![]).unwrap();
        assert_eq!(widest.n_qubits(), usize::BITS - 1);
    }

    #[test]
    fn test_zz_diagonal() {
        let h = Hamiltonian::new(2, vec![HamiltonianTerm::zz(0, 1, 1.0)]).unwrap();
        let m = h.to_matrix();
        let diag: Vec<f64> = (0..4).map(|i| m[(i, i)].re).collect();
        assert_eq!(diag, vec![1.0, -1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = Hamiltonian::new(2, vec![HamiltonianTerm::x(2, 1.0)]).unwrap_err();
        assert!(matches!(
            err,
            SimError::QubitOutOfRange {
                qubit: 2,
                n_qubits: 2
            }
        ));
    }

    #[test]
    fn test_display() {
        let t = HamiltonianTerm::zz(0, 1, -0.5);
        assert_eq!(format!("{t}"), "-0.5000 Z[0] Z[1]");
    }
}
