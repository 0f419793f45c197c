//! Exact diagonalisation.
//!
//! Dense eigendecomposition is exponential in the register width, which is
//! fine for the chain lengths a variational study targets (a few to a dozen
//! sites).

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use num_complex::Complex64;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::hamiltonian::Hamiltonian;

/// Widest register the dense eigensolver accepts (a `4^n` complex matrix).
pub const MAX_DENSE_QUBITS: u32 = 14;

fn diagonalize(hamiltonian: &Hamiltonian) -> SimResult<SymmetricEigen<Complex64, nalgebra::Dyn>> {
    if hamiltonian.n_qubits() > MAX_DENSE_QUBITS {
        return Err(SimError::RegisterTooLarge {
            context: "exact diagonalisation",
            n_qubits: hamiltonian.n_qubits(),
            max: MAX_DENSE_QUBITS,
        });
    }
    let dimension = hamiltonian.dimension();
    SymmetricEigen::try_new(hamiltonian.to_matrix(), f64::EPSILON, 0)
        .ok_or(SimError::Diagonalization { dimension })
}

/// Lowest eigenvalue of the Hamiltonian.
pub fn ground_state_energy(hamiltonian: &Hamiltonian) -> SimResult<f64> {
    let eigen = diagonalize(hamiltonian)?;
    let energy = eigen
        .eigenvalues
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    debug!(
        n_qubits = hamiltonian.n_qubits(),
        energy, "Exact ground state energy"
    );
    Ok(energy)
}

/// Time-evolution operator `exp(−iHt)` of a fixed Hamiltonian.
///
/// The Hamiltonian is diagonalised once; each [`Propagator::unitary`] call
/// only exponentiates the eigenvalues.
#[derive(Debug, Clone)]
pub struct Propagator {
    n_qubits: u32,
    eigenvalues: DVector<f64>,
    eigenvectors: DMatrix<Complex64>,
}

impl Propagator {
    /// Diagonalise `hamiltonian`.
    pub fn new(hamiltonian: &Hamiltonian) -> SimResult<Self> {
        let eigen = diagonalize(hamiltonian)?;
        Ok(Self {
            n_qubits: hamiltonian.n_qubits(),
            eigenvalues: eigen.eigenvalues,
            eigenvectors: eigen.eigenvectors,
        })
    }

    /// Register width of the underlying Hamiltonian.
    pub fn n_qubits(&self) -> u32 {
        self.n_qubits
    }

    /// Spectrum in the order nalgebra returns it (unsorted).
    pub fn eigenvalues(&self) -> &DVector<f64> {
        &self.eigenvalues
    }

    /// `exp(−iHt) = V·diag(e^{−iλt})·V†` as a row-major matrix.
    pub fn unitary(&self, t: f64) -> Vec<Complex64> {
        let phases = DMatrix::from_diagonal(
            &self
                .eigenvalues
                .map(|lambda| Complex64::from_polar(1.0, -lambda * t)),
        );
        let u = &self.eigenvectors * phases * self.eigenvectors.adjoint();
        let dim = u.nrows();
        let mut out = Vec::with_capacity(dim * dim);
        for row in 0..dim {
            for col in 0..dim {
                out.push(u[(row, col)]);
            }
        }
        out
    }
}
