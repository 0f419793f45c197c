//! One-dimensional spin-chain models.
//!
//! Both builders return nearest-neighbour chains with a uniform field:
//!
//! - XY:    H = Σ_⟨ij⟩ cn·[(1+r)/2·XᵢXⱼ + (1−r)/2·YᵢYⱼ] + Σᵢ bn·Zᵢ
//! - Ising: H = Σ_⟨ij⟩ cn·ZᵢZⱼ + Σᵢ bn·Xᵢ
//!
//! Terms with a zero coefficient are kept, so the term count depends only on
//! the chain length and the boundary condition.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::hamiltonian::{Hamiltonian, HamiltonianTerm};

/// Boundary condition of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Bonds `(i, i+1)` for `i < n-1`.
    #[default]
    Open,
    /// Open bonds plus `(n-1, 0)` when `n > 2`.
    Periodic,
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Boundary::Open => write!(f, "open"),
            Boundary::Periodic => write!(f, "periodic"),
        }
    }
}

/// Nearest-neighbour bonds of an `n`-site chain.
pub fn bonds(n: u32, boundary: Boundary) -> Vec<(u32, u32)> {
    let mut out: Vec<(u32, u32)> = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
    if boundary == Boundary::Periodic && n > 2 {
        out.push((n - 1, 0));
    }
    out
}

/// XY model with anisotropy `r`.
///
/// `r = 0` is the isotropic XX model; `r = ±1` reduces to pure XX or YY
/// coupling.
pub fn xy_hamiltonian(
    n: u32,
    coupling: f64,
    field: f64,
    anisotropy: f64,
    boundary: Boundary,
) -> SimResult<Hamiltonian> {
    if n < 1 {
        return Err(SimError::InvalidQubitCount(n));
    }
    let cx = coupling * (1.0 + anisotropy) / 2.0;
    let cy = coupling * (1.0 - anisotropy) / 2.0;

    let mut terms = Vec::new();
    for (i, j) in bonds(n, boundary) {
        terms.push(HamiltonianTerm::xx(i, j, cx));
        terms.push(HamiltonianTerm::yy(i, j, cy));
    }
    terms.extend((0..n).map(|i| HamiltonianTerm::z(i, field)));

    debug!(n, coupling, field, anisotropy, n_terms = terms.len(), "Built XY Hamiltonian");
    Hamiltonian::new(n, terms)
}

/// Transverse-field Ising model.
pub fn ising_hamiltonian(
    n: u32,
    coupling: f64,
    field: f64,
    boundary: Boundary,
) -> SimResult<Hamiltonian> {
    if n < 1 {
        return Err(SimError::InvalidQubitCount(n));
    }
    let mut terms: Vec<HamiltonianTerm> = bonds(n, boundary)
        .into_iter()
        .map(|(i, j)| HamiltonianTerm::zz(i, j, coupling))
        .collect();
    terms.extend((0..n).map(|i| HamiltonianTerm::x(i, field)));

    debug!(n, coupling, field, n_terms = terms.len(), "Built Ising Hamiltonian");
    Hamiltonian::new(n, terms)
}
