//! Tests for the spin-chain Hamiltonian builders.

use approx::assert_relative_eq;
use proptest::prelude::*;
use spinvqe_sim::{Boundary, PauliOp, ground_state_energy, ising_hamiltonian, xy_hamiltonian};

// ---------------------------------------------------------------------------
// Term structure
// ---------------------------------------------------------------------------

#[test]
fn xy_open_chain_terms() {
    let h = xy_hamiltonian(4, 1.0, 0.5, 0.0, Boundary::Open).unwrap();
    // 3 bonds × (XX, YY) + 4 fields
    assert_eq!(h.n_terms(), 10);
    assert_eq!(h.n_qubits(), 4);
    assert_eq!(h.terms()[0].pauli.ops(), &[(0, PauliOp::X), (1, PauliOp::X)]);
    assert_eq!(h.terms()[1].pauli.ops(), &[(0, PauliOp::Y), (1, PauliOp::Y)]);
    assert_eq!(h.terms()[9].pauli.ops(), &[(3, PauliOp::Z)]);
}

#[test]
fn ising_periodic_chain_terms() {
    let h = ising_hamiltonian(4, 1.0, 1.0, Boundary::Periodic).unwrap();
    // 4 bonds + 4 fields
    assert_eq!(h.n_terms(), 8);
    assert_eq!(h.terms()[3].pauli.ops(), &[(0, PauliOp::Z), (3, PauliOp::Z)]);
}

#[test]
fn zero_coefficients_are_kept() {
    let h = xy_hamiltonian(3, 1.0, 0.0, 1.0, Boundary::Open).unwrap();
    assert_eq!(h.n_terms(), 2 * 2 + 3);
    assert_relative_eq!(h.terms()[1].coeff, 0.0);
}

proptest! {
    #[test]
    fn term_count_is_linear(n in 1u32..12, periodic in any::<bool>()) {
        let boundary = if periodic { Boundary::Periodic } else { Boundary::Open };
        let bonds = (if periodic && n > 2 { n } else { n - 1 }) as usize;

        let xy = xy_hamiltonian(n, 1.0, 1.0, 0.3, boundary).unwrap();
        prop_assert_eq!(xy.n_qubits(), n);
        prop_assert_eq!(xy.n_terms(), 2 * bonds + n as usize);

        let ising = ising_hamiltonian(n, 1.0, 1.0, boundary).unwrap();
        prop_assert_eq!(ising.n_qubits(), n);
        prop_assert_eq!(ising.n_terms(), bonds + n as usize);
    }
}

// ---------------------------------------------------------------------------
// Spectra
// ---------------------------------------------------------------------------

#[test]
fn single_site_ground_energies() {
    let xy = xy_hamiltonian(1, 1.0, 0.7, 0.0, Boundary::Open).unwrap();
    assert_relative_eq!(ground_state_energy(&xy).unwrap(), -0.7, epsilon = 1e-10);

    let ising = ising_hamiltonian(1, 1.0, 0.7, Boundary::Open).unwrap();
    assert_relative_eq!(ground_state_energy(&ising).unwrap(), -0.7, epsilon = 1e-10);
}

#[test]
fn two_site_ising_ground_energy() {
    // ZZ + X₀ + X₁ has ground energy −√5
    let h = ising_hamiltonian(2, 1.0, 1.0, Boundary::Open).unwrap();
    assert_relative_eq!(
        ground_state_energy(&h).unwrap(),
        -(5.0f64.sqrt()),
        epsilon = 1e-10
    );
}

#[test]
fn classical_ising_ground_energy() {
    // Without a field the open chain is antiferromagnetically ordered
    let h = ising_hamiltonian(5, 1.0, 0.0, Boundary::Open).unwrap();
    assert_relative_eq!(ground_state_energy(&h).unwrap(), -4.0, epsilon = 1e-10);
}
