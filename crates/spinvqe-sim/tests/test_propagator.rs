//! Tests for the exact time-evolution propagator.

use num_complex::Complex64;
use proptest::prelude::*;
use spinvqe_sim::{Boundary, Propagator, ising_hamiltonian, xy_hamiltonian};

fn unitarity_error(u: &[Complex64], dim: usize) -> f64 {
    let mut worst = 0.0f64;
    for i in 0..dim {
        for j in 0..dim {
            let mut acc = Complex64::new(0.0, 0.0);
            for k in 0..dim {
                acc += u[i * dim + k] * u[j * dim + k].conj();
            }
            let expected = if i == j { 1.0 } else { 0.0 };
            worst = worst.max((acc - Complex64::new(expected, 0.0)).norm());
        }
    }
    worst
}

#[test]
fn propagator_composes_in_time() {
    let h = ising_hamiltonian(2, 0.9, 0.4, Boundary::Open).unwrap();
    let p = Propagator::new(&h).unwrap();
    let (u1, u2, u3) = (p.unitary(0.3), p.unitary(0.5), p.unitary(0.8));
    let dim = 4;
    for i in 0..dim {
        for j in 0..dim {
            let mut acc = Complex64::new(0.0, 0.0);
            for k in 0..dim {
                acc += u2[i * dim + k] * u1[k * dim + j];
            }
            assert!((acc - u3[i * dim + j]).norm() < 1e-10);
        }
    }
}

#[test]
fn propagator_width() {
    let h = xy_hamiltonian(3, 1.0, 1.0, 0.0, Boundary::Open).unwrap();
    let p = Propagator::new(&h).unwrap();
    assert_eq!(p.n_qubits(), 3);
    assert_eq!(p.eigenvalues().len(), 8);
    assert_eq!(p.unitary(1.0).len(), 64);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn propagator_is_unitary(
        n in 1u32..=4,
        t in -5.0f64..5.0,
        r in -1.0f64..1.0,
        field in -2.0f64..2.0,
    ) {
        let h = xy_hamiltonian(n, 1.0, field, r, Boundary::Periodic).unwrap();
        let u = Propagator::new(&h).unwrap().unitary(t);
        prop_assert!(unitarity_error(&u, 1 << n) < 1e-9);
    }
}
