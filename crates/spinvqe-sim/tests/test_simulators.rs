//! Tests for the state-vector and density-matrix simulators.

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use spinvqe_ir::{Circuit, NoiseChannel, QubitId, UnitaryGate};
use spinvqe_sim::{
    Boundary, DensityMatrix, Propagator, QuantumState, StateKind, Statevector,
    ising_hamiltonian, xy_hamiltonian,
};

fn layered_circuit(n: u32, angles: &[f64], t: f64) -> Circuit {
    let generator = xy_hamiltonian(n, 1.0, 0.5, 0.2, Boundary::Open).unwrap();
    let propagator = Propagator::new(&generator).unwrap();
    let gate = UnitaryGate::new("exp(-iHt)", n, propagator.unitary(t)).unwrap();
    let qubits: Vec<QubitId> = (0..n).map(QubitId).collect();

    let mut circuit = Circuit::new("layer", n);
    for (q, &theta) in angles.iter().enumerate() {
        circuit.ry(theta, QubitId(q as u32)).unwrap();
    }
    circuit.unitary(gate, &qubits).unwrap();
    circuit.cz(QubitId(0), QubitId(1)).unwrap();
    circuit.rz(0.3, QubitId(1)).unwrap();
    circuit
}

// ---------------------------------------------------------------------------
// Analytic references
// ---------------------------------------------------------------------------

#[test]
fn product_state_ising_energy() {
    let (theta, phi): (f64, f64) = (0.8, -1.7);
    let (cn, bn): (f64, f64) = (1.3, 0.6);
    let h = ising_hamiltonian(2, cn, bn, Boundary::Open).unwrap();

    let mut circuit = Circuit::new("product", 2);
    circuit.ry(theta, QubitId(0)).unwrap();
    circuit.ry(phi, QubitId(1)).unwrap();

    for kind in [StateKind::Statevector, StateKind::DensityMatrix] {
        let mut state = QuantumState::new(kind, 2);
        state
            .apply_circuit(&circuit, &mut StdRng::seed_from_u64(0))
            .unwrap();
        let expected = cn * theta.cos() * phi.cos() + bn * (theta.sin() + phi.sin());
        assert_relative_eq!(state.expectation(&h).unwrap(), expected, epsilon = 1e-10);
    }
}

#[test]
fn xy_hopping_dynamics() {
    // H = ½(XX + YY) swaps |01⟩ ↔ |10⟩; ⟨Z₀⟩(t) = −cos 2t from q0 = 1
    let h = xy_hamiltonian(2, 1.0, 0.0, 0.0, Boundary::Open).unwrap();
    let propagator = Propagator::new(&h).unwrap();
    let z0 = spinvqe_sim::Hamiltonian::new(2, vec![spinvqe_sim::HamiltonianTerm::z(0, 1.0)])
        .unwrap();

    for t in [0.0f64, 0.3, 0.785, 1.2] {
        let mut circuit = Circuit::new("hop", 2);
        circuit.x(QubitId(0)).unwrap();
        let gate = UnitaryGate::new("exp(-iHt)", 2, propagator.unitary(t)).unwrap();
        circuit.unitary(gate, &[QubitId(0), QubitId(1)]).unwrap();

        let mut sv = Statevector::new(2);
        sv.apply_circuit(&circuit, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_relative_eq!(sv.expectation(&z0).unwrap(), -(2.0 * t).cos(), epsilon = 1e-10);
    }
}

// ---------------------------------------------------------------------------
// Representation agreement
// ---------------------------------------------------------------------------

#[test]
fn density_matrix_matches_statevector_without_noise() {
    let circuit = layered_circuit(3, &[0.4, -1.1, 2.3], 0.9);
    let observable = ising_hamiltonian(3, 1.0, 1.0, Boundary::Open).unwrap();

    let mut sv = Statevector::new(3);
    sv.apply_circuit(&circuit, &mut StdRng::seed_from_u64(0))
        .unwrap();
    let mut dm = DensityMatrix::new(3);
    dm.apply_circuit(&circuit).unwrap();

    assert_relative_eq!(sv.norm_sqr(), 1.0, epsilon = 1e-10);
    assert_relative_eq!(
        sv.expectation(&observable).unwrap(),
        dm.expectation(&observable).unwrap(),
        epsilon = 1e-10
    );

    let reference = DensityMatrix::from_statevector(&sv);
    let diff = reference.matrix() - dm.matrix();
    assert!(diff.norm() < 1e-10);
}

#[test]
fn depolarizing_noise_preserves_trace_and_lowers_purity() {
    let mut circuit = layered_circuit(2, &[0.5, 1.0], 0.4);
    for q in 0..2 {
        circuit
            .noise(NoiseChannel::Depolarizing { p: 0.1 }, QubitId(q))
            .unwrap();
    }
    let mut dm = DensityMatrix::new(2);
    dm.apply_circuit(&circuit).unwrap();

    assert_relative_eq!(dm.trace(), 1.0, epsilon = 1e-10);
    assert!(dm.purity() < 1.0 - 1e-3);
    let hermitian_gap = (dm.matrix() - dm.matrix().adjoint()).norm();
    assert!(hermitian_gap < 1e-10);
}

#[test]
fn trajectories_average_to_channel() {
    let p = 0.3;
    let mut circuit = Circuit::new("flip", 1);
    circuit.noise(NoiseChannel::BitFlip { p }, QubitId(0)).unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let shots = 4000;
    let mut flipped = 0;
    for _ in 0..shots {
        let mut sv = Statevector::new(1);
        sv.apply_circuit(&circuit, &mut rng).unwrap();
        if sv.amplitudes()[1].norm_sqr() > 0.5 {
            flipped += 1;
        }
    }
    let rate = f64::from(flipped) / f64::from(shots);
    assert!((rate - p).abs() < 0.05, "flip rate {rate}");
}

#[test]
fn hamiltonian_width_must_match_state() {
    let h = ising_hamiltonian(3, 1.0, 1.0, Boundary::Open).unwrap();
    let state = QuantumState::new(StateKind::DensityMatrix, 2);
    assert!(state.expectation(&h).is_err());
}
