//! In-place gate kernels on a little-endian amplitude vector.
//!
//! Shared by the state-vector simulator and, column by column, by the
//! density-matrix simulator.

use num_complex::Complex64;

use spinvqe_ir::{Gate, Matrix2, QubitId, StandardGate};

/// Apply any IR gate to the listed qubits.
pub(crate) fn apply_gate(amps: &mut [Complex64], gate: &Gate, qubits: &[QubitId]) {
    match gate {
        Gate::Standard(StandardGate::CX) => apply_cx(amps, qubits[0].index(), qubits[1].index()),
        Gate::Standard(StandardGate::CZ) => apply_cz(amps, qubits[0].index(), qubits[1].index()),
        Gate::Standard(single) => {
            if let Some(m) = single.matrix() {
                apply_matrix2(amps, &m, qubits[0].index());
            }
        }
        Gate::Unitary(unitary) => apply_dense(amps, unitary.matrix(), qubits),
    }
}

/// Apply a 2×2 matrix to `qubit`.
pub(crate) fn apply_matrix2(amps: &mut [Complex64], m: &Matrix2, qubit: usize) {
    let mask = 1usize << qubit;
    for i in 0..amps.len() {
        if i & mask == 0 {
            let j = i | mask;
            let a0 = amps[i];
            let a1 = amps[j];
            amps[i] = m[0][0] * a0 + m[0][1] * a1;
            amps[j] = m[1][0] * a0 + m[1][1] * a1;
        }
    }
}

/// Apply CNOT.
pub(crate) fn apply_cx(amps: &mut [Complex64], control: usize, target: usize) {
    let c_mask = 1usize << control;
    let t_mask = 1usize << target;
    for i in 0..amps.len() {
        if i & c_mask != 0 && i & t_mask == 0 {
            amps.swap(i, i | t_mask);
        }
    }
}

/// Apply controlled-Z.
pub(crate) fn apply_cz(amps: &mut [Complex64], a: usize, b: usize) {
    let mask = (1usize << a) | (1usize << b);
    for (i, amp) in amps.iter_mut().enumerate() {
        if i & mask == mask {
            *amp = -*amp;
        }
    }
}

/// Apply a dense row-major matrix on `qubits` (first listed = lowest bit).
pub(crate) fn apply_dense(amps: &mut [Complex64], matrix: &[Complex64], qubits: &[QubitId]) {
    let dim = 1usize << qubits.len();
    let mask = qubits.iter().fold(0usize, |acc, q| acc | (1 << q.index()));

    // offsets[local] = global bits set by the local basis index
    let offsets: Vec<usize> = (0..dim)
        .map(|local| {
            qubits
                .iter()
                .enumerate()
                .filter(|(bit, _)| local >> bit & 1 == 1)
                .fold(0usize, |acc, (_, q)| acc | (1 << q.index()))
        })
        .collect();

    let zero = Complex64::new(0.0, 0.0);
    let mut input = vec![zero; dim];
    for base in 0..amps.len() {
        if base & mask != 0 {
            continue;
        }
        for (local, &offset) in offsets.iter().enumerate() {
            input[local] = amps[base | offset];
        }
        for (row, &offset) in offsets.iter().enumerate() {
            let coeffs = &matrix[row * dim..(row + 1) * dim];
            amps[base | offset] = coeffs.iter().zip(&input).map(|(m, a)| m * a).sum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basis(dim: usize, index: usize) -> Vec<Complex64> {
        let mut v = vec![Complex64::new(0.0, 0.0); dim];
        v[index] = Complex64::new(1.0, 0.0);
        v
    }

    #[test]
    fn test_x_on_high_qubit() {
        let mut amps = basis(4, 0);
        apply_matrix2(&mut amps, &StandardGate::X.matrix().unwrap(), 1);
        assert!((amps[2].re - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cx() {
        let mut amps = basis(4, 1);
        apply_cx(&mut amps, 0, 1);
        assert!((amps[3].re - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dense_swap_order() {
        // X on the first listed qubit flips the lowest local bit
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let x_on_low = vec![
            zero, one, zero, zero, //
            one, zero, zero, zero, //
            zero, zero, zero, one, //
            zero, zero, one, zero,
        ];
        let mut amps = basis(8, 0);
        apply_dense(&mut amps, &x_on_low, &[QubitId(2), QubitId(0)]);
        assert!((amps[4].re - 1.0).abs() < 1e-12);
    }
}
