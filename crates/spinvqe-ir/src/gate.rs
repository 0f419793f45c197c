//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// A 2×2 single-qubit matrix, row-major.
pub type Matrix2 = [[Complex64; 2]; 2];

/// Gates with built-in semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX | StandardGate::CZ => 2,
            _ => 1,
        }
    }

    /// Rotation angle, for parametrised gates.
    pub fn angle(&self) -> Option<f64> {
        match self {
            StandardGate::Rx(theta) | StandardGate::Ry(theta) | StandardGate::Rz(theta) => {
                Some(*theta)
            }
            _ => None,
        }
    }

    /// The 2×2 matrix of a single-qubit gate; `None` for two-qubit gates.
    pub fn matrix(&self) -> Option<Matrix2> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let m = match *self {
            StandardGate::X => [[zero, one], [one, zero]],
            StandardGate::Y => [
                [zero, Complex64::new(0.0, -1.0)],
                [Complex64::new(0.0, 1.0), zero],
            ],
            StandardGate::Z => [[one, zero], [zero, -one]],
            StandardGate::H => {
                let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
                [[h, h], [h, -h]]
            }
            StandardGate::Rx(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                [
                    [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
                    [Complex64::new(0.0, -s), Complex64::new(c, 0.0)],
                ]
            }
            StandardGate::Ry(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                [
                    [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
                    [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
                ]
            }
            StandardGate::Rz(theta) => [
                [Complex64::from_polar(1.0, -theta / 2.0), zero],
                [zero, Complex64::from_polar(1.0, theta / 2.0)],
            ],
            StandardGate::CX | StandardGate::CZ => return None,
        };
        Some(m)
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.angle() {
            Some(theta) => write!(f, "{}({:.3})", self.name(), theta),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// A gate given by an explicit dense matrix over `num_qubits` qubits.
///
/// The matrix is stored row-major with dimension `2^num_qubits`, and its
/// basis ordering follows the instruction's qubit list: the first listed
/// qubit is the least significant bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryGate {
    /// Display name, e.g. `exp(-iHt)`.
    pub name: String,
    /// Number of qubits the matrix acts on.
    pub num_qubits: u32,
    matrix: Vec<Complex64>,
}

impl UnitaryGate {
    /// Create a dense gate, checking the matrix has `4^num_qubits` entries.
    pub fn new(name: impl Into<String>, num_qubits: u32, matrix: Vec<Complex64>) -> IrResult<Self> {
        let name = name.into();
        let expected = 1usize << (2 * num_qubits);
        if matrix.len() != expected {
            return Err(IrError::InvalidMatrix {
                gate_name: name,
                expected,
                got: matrix.len(),
            });
        }
        Ok(Self {
            name,
            num_qubits,
            matrix,
        })
    }

    /// Matrix dimension (`2^num_qubits`).
    pub fn dimension(&self) -> usize {
        1 << self.num_qubits
    }

    /// Row-major matrix entries.
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }
}

/// A gate instruction payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// A gate from the built-in set.
    Standard(StandardGate),
    /// A dense matrix gate.
    Unitary(UnitaryGate),
}

impl Gate {
    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        match self {
            Gate::Standard(g) => g.name(),
            Gate::Unitary(g) => &g.name,
        }
    }

    /// Get the number of qubits this gate operates on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Standard(g) => g.num_qubits(),
            Gate::Unitary(g) => g.num_qubits,
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::Standard(gate)
    }
}

impl From<UnitaryGate> for Gate {
    fn from(gate: UnitaryGate) -> Self {
        Gate::Unitary(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn is_unitary(m: &Matrix2) -> bool {
        for i in 0..2 {
            for j in 0..2 {
                let mut acc = Complex64::new(0.0, 0.0);
                for k in 0..2 {
                    acc += m[i][k] * m[j][k].conj();
                }
                let expected = if i == j { 1.0 } else { 0.0 };
                if (acc - Complex64::new(expected, 0.0)).norm() > 1e-12 {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_gate_properties() {
        assert_eq!(StandardGate::Ry(0.5).name(), "ry");
        assert_eq!(StandardGate::Ry(0.5).num_qubits(), 1);
        assert_eq!(StandardGate::CZ.num_qubits(), 2);
        assert_eq!(StandardGate::Rz(1.5).angle(), Some(1.5));
        assert_eq!(StandardGate::H.angle(), None);
    }

    #[test]
    fn test_single_qubit_matrices_are_unitary() {
        for gate in [
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::H,
            StandardGate::Rx(0.7),
            StandardGate::Ry(-1.3),
            StandardGate::Rz(2.1),
        ] {
            let m = gate.matrix().unwrap();
            assert!(is_unitary(&m), "{gate} is not unitary");
        }
        assert!(StandardGate::CX.matrix().is_none());
    }

    #[test]
    fn test_ry_pi_flips_zero() {
        let m = StandardGate::Ry(PI).matrix().unwrap();
        // RY(π)|0⟩ = |1⟩
        assert!(m[0][0].norm() < 1e-12);
        assert!((m[1][0].re - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unitary_gate_size_check() {
        let identity = vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
        ];
        let gate = UnitaryGate::new("id", 1, identity.clone()).unwrap();
        assert_eq!(gate.dimension(), 2);

        let err = UnitaryGate::new("bad", 2, identity).unwrap_err();
        assert!(matches!(
            err,
            IrError::InvalidMatrix {
                expected: 16,
                got: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", StandardGate::Ry(0.5)), "ry(0.500)");
        assert_eq!(format!("{}", StandardGate::CZ), "cz");
    }
}
