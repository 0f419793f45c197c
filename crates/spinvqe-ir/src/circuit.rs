//! Validated circuit builder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{IrError, IrResult};
use crate::gate::{StandardGate, UnitaryGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::noise::NoiseChannel;
use crate::qubit::QubitId;

/// An ordered list of instructions on a fixed qubit register.
///
/// Every instruction is checked when it is pushed, so a `Circuit` is always
/// well-formed: qubits are in range, distinct within an instruction, match
/// the gate arity, and noise probabilities lie in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create an empty circuit on `num_qubits` qubits.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: Vec::new(),
        }
    }

    /// Append a validated instruction.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let name = instruction.name().to_string();

        let arity = instruction.arity();
        if instruction.qubits.len() != arity as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: name,
                expected: arity,
                got: instruction.qubits.len() as u32,
            });
        }

        for (i, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name: Some(name),
                });
            }
            if instruction.qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(name),
                });
            }
        }

        if let InstructionKind::Noise(channel) = &instruction.kind {
            channel.validate()?;
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply X-rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Rx(theta), [qubit]))
    }

    /// Apply Y-rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Ry(theta), [qubit]))
    }

    /// Apply Z-rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Rz(theta), [qubit]))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::X, [qubit]))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::H, [qubit]))
    }

    /// Apply CNOT.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CX, [control, target]))
    }

    /// Apply controlled-Z.
    pub fn cz(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CZ, [a, b]))
    }

    /// Apply a dense unitary on the listed qubits.
    ///
    /// The first qubit in `qubits` is the least significant bit of the
    /// matrix's basis index.
    pub fn unitary(&mut self, gate: UnitaryGate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits.iter().copied()))
    }

    /// Insert a noise channel on one qubit.
    pub fn noise(&mut self, channel: NoiseChannel, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::noise(channel, qubit))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register width.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Circuit depth: the longest chain of instructions sharing qubits.
    pub fn depth(&self) -> usize {
        let mut levels = vec![0usize; self.num_qubits as usize];
        for inst in &self.instructions {
            let level = inst
                .qubits
                .iter()
                .map(|q| levels[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &inst.qubits {
                levels[q.index()] = level;
            }
        }
        levels.into_iter().max().unwrap_or(0)
    }

    /// Count instructions by name.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of noise instructions.
    pub fn num_noise_channels(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_noise()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn identity(dim: usize) -> Vec<Complex64> {
        let mut m = vec![Complex64::new(0.0, 0.0); dim * dim];
        for i in 0..dim {
            m[i * dim + i] = Complex64::new(1.0, 0.0);
        }
        m
    }

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test", 3);
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 3);
        assert!(circuit.is_empty());
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_builder_chain() {
        let mut circuit = Circuit::new("chain", 3);
        circuit
            .ry(0.1, QubitId(0))
            .unwrap()
            .rz(0.2, QubitId(1))
            .unwrap()
            .cz(QubitId(0), QubitId(1))
            .unwrap()
            .cz(QubitId(1), QubitId(2))
            .unwrap();
        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.depth(), 3);

        let ops = circuit.count_ops();
        assert_eq!(ops.get("cz"), Some(&2));
        assert_eq!(ops.get("ry"), Some(&1));
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut circuit = Circuit::new("test", 2);
        let err = circuit.ry(0.5, QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { num_qubits: 2, .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut circuit = Circuit::new("test", 2);
        let err = circuit.cz(QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_unitary_arity() {
        let mut circuit = Circuit::new("test", 3);
        let gate = UnitaryGate::new("exp(-iHt)", 2, identity(4)).unwrap();
        let err = circuit.unitary(gate.clone(), &[QubitId(0)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));

        circuit.unitary(gate, &[QubitId(0), QubitId(1)]).unwrap();
        assert_eq!(circuit.len(), 1);
    }

    #[test]
    fn test_noise_validation() {
        let mut circuit = Circuit::new("test", 1);
        circuit
            .noise(NoiseChannel::Depolarizing { p: 0.2 }, QubitId(0))
            .unwrap();
        assert!(
            circuit
                .noise(NoiseChannel::BitFlip { p: 1.2 }, QubitId(0))
                .is_err()
        );
        assert_eq!(circuit.num_noise_channels(), 1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut circuit = Circuit::new("rt", 2);
        circuit.ry(0.4, QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
