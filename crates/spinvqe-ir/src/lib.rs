//! spinvqe circuit intermediate representation
//!
//! Ansatz circuits in spinvqe are short-lived values: they are rebuilt from
//! the current parameter vector on every cost evaluation, handed to the
//! simulator, and optionally kept around for rendering. The IR is therefore a
//! flat, ordered instruction list rather than a DAG.
//!
//! # Core Components
//!
//! - [`QubitId`] for addressing qubits of the register
//! - [`StandardGate`] for the fixed gate set (rotations, X, H, CX, CZ)
//! - [`UnitaryGate`] for dense matrices such as `exp(-iHt)` evolution steps
//! - [`NoiseChannel`] for per-qubit Pauli noise inserted by noisy ansätze
//! - [`Circuit`] the validated builder
//!
//! # Example
//!
//! ```rust
//! use spinvqe_ir::{Circuit, NoiseChannel, QubitId};
//!
//! let mut circuit = Circuit::new("layer", 2);
//! circuit.ry(0.3, QubitId(0)).unwrap();
//! circuit.ry(-0.7, QubitId(1)).unwrap();
//! circuit.cz(QubitId(0), QubitId(1)).unwrap();
//! circuit
//!     .noise(NoiseChannel::Depolarizing { p: 0.01 }, QubitId(0))
//!     .unwrap();
//!
//! assert_eq!(circuit.len(), 4);
//! assert_eq!(circuit.depth(), 3);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod noise;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Gate, Matrix2, StandardGate, UnitaryGate};
pub use instruction::{Instruction, InstructionKind};
pub use noise::NoiseChannel;
pub use qubit::QubitId;
