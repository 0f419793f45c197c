//! Layered ansatz circuits.
//!
//! Two topologies share one parameter layout convention: a flat `&[f64]`
//! consumed in fixed-size slices, one slice per layer.
//!
//! - **Generator**: per layer `[t, θ_0 … θ_{n-1}]`; RY(θ_q) on every qubit
//!   followed by the dense evolution `exp(−i t H)` of a generator
//!   Hamiltonian. Optionally noisy: a channel after every RY and one on
//!   every qubit after each evolution step.
//! - **Hardware-efficient**: an RY/RZ block, then `layers` repetitions of a
//!   CZ chain and another RY/RZ block. Never noisy.

use spinvqe_ir::{Circuit, NoiseChannel, QubitId, UnitaryGate};
use spinvqe_sim::{Hamiltonian, Propagator};
use tracing::debug;

use crate::config::AnsatzKind;
use crate::error::{VqeError, VqeResult};

/// Number of parameters the ansatz consumes.
pub fn num_parameters(kind: AnsatzKind, n_qubits: u32, layers: usize) -> usize {
    let n = n_qubits as usize;
    match kind {
        AnsatzKind::Xy | AnsatzKind::Ising => layers * (n + 1),
        AnsatzKind::HardwareEfficient => 2 * n * (layers + 1),
    }
}

/// Check a parameter vector against the expected length.
pub fn check_parameters(expected: usize, params: &[f64]) -> VqeResult<()> {
    if params.len() != expected {
        return Err(VqeError::ParameterCountMismatch {
            expected,
            got: params.len(),
        });
    }
    Ok(())
}

/// An ansatz topology with everything fixed except the parameters.
#[derive(Debug, Clone)]
pub enum Ansatz {
    /// RY layers interleaved with `exp(−i t H)`.
    Generator {
        /// `xy` or `ising`, used in circuit and gate names.
        label: &'static str,
        layers: usize,
        propagator: Propagator,
        noise: Option<NoiseChannel>,
    },
    /// RY/RZ blocks with CZ entanglers.
    HardwareEfficient { n_qubits: u32, layers: usize },
}

impl Ansatz {
    /// Time-evolution ansatz driven by `generator`.
    ///
    /// Diagonalises the generator once.
    pub fn generator(
        label: &'static str,
        generator: &Hamiltonian,
        layers: usize,
        noise: Option<NoiseChannel>,
    ) -> VqeResult<Self> {
        if layers == 0 {
            return Err(VqeError::InvalidConfiguration(
                "ansatz needs at least one layer".into(),
            ));
        }
        if let Some(channel) = &noise {
            channel.validate()?;
        }
        let propagator = Propagator::new(generator)?;
        debug!(
            label,
            layers,
            n_qubits = generator.n_qubits(),
            noisy = noise.is_some(),
            "Prepared generator ansatz"
        );
        Ok(Ansatz::Generator {
            label,
            layers,
            propagator,
            noise,
        })
    }

    /// Hamiltonian-free RY/RZ + CZ ansatz.
    pub fn hardware_efficient(n_qubits: u32, layers: usize) -> VqeResult<Self> {
        if n_qubits == 0 || layers == 0 {
            return Err(VqeError::InvalidConfiguration(format!(
                "hardware-efficient ansatz needs qubits and layers, got {n_qubits} and {layers}"
            )));
        }
        Ok(Ansatz::HardwareEfficient { n_qubits, layers })
    }

    /// Register width.
    pub fn num_qubits(&self) -> u32 {
        match self {
            Ansatz::Generator { propagator, .. } => propagator.n_qubits(),
            Ansatz::HardwareEfficient { n_qubits, .. } => *n_qubits,
        }
    }

    /// Number of repetitions.
    pub fn layers(&self) -> usize {
        match self {
            Ansatz::Generator { layers, .. } | Ansatz::HardwareEfficient { layers, .. } => *layers,
        }
    }

    /// Length of the parameter vector [`Ansatz::build`] accepts.
    pub fn num_parameters(&self) -> usize {
        let n = self.num_qubits() as usize;
        match self {
            Ansatz::Generator { layers, .. } => layers * (n + 1),
            Ansatz::HardwareEfficient { layers, .. } => 2 * n * (layers + 1),
        }
    }

    /// Whether every layer starts with a time slice.
    pub fn has_time_slices(&self) -> bool {
        matches!(self, Ansatz::Generator { .. })
    }

    /// Whether the built circuits contain noise channels.
    pub fn is_noisy(&self) -> bool {
        matches!(self, Ansatz::Generator { noise: Some(_), .. })
    }

    /// Build the circuit for `params`.
    pub fn build(&self, params: &[f64]) -> VqeResult<Circuit> {
        check_parameters(self.num_parameters(), params)?;
        match self {
            Ansatz::Generator {
                label,
                layers,
                propagator,
                noise,
            } => build_generator(label, *layers, propagator, noise.as_ref(), params),
            Ansatz::HardwareEfficient { n_qubits, layers } => {
                build_hardware_efficient(*n_qubits, *layers, params)
            }
        }
    }
}

fn build_generator(
    label: &str,
    layers: usize,
    propagator: &Propagator,
    noise: Option<&NoiseChannel>,
    params: &[f64],
) -> VqeResult<Circuit> {
    let n = propagator.n_qubits();
    let register: Vec<QubitId> = (0..n).map(QubitId).collect();
    let stride = n as usize + 1;
    let mut circuit = Circuit::new(format!("{label}_ansatz"), n);

    for slice in params.chunks_exact(stride).take(layers) {
        let (t, angles) = (slice[0], &slice[1..]);

        for (&q, &theta) in register.iter().zip(angles) {
            circuit.ry(theta, q)?;
            if let Some(channel) = noise {
                circuit.noise(*channel, q)?;
            }
        }

        let evolution = UnitaryGate::new(format!("U_{label}({t:.3})"), n, propagator.unitary(t))?;
        circuit.unitary(evolution, &register)?;
        if let Some(channel) = noise {
            for &q in &register {
                circuit.noise(*channel, q)?;
            }
        }
    }

    Ok(circuit)
}

fn build_hardware_efficient(n_qubits: u32, layers: usize, params: &[f64]) -> VqeResult<Circuit> {
    let mut circuit = Circuit::new("hardware_efficient", n_qubits);
    let mut blocks = params.chunks_exact(2 * n_qubits as usize);

    if let Some(block) = blocks.next() {
        rotation_block(&mut circuit, block)?;
    }
    for block in blocks.take(layers) {
        // Linear CZ entangler
        for q in 0..n_qubits.saturating_sub(1) {
            circuit.cz(QubitId(q), QubitId(q + 1))?;
        }
        rotation_block(&mut circuit, block)?;
    }

    Ok(circuit)
}

/// RY then RZ on every qubit, two parameters per qubit.
fn rotation_block(circuit: &mut Circuit, block: &[f64]) -> VqeResult<()> {
    for (q, pair) in block.chunks_exact(2).enumerate() {
        let qubit = QubitId(q as u32);
        circuit.ry(pair[0], qubit)?.rz(pair[1], qubit)?;
    }
    Ok(())
}
