//! Run configuration.
//!
//! A [`RunConfig`] is loaded from a YAML file (every field optional) and then
//! overridden field by field from the command line. Precedence, highest
//! first:
//! 1. Command-line flags
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use spinvqe_ir::NoiseChannel;
use spinvqe_opt::Method;
use spinvqe_sim::{Boundary, MAX_DENSE_QUBITS, StateKind};

use crate::error::{VqeError, VqeResult};

/// Ansatz topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnsatzKind {
    /// RY layer followed by `exp(−i t H_xy)`.
    #[default]
    Xy,
    /// RY layer followed by `exp(−i t H_ising)`.
    Ising,
    /// RY/RZ rotations with CZ chains; no Hamiltonian.
    #[serde(alias = "hardware")]
    HardwareEfficient,
}

impl AnsatzKind {
    /// Whether the ansatz interleaves time-evolution steps.
    pub fn has_time_slices(&self) -> bool {
        !matches!(self, AnsatzKind::HardwareEfficient)
    }
}

impl fmt::Display for AnsatzKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnsatzKind::Xy => write!(f, "xy"),
            AnsatzKind::Ising => write!(f, "ising"),
            AnsatzKind::HardwareEfficient => write!(f, "hardware_efficient"),
        }
    }
}

/// Plain VQE or the noisy zero-noise-extrapolation variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    /// Noise optional.
    #[default]
    Vqe,
    /// Generator ansätze must be noisy.
    Zne,
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workflow::Vqe => write!(f, "vqe"),
            Workflow::Zne => write!(f, "zne"),
        }
    }
}

/// Where each restart starts from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialParams {
    /// Fresh random draw per restart.
    #[default]
    Random,
    /// The same vector on every restart.
    Fixed(Vec<f64>),
}

/// Noise channel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Uniform X/Y/Z errors.
    #[default]
    Depolarizing,
    /// X errors.
    BitFlip,
    /// Z errors.
    PhaseFlip,
}

/// Optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// `slsqp` or `nelder_mead`
    #[serde(default)]
    pub method: Method,

    #[serde(default = "default_maxiter")]
    pub maxiter: usize,

    /// Function tolerance
    #[serde(default = "default_ftol")]
    pub ftol: f64,
}

/// Noise model for the generator ansätze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub channel: ChannelKind,

    /// Base error probability per channel application
    #[serde(default)]
    pub probability: f64,

    /// Multiplier applied to `probability` (ZNE noise scaling)
    #[serde(default = "default_noise_factor")]
    pub factor: f64,
}

impl NoiseConfig {
    /// The scaled channel inserted into the circuit.
    pub fn channel(&self) -> NoiseChannel {
        let base = match self.channel {
            ChannelKind::Depolarizing => NoiseChannel::Depolarizing {
                p: self.probability,
            },
            ChannelKind::BitFlip => NoiseChannel::BitFlip {
                p: self.probability,
            },
            ChannelKind::PhaseFlip => NoiseChannel::PhaseFlip {
                p: self.probability,
            },
        };
        base.scaled(self.factor)
    }
}

/// Circuit diagram output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

/// Complete description of one optimisation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Chain length
    pub n_qubits: u32,
    /// Ansatz repetitions
    pub layers: usize,
    /// Start of the evolution window
    pub ti: f64,
    /// End of the evolution window
    pub tf: f64,
    /// Nearest-neighbour coupling (cn)
    pub coupling: f64,
    /// On-site field (bn)
    pub field: f64,
    /// XY anisotropy (r)
    pub anisotropy: f64,
    pub boundary: Boundary,
    /// Independent optimisation restarts
    pub restarts: usize,
    pub optimizer: OptimizerConfig,
    /// Enforce the time-slice constraints when the optimizer supports them
    pub constraints: bool,
    pub ansatz: AnsatzKind,
    pub state: StateKind,
    pub noise: NoiseConfig,
    pub workflow: Workflow,
    pub initial_params: InitialParams,
    /// RNG seed; `None` draws from entropy
    pub seed: Option<u64>,
    pub draw: DrawConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_qubits: 7,
            layers: 10,
            ti: 0.0,
            tf: 10.0,
            coupling: 1.0,
            field: 1.0,
            anisotropy: 0.0,
            boundary: Boundary::Open,
            restarts: 10,
            optimizer: OptimizerConfig::default(),
            constraints: true,
            ansatz: AnsatzKind::Xy,
            state: StateKind::DensityMatrix,
            noise: NoiseConfig::default(),
            workflow: Workflow::Vqe,
            initial_params: InitialParams::Random,
            seed: None,
            draw: DrawConfig::default(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            method: Method::Slsqp,
            maxiter: default_maxiter(),
            ftol: default_ftol(),
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel: ChannelKind::Depolarizing,
            probability: 0.0,
            factor: default_noise_factor(),
        }
    }
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dpi: default_dpi(),
        }
    }
}

fn default_maxiter() -> usize {
    spinvqe_opt::DEFAULT_MAXITER
}

fn default_ftol() -> f64 {
    1e-6
}

fn default_noise_factor() -> f64 {
    1.0
}

fn default_dpi() -> u32 {
    150
}

impl RunConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> VqeResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: RunConfig = serde_yaml_ng::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Length of the evolution window, `tf − ti`.
    pub fn total_time(&self) -> f64 {
        self.tf - self.ti
    }

    /// Whether the circuit will contain noise channels.
    pub fn is_noisy(&self) -> bool {
        self.noise.enabled && self.ansatz.has_time_slices()
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> VqeResult<()> {
        let invalid = |msg: String| Err(VqeError::InvalidConfiguration(msg));

        if self.n_qubits == 0 {
            return invalid("n_qubits must be at least 1".into());
        }
        // the exact energy is always diagonalised densely
        let max_qubits = self.state.max_qubits().min(MAX_DENSE_QUBITS);
        if self.n_qubits > max_qubits {
            return invalid(format!(
                "n_qubits = {} exceeds the limit of {max_qubits} for the {} state",
                self.n_qubits, self.state
            ));
        }
        if self.layers == 0 {
            return invalid("layers must be at least 1".into());
        }
        if self.restarts == 0 {
            return invalid("restarts must be at least 1".into());
        }
        if self.optimizer.maxiter == 0 {
            return invalid("optimizer.maxiter must be at least 1".into());
        }
        if !(self.optimizer.ftol.is_finite() && self.optimizer.ftol > 0.0) {
            return invalid(format!(
                "optimizer.ftol must be positive, got {}",
                self.optimizer.ftol
            ));
        }

        for (name, value) in [
            ("ti", self.ti),
            ("tf", self.tf),
            ("coupling", self.coupling),
            ("field", self.field),
            ("anisotropy", self.anisotropy),
        ] {
            if !value.is_finite() {
                return invalid(format!("{name} must be finite, got {value}"));
            }
        }
        if self.tf < self.ti {
            return invalid(format!(
                "tf ({}) must not be smaller than ti ({})",
                self.tf, self.ti
            ));
        }

        if self.noise.enabled {
            if !(self.noise.factor.is_finite() && self.noise.factor >= 0.0) {
                return invalid(format!(
                    "noise.factor must be non-negative, got {}",
                    self.noise.factor
                ));
            }
            let channel = self.noise.channel();
            if channel.validate().is_err() {
                return invalid(format!(
                    "noise probability {} x factor {} = {} is outside [0, 1]",
                    self.noise.probability,
                    self.noise.factor,
                    channel.probability()
                ));
            }
        }

        if self.workflow == Workflow::Zne && self.ansatz.has_time_slices() && !self.noise.enabled
        {
            return invalid(format!(
                "the zne workflow needs noise enabled for the {} ansatz",
                self.ansatz
            ));
        }

        if let InitialParams::Fixed(values) = &self.initial_params {
            if let Some(v) = values.iter().find(|v| !v.is_finite()) {
                return invalid(format!("initial parameter {v} is not finite"));
            }
        }

        if self.draw.dpi == 0 {
            return invalid("draw.dpi must be positive".into());
        }

        Ok(())
    }
}
