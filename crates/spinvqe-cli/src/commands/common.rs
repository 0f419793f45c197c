//! Shared helpers for CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use spinvqe::{
    AnsatzKind, Boundary, ChannelKind, InitialParams, Method, RunConfig, StateKind, Workflow,
};

/// Directory circuit diagrams are written to.
pub const OUTPUT_DIR: &str = "output";

/// Run configuration flags. Every flag overrides the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of qubits (chain sites)
    #[arg(short = 'n', long)]
    pub qubits: Option<u32>,

    /// Number of ansatz layers
    #[arg(short, long)]
    pub layers: Option<usize>,

    /// Start of the evolution window
    #[arg(long, allow_hyphen_values = true)]
    pub ti: Option<f64>,

    /// End of the evolution window
    #[arg(long, allow_hyphen_values = true)]
    pub tf: Option<f64>,

    /// Coupling constant (cn)
    #[arg(long, allow_hyphen_values = true)]
    pub coupling: Option<f64>,

    /// Field constant (bn)
    #[arg(long, allow_hyphen_values = true)]
    pub field: Option<f64>,

    /// XY anisotropy (r)
    #[arg(long, allow_hyphen_values = true)]
    pub anisotropy: Option<f64>,

    /// Close the chain into a ring
    #[arg(long)]
    pub periodic: bool,

    /// Independent optimisation restarts
    #[arg(short, long)]
    pub restarts: Option<usize>,

    /// Optimizer (slsqp, nelder-mead)
    #[arg(short, long)]
    pub optimizer: Option<String>,

    /// Optimizer iteration cap
    #[arg(long)]
    pub maxiter: Option<usize>,

    /// Optimizer function tolerance
    #[arg(long)]
    pub ftol: Option<f64>,

    /// Do not constrain the time slices
    #[arg(long)]
    pub no_constraints: bool,

    /// Ansatz (xy, ising, hardware)
    #[arg(short, long)]
    pub ansatz: Option<String>,

    /// State representation (statevector, density)
    #[arg(long)]
    pub state: Option<String>,

    /// Enable noise with this base probability
    #[arg(long)]
    pub noise: Option<f64>,

    /// Noise channel (depolarizing, bit-flip, phase-flip)
    #[arg(long)]
    pub noise_channel: Option<String>,

    /// Noise scaling factor
    #[arg(long)]
    pub noise_factor: Option<f64>,

    /// Zero-noise-extrapolation workflow (requires noise for generator ansätze)
    #[arg(long)]
    pub zne: bool,

    /// Fixed initial parameters, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub params: Option<Vec<f64>>,

    /// RNG seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Diagram resolution
    #[arg(long)]
    pub dpi: Option<u32>,
}

impl RunArgs {
    /// Load the configuration file (or defaults) and apply the flags.
    pub fn load(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => RunConfig::default(),
        };
        self.apply(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut RunConfig) -> Result<()> {
        if let Some(n) = self.qubits {
            config.n_qubits = n;
        }
        if let Some(layers) = self.layers {
            config.layers = layers;
        }
        if let Some(ti) = self.ti {
            config.ti = ti;
        }
        if let Some(tf) = self.tf {
            config.tf = tf;
        }
        if let Some(cn) = self.coupling {
            config.coupling = cn;
        }
        if let Some(bn) = self.field {
            config.field = bn;
        }
        if let Some(r) = self.anisotropy {
            config.anisotropy = r;
        }
        if self.periodic {
            config.boundary = Boundary::Periodic;
        }
        if let Some(restarts) = self.restarts {
            config.restarts = restarts;
        }
        if let Some(name) = &self.optimizer {
            config.optimizer.method = name.parse::<Method>()?;
        }
        if let Some(maxiter) = self.maxiter {
            config.optimizer.maxiter = maxiter;
        }
        if let Some(ftol) = self.ftol {
            config.optimizer.ftol = ftol;
        }
        if self.no_constraints {
            config.constraints = false;
        }
        if let Some(name) = &self.ansatz {
            config.ansatz = parse_ansatz(name)?;
        }
        if let Some(name) = &self.state {
            config.state = parse_state(name)?;
        }
        if let Some(p) = self.noise {
            config.noise.enabled = true;
            config.noise.probability = p;
        }
        if let Some(name) = &self.noise_channel {
            config.noise.channel = parse_channel(name)?;
        }
        if let Some(factor) = self.noise_factor {
            config.noise.factor = factor;
        }
        if self.zne {
            config.workflow = Workflow::Zne;
        }
        if let Some(params) = &self.params {
            config.initial_params = InitialParams::Fixed(params.clone());
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(dpi) = self.dpi {
            config.draw.dpi = dpi;
        }
        Ok(())
    }
}

/// Parse an ansatz name.
pub fn parse_ansatz(name: &str) -> Result<AnsatzKind> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "xy" => Ok(AnsatzKind::Xy),
        "ising" => Ok(AnsatzKind::Ising),
        "hardware" | "he" | "hardware_efficient" => Ok(AnsatzKind::HardwareEfficient),
        other => anyhow::bail!("Unknown ansatz: '{other}'. Available: xy, ising, hardware"),
    }
}

/// Parse a state representation name.
pub fn parse_state(name: &str) -> Result<StateKind> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "statevector" | "sv" | "vector" => Ok(StateKind::Statevector),
        "density" | "dm" | "dmatrix" | "density_matrix" => Ok(StateKind::DensityMatrix),
        other => anyhow::bail!("Unknown state: '{other}'. Available: statevector, density"),
    }
}

/// Parse a noise channel name.
pub fn parse_channel(name: &str) -> Result<ChannelKind> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "depolarizing" | "depolarising" => Ok(ChannelKind::Depolarizing),
        "bit_flip" | "bitflip" => Ok(ChannelKind::BitFlip),
        "phase_flip" | "phaseflip" | "dephasing" => Ok(ChannelKind::PhaseFlip),
        other => anyhow::bail!(
            "Unknown noise channel: '{other}'. Available: depolarizing, bit-flip, phase-flip"
        ),
    }
}

/// Format a parameter vector compactly.
pub fn format_params(params: &[f64]) -> String {
    let items: Vec<String> = params.iter().map(|p| format!("{p:.4}")).collect();
    format!("[{}]", items.join(", "))
}
