//! `spinvqe`: variational ground-state search for 1-D spin chains.
//!
//! A run minimises the energy of the transverse-field Ising chain over a
//! layered ansatz whose entangling steps are time evolutions under an XY
//! (or Ising) generator. The same loop backs the zero-noise-extrapolation
//! workflow, where noise channels are required in the ansatz.
//!
//! ```text
//! RunConfig ──► VqeRunner ──► restarts × Optimizer::minimize
//!                                  │
//!                                  ▼
//!                          CostEvaluator::evaluate
//!                   (Ansatz::build → QuantumState → ⟨H_ising⟩)
//! ```
//!
//! # Example
//!
//! ```rust
//! use spinvqe::{RunConfig, VqeRunner};
//!
//! let mut config = RunConfig {
//!     n_qubits: 2,
//!     layers: 1,
//!     restarts: 1,
//!     seed: Some(3),
//!     ..RunConfig::default()
//! };
//! config.optimizer.maxiter = 20;
//!
//! let report = VqeRunner::new(config).unwrap().run().unwrap();
//! assert_eq!(report.min_costs().len(), 1);
//! assert!(report.min_costs()[0] >= report.exact_energy - 1e-9);
//! ```

pub mod ansatz;
pub mod config;
pub mod constraints;
pub mod cost;
pub mod diagnostics;
pub mod error;
pub mod params;
pub mod runner;

pub use ansatz::{Ansatz, num_parameters};
pub use config::{
    AnsatzKind, ChannelKind, DrawConfig, InitialParams, NoiseConfig, OptimizerConfig, RunConfig,
    Workflow,
};
pub use constraints::time_constraints;
pub use cost::{CostEvaluator, Evaluation};
pub use diagnostics::{draw_circuit, render_ascii, render_svg};
pub use error::{VqeError, VqeResult};
pub use params::initial_params;
pub use runner::{RestartOutcome, RunReport, VqeRunner, sweep_layers};

// Re-exported so callers can configure runs without naming the lower crates.
pub use spinvqe_opt::Method;
pub use spinvqe_sim::{Boundary, StateKind};
