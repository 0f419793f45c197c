//! Optimisation loop.
//!
//! A run performs `restarts` independent minimisations of the cost from
//! fresh (or fixed) starting points and reports the minimum cost seen in
//! each, next to the exact ground energy of the observable.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use spinvqe_ir::Circuit;
use spinvqe_opt::{ConstraintSet, Optimizer};

use crate::config::RunConfig;
use crate::constraints::time_constraints;
use crate::cost::CostEvaluator;
use crate::error::VqeResult;
use crate::params::initial_params;

/// Result of a single restart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestartOutcome {
    /// Smallest cost reported by the optimizer callback.
    pub min_cost: f64,
    /// Optimizer's final point.
    pub final_params: Vec<f64>,
    /// Cost after every optimizer iteration, this restart only.
    pub history: Vec<f64>,
    pub converged: bool,
    pub iterations: usize,
    pub evaluations: usize,
    /// Optimizer termination message.
    pub message: String,
}

/// Result of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Number of ansatz layers used.
    pub layers: usize,
    /// Exact ground energy of the Ising observable.
    pub exact_energy: f64,
    /// One entry per restart, in order.
    pub restarts: Vec<RestartOutcome>,
    /// Ansatz circuit at the final parameters of the last restart.
    #[serde(skip)]
    pub last_circuit: Option<Circuit>,
}

impl RunReport {
    /// Minimum cost of each restart.
    pub fn min_costs(&self) -> Vec<f64> {
        self.restarts.iter().map(|r| r.min_cost).collect()
    }

    /// Final parameters of each restart.
    pub fn optimized_params(&self) -> Vec<Vec<f64>> {
        self.restarts
            .iter()
            .map(|r| r.final_params.clone())
            .collect()
    }

    /// Lowest cost over all restarts.
    pub fn best_cost(&self) -> Option<f64> {
        self.restarts.iter().map(|r| r.min_cost).reduce(f64::min)
    }

    /// Report as pretty-printed JSON (without the circuit).
    pub fn to_json(&self) -> VqeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Drives restarts of the optimizer over one configuration.
#[derive(Debug, Clone)]
pub struct VqeRunner {
    config: RunConfig,
}

impl VqeRunner {
    /// Create a runner; the configuration is validated up front.
    pub fn new(config: RunConfig) -> VqeResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration being run.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every restart.
    pub fn run(&self) -> VqeResult<RunReport> {
        self.run_with_progress(|_, _| {})
    }

    /// Run every restart, calling `progress(index, outcome)` after each.
    ///
    /// The first error aborts the run; no partial report is produced.
    pub fn run_with_progress<P>(&self, mut progress: P) -> VqeResult<RunReport>
    where
        P: FnMut(usize, &RestartOutcome),
    {
        let config = &self.config;
        let mut evaluator = CostEvaluator::new(config)?;
        let exact_energy = evaluator.exact_energy()?;
        let solver = config
            .optimizer
            .method
            .solver(config.optimizer.maxiter, config.optimizer.ftol);

        let constraints = self.constraints(&evaluator, solver.supports_constraints())?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            n_qubits = config.n_qubits,
            layers = config.layers,
            restarts = config.restarts,
            optimizer = %config.optimizer.method,
            workflow = %config.workflow,
            exact_energy,
            "Starting run"
        );

        let mut restarts = Vec::with_capacity(config.restarts);
        for index in 0..config.restarts {
            let x0 = initial_params(
                &config.initial_params,
                config.ansatz,
                config.n_qubits,
                config.layers,
                (config.ti, config.tf),
                &mut rng,
            )?;

            let mut history = Vec::new();
            let result = solver.minimize(
                |x: &[f64]| evaluator.cost(x),
                x0,
                &constraints,
                |it| history.push(it.fun),
            )?;

            let min_cost = history.iter().copied().reduce(f64::min).unwrap_or(result.fun);
            if !result.converged {
                warn!(
                    restart = index,
                    iterations = result.iterations,
                    message = %result.message,
                    "Optimizer did not converge"
                );
            }
            debug!(
                restart = index,
                min_cost,
                iterations = result.iterations,
                evaluations = result.evaluations,
                "Restart finished"
            );

            let outcome = RestartOutcome {
                min_cost,
                final_params: result.x,
                history,
                converged: result.converged,
                iterations: result.iterations,
                evaluations: result.evaluations,
                message: result.message,
            };
            progress(index, &outcome);
            restarts.push(outcome);
        }

        let last_circuit = match restarts.last() {
            Some(last) => Some(evaluator.evaluate(&last.final_params)?.circuit),
            None => None,
        };

        let report = RunReport {
            layers: config.layers,
            exact_energy,
            restarts,
            last_circuit,
        };
        info!(
            best_cost = report.best_cost(),
            exact_energy,
            evaluations = evaluator.evaluations(),
            "Run finished"
        );
        Ok(report)
    }

    fn constraints(
        &self,
        evaluator: &CostEvaluator,
        optimizer_supports: bool,
    ) -> VqeResult<ConstraintSet> {
        let config = &self.config;
        if !config.constraints {
            return Ok(ConstraintSet::new());
        }
        if !evaluator.ansatz().has_time_slices() {
            info!(ansatz = %config.ansatz, "Ansatz has no time slices; constraints ignored");
            return Ok(ConstraintSet::new());
        }
        if !optimizer_supports {
            info!(
                optimizer = %config.optimizer.method,
                "Optimizer does not support constraints; constraints ignored"
            );
            return Ok(ConstraintSet::new());
        }
        time_constraints(
            config.layers,
            evaluator.num_parameters(),
            config.total_time(),
        )
    }
}

/// Run `config` for `count` consecutive layer counts starting at
/// `config.layers`.
pub fn sweep_layers(config: &RunConfig, count: usize) -> VqeResult<Vec<RunReport>> {
    (0..count)
        .map(|offset| {
            let config = RunConfig {
                layers: config.layers + offset,
                ..config.clone()
            };
            VqeRunner::new(config)?.run()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnsatzKind, InitialParams};
    use spinvqe_opt::Method;

    fn quick_config() -> RunConfig {
        let mut config = RunConfig {
            n_qubits: 2,
            layers: 1,
            ti: 0.0,
            tf: 1.0,
            restarts: 2,
            seed: Some(42),
            ..RunConfig::default()
        };
        config.optimizer.maxiter = 60;
        config
    }

    #[test]
    fn test_report_shape() {
        let report = VqeRunner::new(quick_config()).unwrap().run().unwrap();
        assert_eq!(report.restarts.len(), 2);
        assert_eq!(report.min_costs().len(), 2);
        assert_eq!(report.optimized_params().len(), 2);
        assert!(report.optimized_params().iter().all(|p| p.len() == 3));
        assert!(report.last_circuit.is_some());
        assert_eq!(report.layers, 1);
    }

    #[test]
    fn test_history_is_per_restart() {
        let report = VqeRunner::new(quick_config()).unwrap().run().unwrap();
        for outcome in &report.restarts {
            assert_eq!(outcome.history.len(), outcome.iterations);
            if let Some(min) = outcome.history.iter().copied().reduce(f64::min) {
                assert_eq!(outcome.min_cost, min);
            }
        }
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let runner = VqeRunner::new(quick_config()).unwrap();
        let a = runner.run().unwrap();
        let b = runner.run().unwrap();
        assert_eq!(a.restarts, b.restarts);
    }

    #[test]
    fn test_variational_bound() {
        let report = VqeRunner::new(quick_config()).unwrap().run().unwrap();
        for cost in report.min_costs() {
            assert!(cost >= report.exact_energy - 1e-9);
        }
    }

    #[test]
    fn test_nelder_mead_hardware_efficient() {
        let mut config = quick_config();
        config.ansatz = AnsatzKind::HardwareEfficient;
        config.optimizer.method = Method::NelderMead;
        config.optimizer.maxiter = 40;
        config.restarts = 1;
        let report = VqeRunner::new(config).unwrap().run().unwrap();
        assert_eq!(report.restarts[0].final_params.len(), 8);
    }

    #[test]
    fn test_bad_fixed_params_abort_run() {
        let mut config = quick_config();
        config.initial_params = InitialParams::Fixed(vec![0.0; 5]);
        let mut seen = 0;
        let result = VqeRunner::new(config)
            .unwrap()
            .run_with_progress(|_, _| seen += 1);
        assert!(result.is_err());
        assert_eq!(seen, 0);
    }

    #[test]
    fn test_report_json_omits_circuit() {
        let report = VqeRunner::new(quick_config()).unwrap().run().unwrap();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["restarts"].as_array().unwrap().len(), 2);
        assert!(value.get("last_circuit").is_none());
    }

    #[test]
    fn test_sweep_layers() {
        let mut config = quick_config();
        config.restarts = 1;
        let reports = sweep_layers(&config, 2).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].layers, 1);
        assert_eq!(reports[1].layers, 2);
        assert_eq!(reports[1].restarts[0].final_params.len(), 6);
    }
}
