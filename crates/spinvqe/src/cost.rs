//! Cost evaluation: ansatz → simulated state → Ising energy.
//!
//! Each call runs the same three steps from scratch. A fresh `|0…0⟩` state is
//! allocated, the ansatz circuit for the current parameters is built and
//! applied, and the Ising observable is read off. The circuit is handed back
//! with the energy so callers can keep the last one for diagnostics.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace, warn};

use spinvqe_ir::Circuit;
use spinvqe_sim::{
    Hamiltonian, QuantumState, StateKind, ground_state_energy, ising_hamiltonian, xy_hamiltonian,
};

use crate::ansatz::Ansatz;
use crate::config::{AnsatzKind, RunConfig};
use crate::error::VqeResult;

/// Outcome of one cost evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// `⟨H_ising⟩` in the prepared state.
    pub energy: f64,
    /// The circuit that prepared it.
    pub circuit: Circuit,
}

/// Evaluates the Ising energy of ansatz states.
#[derive(Debug)]
pub struct CostEvaluator {
    ansatz: Ansatz,
    observable: Hamiltonian,
    state: StateKind,
    // Only consumed when sampling noise trajectories
    rng: StdRng,
    evaluations: usize,
}

impl CostEvaluator {
    /// Validate `config` and prepare the Hamiltonians and ansatz.
    ///
    /// The ansatz variant (generator kind, noisy or not) is fixed here.
    pub fn new(config: &RunConfig) -> VqeResult<Self> {
        config.validate()?;

        let n = config.n_qubits;
        let observable = ising_hamiltonian(n, config.coupling, config.field, config.boundary)?;

        // validate() has already rejected a noiseless zne generator run
        let noise = config.is_noisy().then(|| config.noise.channel());

        let ansatz = match config.ansatz {
            AnsatzKind::Xy => {
                let generator = xy_hamiltonian(
                    n,
                    config.coupling,
                    config.field,
                    config.anisotropy,
                    config.boundary,
                )?;
                Ansatz::generator("xy", &generator, config.layers, noise)?
            }
            AnsatzKind::Ising => Ansatz::generator("ising", &observable, config.layers, noise)?,
            AnsatzKind::HardwareEfficient => {
                if config.noise.enabled {
                    warn!("Noise is not applied to the hardware-efficient ansatz");
                }
                Ansatz::hardware_efficient(n, config.layers)?
            }
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };

        debug!(
            n_qubits = n,
            layers = config.layers,
            ansatz = %config.ansatz,
            state = %config.state,
            noisy = ansatz.is_noisy(),
            n_params = ansatz.num_parameters(),
            "Cost evaluator ready"
        );

        Ok(Self {
            ansatz,
            observable,
            state: config.state,
            rng,
            evaluations: 0,
        })
    }

    /// The ansatz in use.
    pub fn ansatz(&self) -> &Ansatz {
        &self.ansatz
    }

    /// The Ising observable.
    pub fn observable(&self) -> &Hamiltonian {
        &self.observable
    }

    /// Expected parameter vector length.
    pub fn num_parameters(&self) -> usize {
        self.ansatz.num_parameters()
    }

    /// Evaluations performed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Exact ground energy of the observable.
    pub fn exact_energy(&self) -> VqeResult<f64> {
        Ok(ground_state_energy(&self.observable)?)
    }

    /// Prepare the ansatz state for `params` and measure the observable.
    pub fn evaluate(&mut self, params: &[f64]) -> VqeResult<Evaluation> {
        let mut state = QuantumState::new(self.state, self.ansatz.num_qubits());
        let circuit = self.ansatz.build(params)?;
        state.apply_circuit(&circuit, &mut self.rng)?;
        let energy = state.expectation(&self.observable)?;

        self.evaluations += 1;
        trace!(evaluation = self.evaluations, energy, "Cost evaluated");
        Ok(Evaluation { energy, circuit })
    }

    /// Energy only.
    pub fn cost(&mut self, params: &[f64]) -> VqeResult<f64> {
        self.evaluate(params).map(|e| e.energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Workflow;
    use crate::error::VqeError;
    use approx::assert_relative_eq;
    use spinvqe_sim::Boundary;

    fn small_config() -> RunConfig {
        RunConfig {
            n_qubits: 2,
            layers: 1,
            restarts: 1,
            seed: Some(1),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_zero_time_is_rotation_only() {
        let mut evaluator = CostEvaluator::new(&small_config()).unwrap();
        let (a, b) = (0.4f64, -1.1f64);
        let energy = evaluator.cost(&[0.0, a, b]).unwrap();
        assert_relative_eq!(
            energy,
            a.cos() * b.cos() + a.sin() + b.sin(),
            epsilon = 1e-10
        );
        assert_eq!(evaluator.evaluations(), 1);
    }

    #[test]
    fn test_noiseless_cost_is_deterministic() {
        for state in [StateKind::DensityMatrix, StateKind::Statevector] {
            let config = RunConfig {
                n_qubits: 3,
                layers: 2,
                state,
                ..small_config()
            };
            let mut evaluator = CostEvaluator::new(&config).unwrap();
            let params = [0.7, 0.1, -0.4, 1.2, 0.3, 0.9, 0.0, -2.0];
            let first = evaluator.cost(&params).unwrap();
            let second = evaluator.cost(&params).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_representations_agree_without_noise() {
        let params = [0.9, 0.3, -0.2, 1.4, 0.5, 0.1];
        let mut energies = Vec::new();
        for state in [StateKind::DensityMatrix, StateKind::Statevector] {
            let config = RunConfig {
                layers: 2,
                ansatz: AnsatzKind::Ising,
                state,
                ..small_config()
            };
            energies.push(CostEvaluator::new(&config).unwrap().cost(&params).unwrap());
        }
        assert_relative_eq!(energies[0], energies[1], epsilon = 1e-10);
    }

    #[test]
    fn test_zne_without_noise_fails_fast() {
        let config = RunConfig {
            workflow: Workflow::Zne,
            ..small_config()
        };
        assert!(matches!(
            CostEvaluator::new(&config),
            Err(VqeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_oversized_register_is_an_error() {
        let config = RunConfig {
            n_qubits: 64,
            ..small_config()
        };
        assert!(matches!(
            CostEvaluator::new(&config),
            Err(VqeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_noise_raises_energy_above_ground() {
        let mut config = small_config();
        config.noise.enabled = true;
        config.noise.probability = 0.2;
        let mut noisy = CostEvaluator::new(&config).unwrap();
        assert!(noisy.ansatz().is_noisy());

        let exact = noisy.exact_energy().unwrap();
        let evaluation = noisy.evaluate(&[0.5, -1.2, -1.2]).unwrap();
        assert!(evaluation.energy >= exact - 1e-10);
        assert_eq!(evaluation.circuit.num_noise_channels(), 4);
    }

    #[test]
    fn test_hardware_efficient_ignores_noise() {
        let mut config = RunConfig {
            ansatz: AnsatzKind::HardwareEfficient,
            workflow: Workflow::Zne,
            ..small_config()
        };
        config.noise.enabled = true;
        config.noise.probability = 0.1;
        let mut evaluator = CostEvaluator::new(&config).unwrap();
        assert!(!evaluator.ansatz().is_noisy());
        assert_eq!(evaluator.num_parameters(), 8);
        let evaluation = evaluator.evaluate(&[0.0; 8]).unwrap();
        assert_eq!(evaluation.circuit.num_noise_channels(), 0);
        // |00⟩: ⟨ZZ⟩ = 1, ⟨X⟩ = 0
        assert_relative_eq!(evaluation.energy, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parameter_mismatch() {
        let mut evaluator = CostEvaluator::new(&small_config()).unwrap();
        assert!(matches!(
            evaluator.cost(&[0.0; 4]),
            Err(VqeError::ParameterCountMismatch {
                expected: 3,
                got: 4
            })
        ));
        assert_eq!(evaluator.evaluations(), 0);
    }

    #[test]
    fn test_exact_energy_matches_observable() {
        let evaluator = CostEvaluator::new(&small_config()).unwrap();
        let observable = ising_hamiltonian(2, 1.0, 1.0, Boundary::Open).unwrap();
        assert_eq!(evaluator.observable(), &observable);
        let reference = ground_state_energy(&observable).unwrap();
        assert_relative_eq!(evaluator.exact_energy().unwrap(), reference, epsilon = 1e-12);
        assert_relative_eq!(reference, -(5.0f64.sqrt()), epsilon = 1e-10);
    }
}
