//! Nelder-Mead downhill simplex.
//!
//! Derivative-free and unconstrained. Useful when the cost is noisy (for
//! example trajectory-sampled state vectors) and finite-difference
//! gradients would be meaningless.

use tracing::{debug, warn};

use crate::constraint::ConstraintSet;
use crate::error::OptError;
use crate::{DEFAULT_MAXITER, Iterate, OptimizationResult, Optimizer};

/// Nelder-Mead optimizer configuration.
#[derive(Debug, Clone)]
pub struct NelderMead {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Simplex size tolerance.
    pub xatol: f64,
    /// Objective spread tolerance.
    pub fatol: f64,
    /// Relative perturbation for the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            maxiter: DEFAULT_MAXITER,
            xatol: 1e-4,
            fatol: 1e-4,
            initial_step: 0.05,
        }
    }
}

impl NelderMead {
    /// Create a new Nelder-Mead optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set the objective spread tolerance.
    pub fn with_fatol(mut self, fatol: f64) -> Self {
        self.fatol = fatol;
        self
    }

    /// Set the simplex size tolerance.
    pub fn with_xatol(mut self, xatol: f64) -> Self {
        self.xatol = xatol;
        self
    }
}

// Standard reflection, expansion, contraction and shrink coefficients
const ALPHA: f64 = 1.0;
const GAMMA: f64 = 2.0;
const RHO: f64 = 0.5;
const SIGMA: f64 = 0.5;

fn affine(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    // a + t·(b − a)
    a.iter().zip(b).map(|(ai, bi)| ai + t * (bi - ai)).collect()
}

impl Optimizer for NelderMead {
    fn name(&self) -> &'static str {
        "Nelder-Mead"
    }

    fn supports_constraints(&self) -> bool {
        false
    }

    fn minimize<F, C, E>(
        &self,
        mut objective: F,
        x0: Vec<f64>,
        constraints: &ConstraintSet,
        mut callback: C,
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
        C: FnMut(&Iterate<'_>),
        E: From<OptError>,
    {
        let n = x0.len();
        if n == 0 {
            return Err(OptError::EmptyParameters.into());
        }
        if !constraints.is_empty() {
            warn!(
                n_constraints = constraints.len(),
                "Nelder-Mead ignores constraints"
            );
        }

        let mut evaluations = 0usize;
        let mut eval = |x: &[f64]| -> Result<f64, E> {
            evaluations += 1;
            objective(x)
        };

        // Initial simplex
        let mut simplex: Vec<Vec<f64>> = vec![x0.clone()];
        for i in 0..n {
            let mut point = x0.clone();
            point[i] = if point[i] != 0.0 {
                (1.0 + self.initial_step) * point[i]
            } else {
                0.00025
            };
            simplex.push(point);
        }
        let mut values = Vec::with_capacity(n + 1);
        for point in &simplex {
            values.push(eval(point)?);
        }

        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.maxiter {
            // Sort simplex by function value
            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
            simplex = order.iter().map(|&i| simplex[i].clone()).collect();
            values = order.iter().map(|&i| values[i]).collect();

            let x_spread = simplex[1..]
                .iter()
                .flat_map(|p| p.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
                .fold(0.0, f64::max);
            let f_spread = values[1..]
                .iter()
                .map(|v| (v - values[0]).abs())
                .fold(0.0, f64::max);
            if x_spread <= self.xatol && f_spread <= self.fatol {
                converged = true;
                break;
            }

            // Centroid of all points except the worst
            let mut centroid = vec![0.0; n];
            for point in &simplex[..n] {
                for (c, v) in centroid.iter_mut().zip(point) {
                    *c += v / n as f64;
                }
            }

            let worst = simplex[n].clone();
            let reflected = affine(&centroid, &worst, -ALPHA);
            let f_reflected = eval(&reflected)?;

            if f_reflected < values[0] {
                let expanded = affine(&centroid, &worst, -GAMMA);
                let f_expanded = eval(&expanded)?;
                if f_expanded < f_reflected {
                    simplex[n] = expanded;
                    values[n] = f_expanded;
                } else {
                    simplex[n] = reflected;
                    values[n] = f_reflected;
                }
            } else if f_reflected < values[n - 1] {
                simplex[n] = reflected;
                values[n] = f_reflected;
            } else {
                let (contracted, f_contracted, accept) = if f_reflected < values[n] {
                    let c = affine(&centroid, &reflected, RHO);
                    let fc = eval(&c)?;
                    let ok = fc <= f_reflected;
                    (c, fc, ok)
                } else {
                    let c = affine(&centroid, &worst, RHO);
                    let fc = eval(&c)?;
                    let ok = fc < values[n];
                    (c, fc, ok)
                };

                if accept {
                    simplex[n] = contracted;
                    values[n] = f_contracted;
                } else {
                    // Shrink towards the best point
                    let best = simplex[0].clone();
                    for i in 1..=n {
                        simplex[i] = affine(&best, &simplex[i], SIGMA);
                        values[i] = eval(&simplex[i])?;
                    }
                }
            }

            iterations += 1;
            let best = (0..=n)
                .min_by(|&a, &b| values[a].total_cmp(&values[b]))
                .unwrap_or(0);
            callback(&Iterate {
                iteration: iterations,
                x: &simplex[best],
                fun: values[best],
            });
        }

        let best = (0..=n)
            .min_by(|&a, &b| values[a].total_cmp(&values[b]))
            .unwrap_or(0);
        let message = if converged {
            "Optimization terminated successfully"
        } else {
            "Maximum number of iterations has been exceeded"
        };
        debug!(
            iterations,
            evaluations,
            fun = values[best],
            converged,
            "Nelder-Mead finished"
        );

        Ok(OptimizationResult {
            x: simplex[best].clone(),
            fun: values[best],
            iterations,
            evaluations,
            converged,
            message: message.to_string(),
        })
    }
}
