//! Sequential quadratic programming for linearly constrained problems.
//!
//! Each iteration solves the equality-constrained QP of a quasi-Newton model
//! in closed form: the search direction is the BFGS inverse-Hessian step
//! projected onto the null space of the active constraints. Inequalities
//! enter the active set when the step would push through them and cap the
//! step length otherwise. Gradients are forward differences.
//!
//! The iterate stays feasible throughout: the starting point is projected
//! onto the constraint set before the first evaluation.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

use crate::constraint::{ConstraintSet, LinearConstraint, coefficient_matrix};
use crate::error::OptError;
use crate::{DEFAULT_MAXITER, Iterate, OptimizationResult, Optimizer};

/// Slack below which an inequality counts as being at its bound.
const ACTIVE_TOL: f64 = 1e-10;
/// Feasibility tolerance for the projected starting point.
const FEASIBILITY_TOL: f64 = 1e-10;
/// Armijo sufficient-decrease constant.
const ARMIJO_C1: f64 = 1e-4;
/// Step halvings before the line search gives up.
const MAX_BACKTRACKS: usize = 30;

/// SLSQP-style optimizer configuration.
#[derive(Debug, Clone)]
pub struct Slsqp {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Stop once an iteration improves the objective by less than this.
    pub ftol: f64,
    /// Forward-difference step.
    pub eps: f64,
}

impl Default for Slsqp {
    fn default() -> Self {
        Self {
            maxiter: DEFAULT_MAXITER,
            ftol: 1e-6,
            eps: f64::EPSILON.sqrt(),
        }
    }
}

impl Slsqp {
    /// Create a new optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set the function tolerance.
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.ftol = ftol;
        self
    }

    fn gradient<F, E>(
        &self,
        objective: &mut F,
        x: &[f64],
        fx: f64,
        evaluations: &mut usize,
    ) -> Result<DVector<f64>, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let mut probe = x.to_vec();
        let mut grad = DVector::zeros(x.len());
        for i in 0..x.len() {
            probe[i] = x[i] + self.eps;
            let f_probe = objective(&probe)?;
            *evaluations += 1;
            grad[i] = (f_probe - fx) / self.eps;
            probe[i] = x[i];
        }
        Ok(grad)
    }
}

/// P = I − Aᵀ(AAᵀ)⁺A, the projector onto the null space of `rows`.
fn null_space_projector(rows: &[&LinearConstraint], n: usize) -> Result<DMatrix<f64>, OptError> {
    let identity = DMatrix::identity(n, n);
    if rows.is_empty() {
        return Ok(identity);
    }
    let a = coefficient_matrix(rows, n);
    let gram_inv = (&a * a.transpose())
        .pseudo_inverse(1e-12)
        .map_err(|e| OptError::LinearAlgebra(e.to_string()))?;
    Ok(identity - a.transpose() * gram_inv * a)
}

/// d = −P·H·P·g
fn projected_direction(
    rows: &[&LinearConstraint],
    h: &DMatrix<f64>,
    g: &DVector<f64>,
) -> Result<DVector<f64>, OptError> {
    let p = null_space_projector(rows, g.len())?;
    Ok(-(&p * h * &p * g))
}

fn dot(a: &[f64], d: &DVector<f64>) -> f64 {
    a.iter().zip(d.iter()).map(|(ai, di)| ai * di).sum()
}

impl Optimizer for Slsqp {
    fn name(&self) -> &'static str {
        "SLSQP"
    }

    fn supports_constraints(&self) -> bool {
        true
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

        let mut x = x0;
        constraints.project(&mut x, FEASIBILITY_TOL)?;

        let mut evaluations = 1;
        let mut f = objective(&x)?;
        let mut g = self.gradient(&mut objective, &x, f, &mut evaluations)?;
        let mut h = DMatrix::<f64>::identity(n, n);
        let mut hessian_fresh = true;

        let equalities: Vec<&LinearConstraint> = constraints.equalities().collect();
        let mut iterations = 0;
        let mut converged = false;
        let mut message = "Iteration limit reached";

        while iterations < self.maxiter {
            // Working set: equalities plus bounds the step would cross
            let mut working = equalities.clone();
            let mut d = projected_direction(&working, &h, &g)?;
            loop {
                let blocking: Vec<&LinearConstraint> = constraints
                    .inequalities()
                    .filter(|c| c.slack(&x) <= ACTIVE_TOL && dot(&c.coeffs, &d) < -ACTIVE_TOL)
                    .filter(|c| !working.iter().any(|w| std::ptr::eq(*w, *c)))
                    .collect();
                if blocking.is_empty() {
                    break;
                }
                working.extend(blocking);
                d = projected_direction(&working, &h, &g)?;
            }

            let slope = g.dot(&d);
            if d.norm() < 1e-12 || slope >= 0.0 {
                if !hessian_fresh && slope >= 0.0 && d.norm() >= 1e-12 {
                    trace!(iteration = iterations, "Resetting inverse Hessian");
                    h = DMatrix::identity(n, n);
                    hessian_fresh = true;
                    continue;
                }
                converged = true;
                message = "Optimization terminated successfully";
                break;
            }

            // Predicted first-order decrease below tolerance
            if -slope < self.ftol {
                converged = true;
                message = "Optimization terminated successfully";
                break;
            }

            // Largest step that keeps every inequality satisfied
            let mut alpha_max = 1.0f64;
            for c in constraints
                .inequalities()
                .filter(|c| !working.iter().any(|w| std::ptr::eq(*w, *c)))
            {
                let rate = dot(&c.coeffs, &d);
                if rate < -ACTIVE_TOL {
                    alpha_max = alpha_max.min(c.slack(&x).max(0.0) / -rate);
                }
            }

            // Armijo backtracking
            let mut alpha = alpha_max;
            let mut accepted = None;
            for _ in 0..MAX_BACKTRACKS {
                if alpha <= 0.0 {
                    break;
                }
                let candidate: Vec<f64> = x
                    .iter()
                    .zip(d.iter())
                    .map(|(xi, di)| xi + alpha * di)
                    .collect();
                let f_candidate = objective(&candidate)?;
                evaluations += 1;
                if f_candidate <= f + ARMIJO_C1 * alpha * slope {
                    let hit_bound = alpha_max < 1.0 && alpha == alpha_max;
                    accepted = Some((candidate, f_candidate, hit_bound));
                    break;
                }
                alpha *= 0.5;
            }

            let Some((x_new, f_new, hit_bound)) = accepted else {
                if !hessian_fresh {
                    trace!(iteration = iterations, "Line search failed, resetting inverse Hessian");
                    h = DMatrix::identity(n, n);
                    hessian_fresh = true;
                    continue;
                }
                message = "Positive directional derivative for linesearch";
                break;
            };

            let g_new = self.gradient(&mut objective, &x_new, f_new, &mut evaluations)?;

            // BFGS update of the inverse Hessian
            let s = DVector::from_iterator(n, x_new.iter().zip(&x).map(|(a, b)| a - b));
            let y = &g_new - &g;
            let sy = s.dot(&y);
            if sy > 1e-12 {
                let rho = 1.0 / sy;
                let identity = DMatrix::<f64>::identity(n, n);
                let left = &identity - rho * &s * y.transpose();
                let right = &identity - rho * &y * s.transpose();
                h = left * &h * right + rho * &s * s.transpose();
                hessian_fresh = false;
            }

            iterations += 1;
            callback(&Iterate {
                iteration: iterations,
                x: &x_new,
                fun: f_new,
            });

            let improvement = (f - f_new).abs();
            x = x_new;
            f = f_new;
            g = g_new;

            // A step cut short by a bound says nothing about stationarity;
            // the bound joins the working set on the next iteration.
            if hit_bound {
                trace!(iteration = iterations, alpha_max, "Step stopped at a bound");
            } else if improvement < self.ftol {
                converged = true;
                message = "Optimization terminated successfully";
                break;
            }
        }

        debug!(
            iterations,
            evaluations,
            fun = f,
            converged,
            message,
            "SLSQP finished"
        );

        Ok(OptimizationResult {
            x,
            fun: f,
            iterations,
            evaluations,
            converged,
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(x: &[f64]) -> Result<f64, OptError> {
        Ok(x.iter().enumerate().map(|(i, v)| (v - i as f64).powi(2)).sum())
    }

    #[test]
    fn test_unconstrained_quadratic() {
        let result = Slsqp::new()
            .minimize(sphere, vec![5.0, 5.0, 5.0], &ConstraintSet::new(), |_| {})
            .unwrap();
        assert!(result.converged);
        for (i, v) in result.x.iter().enumerate() {
            assert!((v - i as f64).abs() < 1e-3, "x[{i}] = {v}");
        }
    }

    #[test]
    fn test_equality_constraint() {
        let mut set = ConstraintSet::new();
        set.push(LinearConstraint::equality(vec![1.0, 1.0, 1.0], 0.0));
        let result = Slsqp::new()
            .minimize(sphere, vec![1.0, 1.0, 1.0], &set, |_| {})
            .unwrap();
        // Minimiser of Σ(xᵢ − i)² on Σxᵢ = 0 is (−1, 0, 1)
        assert!((result.x[0] + 1.0).abs() < 1e-3);
        assert!(result.x[1].abs() < 1e-3);
        assert!((result.x[2] - 1.0).abs() < 1e-3);
        assert!(result.x.iter().sum::<f64>().abs() < 1e-8);
    }

    #[test]
    fn test_active_bound() {
        // minimise (x + 1)² + (y − 2)² with x ≥ 0
        let mut set = ConstraintSet::new();
        set.push(LinearConstraint::at_least(vec![1.0, 0.0], 0.0));
        let result = Slsqp::new()
            .minimize(
                |x: &[f64]| Ok::<_, OptError>((x[0] + 1.0).powi(2) + (x[1] - 2.0).powi(2)),
                vec![3.0, 0.0],
                &set,
                |_| {},
            )
            .unwrap();
        assert!(result.x[0] >= -1e-10);
        assert!(result.x[0].abs() < 1e-4);
        assert!((result.x[1] - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_infeasible_start_is_projected() {
        let mut set = ConstraintSet::new();
        set.push(LinearConstraint::equality(vec![1.0, 1.0], 4.0));
        set.push(LinearConstraint::at_least(vec![1.0, 0.0], 0.0));
        set.push(LinearConstraint::at_least(vec![0.0, 1.0], 0.0));
        let mut seen = Vec::new();
        let result = Slsqp::new()
            .minimize(sphere, vec![-3.0, -3.0], &set, |it| seen.push(it.x.to_vec()))
            .unwrap();
        for x in &seen {
            assert!(set.is_satisfied(x, 1e-8));
        }
        assert!(set.is_satisfied(&result.x, 1e-8));
    }

    #[test]
    fn test_infeasible_set() {
        let mut set = ConstraintSet::new();
        set.push(LinearConstraint::equality(vec![1.0], 1.0));
        set.push(LinearConstraint::equality(vec![1.0], 2.0));
        let err = Slsqp::new()
            .minimize(sphere, vec![0.0], &set, |_| {})
            .unwrap_err();
        assert!(matches!(err, OptError::Infeasible { .. }));
    }

    #[test]
    fn test_callback_counts_iterations() {
        let mut count = 0;
        let result = Slsqp::new()
            .minimize(sphere, vec![2.0, -2.0], &ConstraintSet::new(), |it| {
                count += 1;
                assert_eq!(it.iteration, count);
            })
            .unwrap();
        assert_eq!(count, result.iterations);
    }
}
