//! `spinvqe-opt`: classical optimizers for variational loops.
//!
//! | Optimizer | Constraints | Derivatives |
//! |-----------|-------------|-------------|
//! | [`Slsqp`] | linear equality / inequality | forward differences |
//! | [`NelderMead`] | none | none |
//!
//! Objectives are fallible: a closure returning `Result<f64, E>` for any
//! error type that can absorb an [`OptError`]. The first objective error
//! aborts the minimisation and is returned unchanged.
//!
//! # Example
//!
//! ```rust
//! use spinvqe_opt::{ConstraintSet, LinearConstraint, Optimizer, OptError, Slsqp};
//!
//! // minimise (x-2)² + (y-1)² subject to x + y = 1
//! let mut constraints = ConstraintSet::new();
//! constraints.push(LinearConstraint::equality(vec![1.0, 1.0], 1.0));
//!
//! let result = Slsqp::default()
//!     .minimize(
//!         |x: &[f64]| Ok::<_, OptError>((x[0] - 2.0).powi(2) + (x[1] - 1.0).powi(2)),
//!         vec![0.0, 0.0],
//!         &constraints,
//!         |_| {},
//!     )
//!     .unwrap();
//! assert!((result.x[0] - 1.0).abs() < 1e-3);
//! assert!((result.x[0] + result.x[1] - 1.0).abs() < 1e-8);
//! ```

pub mod constraint;
pub mod error;
pub mod nelder_mead;
pub mod slsqp;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use constraint::{ConstraintKind, ConstraintSet, LinearConstraint};
pub use error::{OptError, OptResult};
pub use nelder_mead::NelderMead;
pub use slsqp::Slsqp;

/// Default iteration cap shared by all methods.
pub const DEFAULT_MAXITER: usize = 2000;

/// State reported to the per-iteration callback.
#[derive(Debug, Clone, Copy)]
pub struct Iterate<'a> {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Current point.
    pub x: &'a [f64],
    /// Objective value at `x`.
    pub fun: f64,
}

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Final parameter values.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fun: f64,
    /// Number of completed iterations.
    pub iterations: usize,
    /// Number of objective evaluations.
    pub evaluations: usize,
    /// Whether the convergence criterion was met.
    pub converged: bool,
    /// Human-readable termination reason.
    pub message: String,
}

/// A minimiser over `ℝⁿ`.
pub trait Optimizer {
    /// Display name, e.g. `"SLSQP"`.
    fn name(&self) -> &'static str;

    /// Whether `constraints` are honoured.
    fn supports_constraints(&self) -> bool;

    /// Minimise `objective` starting from `x0`.
    ///
    /// `callback` is invoked once after each completed iteration.
    fn minimize<F, C, E>(
        &self,
        objective: F,
        x0: Vec<f64>,
        constraints: &ConstraintSet,
        callback: C,
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
        C: FnMut(&Iterate<'_>),
        E: From<OptError>;
}

/// Optimizer selection by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Method {
    /// Sequential quadratic programming with linear constraints.
    #[default]
    #[serde(rename = "slsqp", alias = "SLSQP")]
    Slsqp,
    /// Downhill simplex.
    #[serde(rename = "nelder_mead", alias = "Nelder-Mead", alias = "nelder-mead")]
    NelderMead,
}

impl Method {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Slsqp => "SLSQP",
            Method::NelderMead => "Nelder-Mead",
        }
    }

    /// Whether the method honours constraints.
    pub fn supports_constraints(&self) -> bool {
        matches!(self, Method::Slsqp)
    }

    /// Build a solver with the given iteration cap and function tolerance.
    pub fn solver(&self, maxiter: usize, ftol: f64) -> Solver {
        match self {
            Method::Slsqp => Solver::Slsqp(Slsqp::default().with_maxiter(maxiter).with_ftol(ftol)),
            Method::NelderMead => Solver::NelderMead(
                NelderMead::default()
                    .with_maxiter(maxiter)
                    .with_fatol(ftol),
            ),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Method {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "slsqp" => Ok(Method::Slsqp),
            "nelder-mead" | "neldermead" => Ok(Method::NelderMead),
            _ => Err(OptError::UnknownMethod(s.to_string())),
        }
    }
}

/// A configured optimizer of either kind.
#[derive(Debug, Clone)]
pub enum Solver {
    /// See [`Slsqp`].
    Slsqp(Slsqp),
    /// See [`NelderMead`].
    NelderMead(NelderMead),
}

impl Optimizer for Solver {
    fn name(&self) -> &'static str {
        match self {
            Solver::Slsqp(s) => s.name(),
            Solver::NelderMead(s) => s.name(),
        }
    }

    fn supports_constraints(&self) -> bool {
        match self {
            Solver::Slsqp(s) => s.supports_constraints(),
            Solver::NelderMead(s) => s.supports_constraints(),
        }
    }

    fn minimize<F, C, E>(
        &self,
        objective: F,
        x0: Vec<f64>,
        constraints: &ConstraintSet,
        callback: C,
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
        C: FnMut(&Iterate<'_>),
        E: From<OptError>,
    {
        match self {
            Solver::Slsqp(s) => s.minimize(objective, x0, constraints, callback),
            Solver::NelderMead(s) => s.minimize(objective, x0, constraints, callback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str() {
        assert_eq!("SLSQP".parse::<Method>().unwrap(), Method::Slsqp);
        assert_eq!("slsqp".parse::<Method>().unwrap(), Method::Slsqp);
        assert_eq!("Nelder-Mead".parse::<Method>().unwrap(), Method::NelderMead);
        assert_eq!("nelder_mead".parse::<Method>().unwrap(), Method::NelderMead);
        assert!(matches!(
            "cobyla".parse::<Method>(),
            Err(OptError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_method_capabilities() {
        assert!(Method::Slsqp.supports_constraints());
        assert!(!Method::NelderMead.supports_constraints());
        assert_eq!(Method::default(), Method::Slsqp);
        assert_eq!(Method::NelderMead.to_string(), "Nelder-Mead");
    }

    #[test]
    fn test_solver_settings() {
        match Method::Slsqp.solver(50, 1e-9) {
            Solver::Slsqp(s) => {
                assert_eq!(s.maxiter, 50);
                assert_eq!(s.ftol, 1e-9);
            }
            Solver::NelderMead(_) => panic!("wrong solver"),
        }
        let solver = Method::NelderMead.solver(10, 1e-4);
        assert_eq!(solver.name(), "Nelder-Mead");
        assert!(!solver.supports_constraints());
    }
}
