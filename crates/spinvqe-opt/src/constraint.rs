//! Linear constraints over the parameter vector.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{OptError, OptResult};

/// Whether a constraint is `a·x = b` or `a·x ≥ b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// `a·x = b`
    Equality,
    /// `a·x ≥ b`
    Inequality,
}

/// A single linear constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Coefficient vector `a`.
    pub coeffs: Vec<f64>,
    /// Right-hand side `b`.
    pub rhs: f64,
    /// Equality or lower bound.
    pub kind: ConstraintKind,
}

impl LinearConstraint {
    /// `a·x = b`
    pub fn equality(coeffs: Vec<f64>, rhs: f64) -> Self {
        Self {
            coeffs,
            rhs,
            kind: ConstraintKind::Equality,
        }
    }

    /// `a·x ≥ b`
    pub fn at_least(coeffs: Vec<f64>, rhs: f64) -> Self {
        Self {
            coeffs,
            rhs,
            kind: ConstraintKind::Inequality,
        }
    }

    /// `a·x`
    pub fn dot(&self, x: &[f64]) -> f64 {
        self.coeffs.iter().zip(x).map(|(a, v)| a * v).sum()
    }

    /// `a·x − b`; zero on an equality, non-negative inside an inequality.
    pub fn slack(&self, x: &[f64]) -> f64 {
        self.dot(x) - self.rhs
    }

    /// How far `x` is from satisfying the constraint (0 when satisfied).
    pub fn violation(&self, x: &[f64]) -> f64 {
        let slack = self.slack(x);
        match self.kind {
            ConstraintKind::Equality => slack.abs(),
            ConstraintKind::Inequality => (-slack).max(0.0),
        }
    }
}

/// An ordered collection of linear constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    constraints: Vec<LinearConstraint>,
}

impl ConstraintSet {
    /// An empty (unconstrained) set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint.
    pub fn push(&mut self, constraint: LinearConstraint) -> &mut Self {
        self.constraints.push(constraint);
        self
    }

    /// All constraints in insertion order.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Equality constraints.
    pub fn equalities(&self) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints
            .iter()
            .filter(|c| c.kind == ConstraintKind::Equality)
    }

    /// Inequality constraints.
    pub fn inequalities(&self) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints
            .iter()
            .filter(|c| c.kind == ConstraintKind::Inequality)
    }

    /// Check every coefficient vector has length `n`.
    pub fn check_dimension(&self, n: usize) -> OptResult<()> {
        for (index, c) in self.constraints.iter().enumerate() {
            if c.coeffs.len() != n {
                return Err(OptError::DimensionMismatch {
                    index,
                    expected: n,
                    got: c.coeffs.len(),
                });
            }
        }
        Ok(())
    }

    /// Largest violation over all constraints.
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        self.constraints
            .iter()
            .map(|c| c.violation(x))
            .fold(0.0, f64::max)
    }

    /// Whether `x` satisfies every constraint within `tol`.
    pub fn is_satisfied(&self, x: &[f64], tol: f64) -> bool {
        self.max_violation(x) <= tol
    }

    /// Move `x` onto the feasible set.
    ///
    /// Projects onto the equality subspace; any inequality still violated is
    /// then pinned to its bound and the projection repeated with it treated
    /// as an equality. Each round pins at least one more constraint or
    /// gives up.
    pub fn project(&self, x: &mut [f64], tol: f64) -> OptResult<()> {
        self.check_dimension(x.len())?;
        let mut pinned: Vec<&LinearConstraint> = self.equalities().collect();

        for _ in 0..=self.constraints.len() {
            if !pinned.is_empty() {
                project_affine(&pinned, x)?;
            }
            let violated: Vec<&LinearConstraint> = self
                .inequalities()
                .filter(|c| c.violation(x) > tol)
                .collect();
            if violated.is_empty() && self.max_violation(x) <= tol {
                return Ok(());
            }
            let before = pinned.len();
            for c in violated {
                if !pinned.iter().any(|p| std::ptr::eq(*p, c)) {
                    pinned.push(c);
                }
            }
            if pinned.len() == before {
                break;
            }
        }

        Err(OptError::Infeasible {
            violation: self.max_violation(x),
        })
    }
}

/// Stack the coefficient vectors of `rows` into a matrix.
pub(crate) fn coefficient_matrix(rows: &[&LinearConstraint], n: usize) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), n, |r, c| rows[r].coeffs[c])
}

/// x ← x − Aᵀ(AAᵀ)⁺(Ax − b)
fn project_affine(rows: &[&LinearConstraint], x: &mut [f64]) -> OptResult<()> {
    let a = coefficient_matrix(rows, x.len());
    let residual = DVector::from_iterator(rows.len(), rows.iter().map(|c| c.slack(x)));
    let gram_inv = (&a * a.transpose())
        .pseudo_inverse(1e-12)
        .map_err(|e| OptError::LinearAlgebra(e.to_string()))?;
    let correction = a.transpose() * (gram_inv * residual);
    for (xi, ci) in x.iter_mut().zip(correction.iter()) {
        *xi -= ci;
    }
    Ok(())
}
