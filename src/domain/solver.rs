use thiserror::Error;

use crate::models::{Bound, LpSolution};

/// Failures raised by a backend, as opposed to an unsuccessful solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("dimension mismatch: {0}")]
    Dimension(String),

    #[error("non-finite input: {0}")]
    NonFinite(String),

    #[error("{backend} backend failed: {details}")]
    Backend { backend: String, details: String },
}

/// Common interface for LP solvers
pub trait Solver: Send + Sync {
    /// Minimize `c·x` subject to `a_ub·x <= b_ub` and per-variable bounds.
    ///
    /// # Returns
    /// `Ok` with `success == false` when the problem is infeasible or
    /// unbounded; `Err` when the backend itself could not run.
    fn solve(
        &self,
        c: &[f64],
        a_ub: &[Vec<f64>],
        b_ub: &[f64],
        bounds: &[Bound],
    ) -> Result<LpSolution, SolverError>;

    /// Get the solver name for logging/debugging
    fn name(&self) -> &str;
}

/// Check the shapes a backend relies on before touching the data.
pub fn check_dimensions(
    c: &[f64],
    a_ub: &[Vec<f64>],
    b_ub: &[f64],
    bounds: &[Bound],
) -> Result<(), SolverError> {
    if a_ub.len() != b_ub.len() {
        return Err(SolverError::Dimension(format!(
            "{} constraint rows, {} right-hand side values",
            a_ub.len(),
            b_ub.len()
        )));
    }
    if let Some((i, row)) = a_ub.iter().enumerate().find(|(_, row)| row.len() != c.len()) {
        return Err(SolverError::Dimension(format!(
            "row {} has {} columns, expected {}",
            i,
            row.len(),
            c.len()
        )));
    }
    if bounds.len() != c.len() {
        return Err(SolverError::Dimension(format!(
            "{} bounds for {} variables",
            bounds.len(),
            c.len()
        )));
    }
    let finite = c.iter().chain(a_ub.iter().flatten()).chain(b_ub.iter()).all(|v| v.is_finite());
    if !finite {
        return Err(SolverError::NonFinite("coefficients must be finite".to_string()));
    }
    Ok(())
}
