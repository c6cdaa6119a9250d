use std::sync::Arc;

use crate::domain::solver::Solver;
use crate::domain::solvers::HighsSolver;

/// Backends selectable through the `SOLVER` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverType {
    #[default]
    Highs,
}

impl SolverType {
    /// Parse solver type from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "highs" => Some(SolverType::Highs),
            _ => None,
        }
    }
}

pub fn create_solver(solver_type: SolverType) -> Arc<dyn Solver> {
    match solver_type {
        SolverType::Highs => Arc::new(HighsSolver::new()),
    }
}
