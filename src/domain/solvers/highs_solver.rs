use std::ops::Bound as RangeBound;

use crate::domain::solver::{check_dimensions, Solver, SolverError};
use crate::models::{Bound, LpSolution};

use ::highs::{ColProblem, HighsModelStatus, Sense};

pub const MSG_INFEASIBLE: &str = "The problem is infeasible.";
pub const MSG_UNBOUNDED: &str = "The problem is unbounded.";
pub const MSG_ITERATION_LIMIT: &str = "Iteration limit reached.";

/// HiGHS solver implementation
pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        HighsSolver
    }

    fn column_range(bound: &Bound) -> (RangeBound<f64>, RangeBound<f64>) {
        let to_range = |v: Option<f64>| match v {
            Some(v) if v.is_finite() => RangeBound::Included(v),
            _ => RangeBound::Unbounded,
        };
        (to_range(bound.0), to_range(bound.1))
    }

    fn failure_message(status: HighsModelStatus) -> String {
        match status {
            HighsModelStatus::Infeasible => MSG_INFEASIBLE.to_string(),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                MSG_UNBOUNDED.to_string()
            }
            HighsModelStatus::ReachedIterationLimit => MSG_ITERATION_LIMIT.to_string(),
            HighsModelStatus::ReachedTimeLimit => "Time limit reached.".to_string(),
            other => format!("HiGHS stopped with status {:?}", other),
        }
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for HighsSolver {
    fn solve(
        &self,
        c: &[f64],
        a_ub: &[Vec<f64>],
        b_ub: &[f64],
        bounds: &[Bound],
    ) -> Result<LpSolution, SolverError> {
        check_dimensions(c, a_ub, b_ub, bounds)?;

        let mut problem = ColProblem::new();

        let rows: Vec<_> = b_ub.iter().map(|&rhs| problem.add_row(..=rhs)).collect();

        for (col_idx, (&cost, bound)) in c.iter().zip(bounds).enumerate() {
            let row_factors: Vec<_> = a_ub
                .iter()
                .zip(&rows)
                .filter(|(a_row, _)| a_row[col_idx] != 0.0)
                .map(|(a_row, &row)| (row, a_row[col_idx]))
                .collect();
            problem.add_column(cost, Self::column_range(bound), &row_factors);
        }

        let mut model = problem.optimise(Sense::Minimise);
        model.make_quiet();
        let solved = model.try_solve().map_err(|status| SolverError::Backend {
            backend: self.name().to_string(),
            details: format!("{:?}", status),
        })?;

        match solved.status() {
            HighsModelStatus::Optimal => {
                let x = solved.get_solution().columns().to_vec();
                let objective = c.iter().zip(&x).map(|(cj, xj)| cj * xj).sum();
                Ok(LpSolution::optimal(x, objective))
            }
            status => {
                log::debug!("HiGHS finished with status {:?}", status);
                Ok(LpSolution::failed(Self::failure_message(status)))
            }
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin_problems;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn solve_builtin(index: usize) -> LpSolution {
        let problem = &builtin_problems()[index];
        HighsSolver::new()
            .solve(&problem.c, &problem.a, &problem.b, &problem.bounds)
            .unwrap()
    }

    #[test]
    fn test_transportation_problem_should_be_optimal() {
        let solution = solve_builtin(0);

        assert!(solution.success);
        assert_close(solution.objective, 400.0);
        assert_eq!(solution.x.len(), 6);
        let expected = [30.0, 0.0, 0.0, 0.0, 40.0, 20.0];
        for (x, e) in solution.x.iter().zip(expected) {
            assert!(*x >= -1e-9);
            assert_close(*x, e);
        }
    }

    #[test]
    fn test_cover_problem_should_be_optimal() {
        let solution = solve_builtin(1);
        assert!(solution.success);
        assert_close(solution.objective, 40.0);
    }

    #[test]
    fn test_three_variable_problem_should_be_optimal() {
        let solution = solve_builtin(2);
        assert!(solution.success);
        assert_close(solution.objective, 75.0);
        assert_close(solution.x[2], 15.0);
    }

    #[test]
    fn test_single_step_optimum_should_be_optimal() {
        // minimize -x with x <= 5
        let solution = HighsSolver::new()
            .solve(&[-1.0], &[vec![1.0]], &[5.0], &[(Some(0.0), None)])
            .unwrap();
        assert!(solution.success);
        assert_eq!(solution.message, "Optimization terminated successfully.");
        assert_close(solution.x[0], 5.0);
        assert_close(solution.objective, -5.0);
    }

    #[test]
    fn test_infeasible_problem_should_report_failure() {
        // x <= 1 and x >= 2
        let solution = HighsSolver::new()
            .solve(&[1.0], &[vec![1.0], vec![-1.0]], &[1.0, -2.0], &[(Some(0.0), None)])
            .unwrap();
        assert!(!solution.success);
        assert_eq!(solution.message, MSG_INFEASIBLE);
    }

    #[test]
    fn test_unbounded_problem_should_report_failure() {
        // minimize -x with x >= 0 and no upper limit
        let solution = HighsSolver::new()
            .solve(&[-1.0], &[vec![-1.0]], &[0.0], &[(Some(0.0), None)])
            .unwrap();
        assert!(!solution.success);
        assert_eq!(solution.message, MSG_UNBOUNDED);
    }

    #[test]
    fn test_upper_and_free_bounds_should_be_respected() {
        // minimize -2*x1 + x2 with 1 <= x1 <= 4, x2 free, x2 >= x1 - 10
        let solution = HighsSolver::new()
            .solve(
                &[-2.0, 1.0],
                &[vec![1.0, -1.0]],
                &[10.0],
                &[(Some(1.0), Some(4.0)), (None, None)],
            )
            .unwrap();
        assert!(solution.success);
        assert_close(solution.x[0], 4.0);
        assert_close(solution.x[1], -6.0);
        assert_close(solution.objective, -14.0);
    }

    #[test]
    fn test_dimension_mismatch_should_return_error() {
        let result = HighsSolver::new().solve(
            &[1.0, 1.0],
            &[vec![1.0, 1.0]],
            &[1.0, 2.0],
            &[(Some(0.0), None); 2],
        );
        assert!(matches!(result, Err(SolverError::Dimension(_))));
    }

    #[test]
    fn test_failure_message_maps_limit_statuses() {
        assert_eq!(
            HighsSolver::failure_message(HighsModelStatus::ReachedIterationLimit),
            MSG_ITERATION_LIMIT
        );
        assert_eq!(
            HighsSolver::failure_message(HighsModelStatus::UnboundedOrInfeasible),
            MSG_UNBOUNDED
        );
    }
}
