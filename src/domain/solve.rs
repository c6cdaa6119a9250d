use log::debug;

use crate::domain::solver::Solver;
use crate::models::{ProblemInstance, SolveOutcome};

/// Solve one instance and classify the result. Never fails: backend errors
/// become [`SolveOutcome::Errored`].
pub fn solve_problem(solver: &dyn Solver, problem: &ProblemInstance) -> SolveOutcome {
    debug!(
        "solving problem {} ({} variables, {} constraints) with {}",
        problem.index,
        problem.num_variables(),
        problem.num_constraints(),
        solver.name()
    );

    match solver.solve(&problem.c, &problem.a, &problem.b, &problem.bounds) {
        Ok(solution) => solution.into(),
        Err(error) => error.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::solvers::HighsSolver;
    use crate::registry::builtin_problems;

    #[test]
    fn test_solve_problem_given_transportation_problem_should_be_solved() {
        let problem = &builtin_problems()[0];
        match solve_problem(&HighsSolver::new(), problem) {
            SolveOutcome::Solved { optimal_solution, objective_value } => {
                assert_eq!(optimal_solution.len(), 6);
                assert!(objective_value.is_finite() && objective_value >= 0.0);
                assert!(optimal_solution.iter().all(|&x| x >= -1e-9));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_solve_problem_given_malformed_problem_should_be_errored() {
        let mut problem = builtin_problems()[1].clone();
        problem.b.push(1.0);
        let outcome = solve_problem(&HighsSolver::new(), &problem);
        assert!(matches!(outcome, SolveOutcome::Errored { .. }));
    }
}
