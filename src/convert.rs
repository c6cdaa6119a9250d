use tokio::task::JoinError;

use crate::domain::coordinator::ExecutionOutcome;
use crate::domain::solver::SolverError;
use crate::models::{AgentResponse, LpSolution, SolveOutcome};

impl From<LpSolution> for SolveOutcome {
    fn from(s: LpSolution) -> Self {
        if s.success {
            SolveOutcome::Solved {
                optimal_solution: s.x,
                objective_value: s.objective,
            }
        } else {
            SolveOutcome::Infeasible { message: s.message }
        }
    }
}

impl From<SolverError> for SolveOutcome {
    fn from(e: SolverError) -> Self {
        SolveOutcome::Errored { error: e.to_string() }
    }
}

impl From<JoinError> for SolveOutcome {
    fn from(e: JoinError) -> Self {
        SolveOutcome::Errored {
            error: join_error_message(e),
        }
    }
}

impl From<ExecutionOutcome> for AgentResponse {
    fn from(outcome: ExecutionOutcome) -> Self {
        match outcome {
            ExecutionOutcome::Completed(report) => AgentResponse::Execution(report),
            ExecutionOutcome::Aborted { validation, message } => {
                AgentResponse::Aborted { validation, message }
            }
        }
    }
}

fn join_error_message(e: JoinError) -> String {
    if !e.is_panic() {
        return format!("solve task did not complete: {}", e);
    }
    let payload = e.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("solver panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("solver panicked: {}", message)
    } else {
        "solver panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_solution_becomes_solved() {
        let outcome: SolveOutcome = LpSolution::optimal(vec![1.0, 2.0], 5.0).into();
        assert_eq!(
            outcome,
            SolveOutcome::Solved { optimal_solution: vec![1.0, 2.0], objective_value: 5.0 }
        );
    }

    #[test]
    fn test_failed_solution_keeps_message_verbatim() {
        let outcome: SolveOutcome = LpSolution::failed("The problem is unbounded.").into();
        assert_eq!(
            outcome,
            SolveOutcome::Infeasible { message: "The problem is unbounded.".to_string() }
        );
    }

    #[test]
    fn test_solver_error_becomes_errored() {
        let outcome: SolveOutcome = SolverError::Dimension("2 rows, 3 values".into()).into();
        assert_eq!(outcome, SolveOutcome::errored("dimension mismatch: 2 rows, 3 values"));
    }

    #[test]
    fn test_aborted_execution_becomes_aborted_response() {
        use crate::models::{ValidationEntry, ValidationReport};

        let validation = ValidationReport::from_entries(vec![ValidationEntry {
            problem_id: 0,
            valid: false,
            message: "Problem 0 constraints are invalid: objective is empty".to_string(),
        }]);
        let response: AgentResponse = ExecutionOutcome::Aborted {
            validation: validation.clone(),
            message: "aborted".to_string(),
        }
        .into();
        assert_eq!(
            response,
            AgentResponse::Aborted { validation, message: "aborted".to_string() }
        );
    }

    #[tokio::test]
    async fn test_panicking_task_becomes_errored() {
        let handle = tokio::task::spawn_blocking(|| -> SolveOutcome { panic!("pivot blew up") });
        let outcome: SolveOutcome = handle.await.unwrap_err().into();
        assert_eq!(outcome, SolveOutcome::errored("solver panicked: pivot blew up"));
    }
}
