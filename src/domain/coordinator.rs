use std::borrow::Cow;
use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;

use crate::domain::batch::BatchRunner;
use crate::domain::validate::{validate, ValidationError};
use crate::models::{
    AgentRequest, AgentResponse, BatchReport, ExecuteRequest, ProblemInstance, ValidateRequest,
    ValidationReport,
};
use crate::registry::index_problems;

pub const ABORT_MESSAGE: &str = "Constraints validation failed. Execution aborted.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinatorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result of an execute request that got past the precondition checks.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Completed(BatchReport),
    /// The gate failed, so nothing was solved.
    Aborted {
        validation: ValidationReport,
        message: String,
    },
}

/// Routes typed requests to the gatekeeper and the batch runner. Execution
/// always passes the gate first.
#[derive(Clone)]
pub struct Coordinator {
    registry: Arc<Vec<ProblemInstance>>,
    runner: BatchRunner,
}

impl Coordinator {
    pub fn new(registry: Vec<ProblemInstance>, runner: BatchRunner) -> Self {
        Coordinator {
            registry: Arc::new(index_problems(registry)),
            runner,
        }
    }

    pub fn registry(&self) -> &[ProblemInstance] {
        &self.registry
    }

    pub fn runner(&self) -> &BatchRunner {
        &self.runner
    }

    pub async fn handle(&self, request: AgentRequest) -> Result<AgentResponse, CoordinatorError> {
        match request {
            AgentRequest::Validate(request) => {
                self.validate(request).map(AgentResponse::Validation)
            }
            AgentRequest::Execute(request) => self.execute(request).await.map(AgentResponse::from),
        }
    }

    pub fn validate(&self, request: ValidateRequest) -> Result<ValidationReport, CoordinatorError> {
        let problems = self.resolve(request.problems);
        Ok(validate(&problems)?)
    }

    pub async fn execute(&self, request: ExecuteRequest) -> Result<ExecutionOutcome, CoordinatorError> {
        let problems = self.resolve(request.problems);
        let validation = validate(&problems)?;

        if !validation.overall {
            warn!(
                "{} ({} invalid problems)",
                ABORT_MESSAGE,
                validation.invalid_entries().count()
            );
            return Ok(ExecutionOutcome::Aborted {
                validation,
                message: ABORT_MESSAGE.to_string(),
            });
        }

        let report = self.runner.run_batch(&problems).await;
        info!("execution finished for {} problems", report.len());
        Ok(ExecutionOutcome::Completed(report))
    }

    fn resolve(&self, problems: Option<Vec<ProblemInstance>>) -> Cow<'_, [ProblemInstance]> {
        match problems {
            Some(problems) => Cow::Owned(index_problems(problems)),
            None => Cow::Borrowed(self.registry.as_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::solver::{Solver, SolverError};
    use crate::domain::solvers::HighsSolver;
    use crate::models::{Bound, LpSolution, SolveOutcome};
    use crate::registry::builtin_problems;

    struct CountingSolver {
        calls: AtomicUsize,
    }

    impl Solver for CountingSolver {
        fn solve(
            &self,
            c: &[f64],
            a_ub: &[Vec<f64>],
            b_ub: &[f64],
            bounds: &[Bound],
        ) -> Result<LpSolution, SolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            HighsSolver::new().solve(c, a_ub, b_ub, bounds)
        }

        fn name(&self) -> &str {
            "Counting"
        }
    }

    fn coordinator() -> (Coordinator, Arc<CountingSolver>) {
        let solver = Arc::new(CountingSolver { calls: AtomicUsize::new(0) });
        let runner = BatchRunner::new(solver.clone());
        (Coordinator::new(builtin_problems(), runner), solver)
    }

    #[tokio::test]
    async fn test_validate_request_uses_registry_when_no_problems_given() {
        let (coordinator, _) = coordinator();
        let response = coordinator
            .handle(AgentRequest::Validate(ValidateRequest::default()))
            .await
            .unwrap();

        match response {
            AgentResponse::Validation(report) => {
                assert!(report.overall);
                assert_eq!(report.entries.len(), 3);
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_request_runs_batch_after_gate() {
        let (coordinator, solver) = coordinator();
        let response = coordinator
            .handle(AgentRequest::Execute(ExecuteRequest::default()))
            .await
            .unwrap();

        match response {
            AgentResponse::Execution(report) => {
                assert_eq!(report.len(), 3);
                assert!(report.results.iter().all(|e| e.outcome.is_solved()));
            }
            other => panic!("unexpected response {:?}", other),
        }
        assert_eq!(solver.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_request_with_malformed_problem_is_aborted_before_solving() {
        let (coordinator, solver) = coordinator();
        let mut problems = builtin_problems();
        // rhs length differs from the constraint row count
        problems[1].b.pop();

        let response = coordinator
            .execute(ExecuteRequest { problems: Some(problems) })
            .await
            .unwrap();

        match response {
            ExecutionOutcome::Aborted { validation, message } => {
                assert_eq!(message, ABORT_MESSAGE);
                assert!(!validation.overall);
                assert!(!validation.entries[1].valid);
                assert!(validation.entries[0].valid && validation.entries[2].valid);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(solver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_agent_execute_with_malformed_problem_returns_aborted_response() {
        let (coordinator, solver) = coordinator();
        let mut problems = builtin_problems();
        problems[0].bounds.pop();

        let response = coordinator
            .handle(AgentRequest::Execute(ExecuteRequest { problems: Some(problems) }))
            .await
            .unwrap();

        assert!(matches!(response, AgentResponse::Aborted { .. }));
        assert_eq!(solver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_request_problems_are_renumbered_by_position() {
        let (coordinator, _) = coordinator();
        let mut problem = builtin_problems()[2].clone();
        problem.index = 42;

        let response = coordinator
            .execute(ExecuteRequest { problems: Some(vec![problem]) })
            .await
            .unwrap();

        match response {
            ExecutionOutcome::Completed(report) => {
                assert_eq!(report.results[0].problem_id, 0);
                assert!(matches!(report.results[0].outcome, SolveOutcome::Solved { .. }));
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_problem_list_is_a_validation_error() {
        let (coordinator, _) = coordinator();
        let result = coordinator.validate(ValidateRequest { problems: Some(vec![]) });
        assert_eq!(result, Err(CoordinatorError::Validation(ValidationError::EmptyRegistry)));
    }
}
