use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::cache::OutcomeCache;
use crate::domain::solve::solve_problem;
use crate::domain::solver::Solver;
use crate::models::{BatchEntry, BatchReport, ProblemInstance, SolveOutcome};

/// Fans independent solve tasks out over the blocking pool and collects
/// every outcome back in submission order.
#[derive(Clone)]
pub struct BatchRunner {
    solver: Arc<dyn Solver>,
    timeout: Option<Duration>,
    cache: Option<Arc<OutcomeCache>>,
}

impl BatchRunner {
    pub fn new(solver: Arc<dyn Solver>) -> Self {
        BatchRunner {
            solver,
            timeout: None,
            cache: None,
        }
    }

    /// Expired tasks are reported as errored; the blocking solve is not interrupted.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cache(mut self, cache: Arc<OutcomeCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Only call this after a passing validation report.
    pub async fn run_batch(&self, problems: &[ProblemInstance]) -> BatchReport {
        info!(
            "running batch of {} problems with {}",
            problems.len(),
            self.solver.name()
        );

        let handles: Vec<JoinHandle<SolveOutcome>> = problems
            .iter()
            .map(|problem| self.spawn_task(problem.clone()))
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (problem, handle) in problems.iter().zip(handles) {
            let outcome = handle.await.unwrap_or_else(SolveOutcome::from);
            if let SolveOutcome::Errored { error } = &outcome {
                warn!("problem {} errored: {}", problem.index, error);
            }
            results.push(BatchEntry {
                problem_id: problem.index,
                outcome,
            });
        }

        let report = BatchReport { results };
        info!(
            "batch finished: {}/{} solved",
            report.solved_count(),
            report.len()
        );
        report
    }

    fn spawn_task(&self, problem: ProblemInstance) -> JoinHandle<SolveOutcome> {
        let solver = Arc::clone(&self.solver);
        let cache = self.cache.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let key = cache
                .as_ref()
                .and_then(|_| OutcomeCache::key(solver.name(), &problem));
            if let (Some(cache), Some(key)) = (&cache, &key) {
                if let Some(hit) = cache.get(key) {
                    debug!("problem {} served from cache", problem.index);
                    return hit;
                }
            }

            let index = problem.index;
            let blocking = tokio::task::spawn_blocking(move || solve_problem(solver.as_ref(), &problem));
            let joined = match timeout {
                Some(limit) => match tokio::time::timeout(limit, blocking).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        return SolveOutcome::errored(format!(
                            "solve timed out after {} ms",
                            limit.as_millis()
                        ))
                    }
                },
                None => blocking.await,
            };
            let outcome = joined.unwrap_or_else(SolveOutcome::from);
            debug!("problem {} finished: {}", index, outcome);

            if let (Some(cache), Some(key)) = (cache, key) {
                cache.insert(key, &outcome);
            }
            outcome
        })
    }
}
