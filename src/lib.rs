//! Validation-gated concurrent batch solving of small linear programs.
//!
//! A [`Coordinator`](domain::coordinator::Coordinator) first runs the
//! gatekeeper ([`domain::validate::validate`]) over a registry of
//! [`ProblemInstance`](models::ProblemInstance)s and, only when every instance
//! is well-formed, fans the solves out through a
//! [`BatchRunner`](domain::batch::BatchRunner).

pub mod api;
pub mod cache;
pub mod config;
pub mod convert;
pub mod domain;
pub mod models;
pub mod registry;

use std::sync::Arc;

use log::info;

use crate::cache::OutcomeCache;
use crate::config::Config;
use crate::domain::batch::BatchRunner;
use crate::domain::coordinator::Coordinator;
use crate::domain::solver_factory::create_solver;
use crate::registry::{builtin_problems, load_problems, RegistryError};

/// Wire the solver backend, cache, timeout and registry named in `config`.
pub fn build_coordinator(config: &Config) -> Result<Coordinator, RegistryError> {
    let solver = create_solver(config.solver);

    let mut runner = BatchRunner::new(solver);
    if let Some(timeout) = config.solve_timeout {
        runner = runner.with_timeout(timeout);
    }
    if let Some(capacity) = config.cache_size {
        runner = runner.with_cache(Arc::new(OutcomeCache::new(capacity)));
    }

    let problems = match &config.problems_file {
        Some(path) => load_problems(path)?,
        None => builtin_problems(),
    };
    info!(
        "registry holds {} problems, solver backend is {}",
        problems.len(),
        runner.solver_name()
    );

    Ok(Coordinator::new(problems, runner))
}
