use log::{debug, info, warn};
use thiserror::Error;

use crate::models::{Bound, ProblemInstance, ValidationEntry, ValidationReport};

/// Why a single problem instance is not well-formed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{details}")]
pub struct SolveInputError {
    pub details: String,
}

impl SolveInputError {
    fn new(details: impl Into<String>) -> Self {
        SolveInputError { details: details.into() }
    }
}

/// Caller contract violations for [`validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("no problem instances to validate")]
    EmptyRegistry,
}

/// Gatekeeper: check every instance and report an overall verdict.
///
/// A defective instance only invalidates its own entry; the remaining
/// instances are still checked.
pub fn validate(problems: &[ProblemInstance]) -> Result<ValidationReport, ValidationError> {
    if problems.is_empty() {
        return Err(ValidationError::EmptyRegistry);
    }

    let entries: Vec<ValidationEntry> = problems
        .iter()
        .map(|problem| match check_problem(problem) {
            Ok(()) => {
                debug!("problem {} is well-formed", problem.index);
                ValidationEntry {
                    problem_id: problem.index,
                    valid: true,
                    message: format!("Problem {} constraints are valid.", problem.index),
                }
            }
            Err(error) => {
                warn!("problem {} rejected: {}", problem.index, error);
                ValidationEntry {
                    problem_id: problem.index,
                    valid: false,
                    message: format!(
                        "Problem {} constraints are invalid: {}",
                        problem.index, error
                    ),
                }
            }
        })
        .collect();

    let report = ValidationReport::from_entries(entries);
    info!(
        "validated {} problems, overall = {}",
        report.entries.len(),
        report.overall
    );
    Ok(report)
}

/// Structural well-formedness of one instance.
pub fn check_problem(problem: &ProblemInstance) -> Result<(), SolveInputError> {
    let ncols = problem.num_variables();
    if ncols == 0 {
        return Err(SolveInputError::new("objective has no coefficients"));
    }

    if problem.num_constraints() != problem.b.len() {
        return Err(SolveInputError::new(format!(
            "constraint matrix has {} rows but right-hand side has {} entries",
            problem.num_constraints(),
            problem.b.len()
        )));
    }

    for (row_idx, row) in problem.a.iter().enumerate() {
        if row.len() != ncols {
            return Err(SolveInputError::new(format!(
                "constraint row {} has {} coefficients but objective has {}",
                row_idx,
                row.len(),
                ncols
            )));
        }
    }

    if problem.bounds.len() != ncols {
        return Err(SolveInputError::new(format!(
            "{} bounds given for {} variables",
            problem.bounds.len(),
            ncols
        )));
    }

    check_finite(problem)?;

    for (var_idx, bound) in problem.bounds.iter().enumerate() {
        check_bound(var_idx, bound)?;
    }

    Ok(())
}

fn check_finite(problem: &ProblemInstance) -> Result<(), SolveInputError> {
    if problem.c.iter().any(|v| !v.is_finite()) {
        return Err(SolveInputError::new("objective contains a non-finite coefficient"));
    }
    if problem.a.iter().flatten().any(|v| !v.is_finite()) {
        return Err(SolveInputError::new(
            "constraint matrix contains a non-finite coefficient",
        ));
    }
    if problem.b.iter().any(|v| !v.is_finite()) {
        return Err(SolveInputError::new(
            "right-hand side contains a non-finite value",
        ));
    }
    Ok(())
}

fn check_bound(var_idx: usize, bound: &Bound) -> Result<(), SolveInputError> {
    let (lower, upper) = *bound;
    if lower.map_or(false, f64::is_nan) || upper.map_or(false, f64::is_nan) {
        return Err(SolveInputError::new(format!(
            "variable {} has a NaN bound",
            var_idx
        )));
    }
    if let (Some(lower), Some(upper)) = (lower, upper) {
        if lower > upper {
            return Err(SolveInputError::new(format!(
                "variable {} has lower bound {} > upper bound {}",
                var_idx, lower, upper
            )));
        }
    }
    Ok(())
}
