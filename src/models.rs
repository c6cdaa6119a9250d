use serde::{Deserialize, Serialize};
use std::fmt;

// ---------- Problem data ----------

/// Per-variable `(lower, upper)` bound. `None` on either side means unbounded.
pub type Bound = (Option<f64>, Option<f64>);

/// One LP instance: minimize `c·x` subject to `A·x <= b` and the variable bounds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProblemInstance {
    #[serde(default)]
    pub index: usize,
    pub c: Vec<f64>,
    #[serde(rename = "A")]
    pub a: Vec<Vec<f64>>,
    pub b: Vec<f64>,
    pub bounds: Vec<Bound>,
}

impl ProblemInstance {
    pub fn new(index: usize, c: Vec<f64>, a: Vec<Vec<f64>>, b: Vec<f64>, bounds: Vec<Bound>) -> Self {
        ProblemInstance { index, c, a, b, bounds }
    }

    pub fn num_variables(&self) -> usize {
        self.c.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.a.len()
    }
}

// ---------- Solver result (what a backend hands back) ----------

/// Raw result of one solve call, before it is classified into a [`SolveOutcome`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LpSolution {
    pub success: bool,
    pub x: Vec<f64>,
    pub objective: f64,
    pub message: String,
}

impl LpSolution {
    pub fn optimal(x: Vec<f64>, objective: f64) -> Self {
        LpSolution {
            success: true,
            x,
            objective,
            message: "Optimization terminated successfully.".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        LpSolution {
            success: false,
            x: Vec::new(),
            objective: f64::NAN,
            message: message.into(),
        }
    }
}

// ---------- Reports ----------

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ValidationEntry {
    pub problem_id: usize,
    pub valid: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ValidationReport {
    pub entries: Vec<ValidationEntry>,
    pub overall: bool,
}

impl ValidationReport {
    pub fn from_entries(entries: Vec<ValidationEntry>) -> Self {
        let overall = entries.iter().all(|e| e.valid);
        ValidationReport { entries, overall }
    }

    pub fn invalid_entries(&self) -> impl Iterator<Item = &ValidationEntry> {
        self.entries.iter().filter(|e| !e.valid)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry.message)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SolveOutcome {
    Solved {
        optimal_solution: Vec<f64>,
        objective_value: f64,
    },
    Infeasible {
        message: String,
    },
    Errored {
        error: String,
    },
}

impl SolveOutcome {
    pub fn errored(error: impl Into<String>) -> Self {
        SolveOutcome::Errored { error: error.into() }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved { .. })
    }

    /// Solved and infeasible outcomes depend only on the problem and the backend.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, SolveOutcome::Errored { .. })
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveOutcome::Solved {
                optimal_solution,
                objective_value,
            } => write!(
                f,
                "solved, objective = {}, x = {:?}",
                objective_value, optimal_solution
            ),
            SolveOutcome::Infeasible { message } => write!(f, "failure: {}", message),
            SolveOutcome::Errored { error } => write!(f, "error: {}", error),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BatchEntry {
    pub problem_id: usize,
    #[serde(flatten)]
    pub outcome: SolveOutcome,
}

/// Outcomes in the order of the submitted problems.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct BatchReport {
    pub results: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&BatchEntry> {
        self.results.get(position)
    }

    pub fn solved_count(&self) -> usize {
        self.results.iter().filter(|e| e.outcome.is_solved()).count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.results {
            writeln!(f, "Problem {} Execution: {}", entry.problem_id, entry.outcome)?;
        }
        Ok(())
    }
}

// ---------- Typed requests (replace free-text commands) ----------

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ValidateRequest {
    /// Problems to check; the active registry when absent.
    #[serde(default)]
    pub problems: Option<Vec<ProblemInstance>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ExecuteRequest {
    /// Problems to solve; the active registry when absent.
    #[serde(default)]
    pub problems: Option<Vec<ProblemInstance>>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentRequest {
    Validate(ValidateRequest),
    Execute(ExecuteRequest),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentResponse {
    Validation(ValidationReport),
    Execution(BatchReport),
    Aborted {
        validation: ValidationReport,
        message: String,
    },
}
