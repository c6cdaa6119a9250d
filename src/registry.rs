use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::models::{Bound, ProblemInstance};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read problem file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse problem file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

const NON_NEGATIVE: Bound = (Some(0.0), None);

/// The three demonstration problems: a transportation problem and two
/// smaller cover-style problems, all over non-negative variables.
pub fn builtin_problems() -> Vec<ProblemInstance> {
    vec![
        // Two warehouses (supply rows) shipping to three stores (demand rows).
        ProblemInstance::new(
            0,
            vec![4.0, 6.0, 9.0, 5.0, 3.0, 8.0],
            vec![
                vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
                vec![-1.0, 0.0, 0.0, -1.0, 0.0, 0.0],
                vec![0.0, -1.0, 0.0, 0.0, -1.0, 0.0],
                vec![0.0, 0.0, -1.0, 0.0, 0.0, -1.0],
            ],
            vec![50.0, 60.0, -30.0, -40.0, -20.0],
            vec![NON_NEGATIVE; 6],
        ),
        ProblemInstance::new(
            1,
            vec![3.0, 7.0, 2.0, 4.0],
            vec![
                vec![1.0, 2.0, 0.0, 1.0],
                vec![0.0, 1.0, 1.0, 2.0],
                vec![-1.0, -2.0, -1.0, 0.0],
            ],
            vec![40.0, 30.0, -20.0],
            vec![NON_NEGATIVE; 4],
        ),
        ProblemInstance::new(
            2,
            vec![10.0, 2.0, 5.0],
            vec![
                vec![2.0, 3.0, 1.0],
                vec![-1.0, 0.0, -1.0],
                vec![0.0, -1.0, -2.0],
            ],
            vec![50.0, -15.0, -30.0],
            vec![NON_NEGATIVE; 3],
        ),
    ]
}

/// Number problems by their position, ignoring any index given in the input.
pub fn index_problems(problems: Vec<ProblemInstance>) -> Vec<ProblemInstance> {
    problems
        .into_iter()
        .enumerate()
        .map(|(index, problem)| ProblemInstance { index, ..problem })
        .collect()
}

/// Load a JSON array of problems from disk.
pub fn load_problems(path: impl AsRef<Path>) -> Result<Vec<ProblemInstance>, RegistryError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| RegistryError::Read {
        path: display.clone(),
        source,
    })?;
    let problems: Vec<ProblemInstance> =
        serde_json::from_str(&raw).map_err(|source| RegistryError::Parse {
            path: display,
            source,
        })?;
    Ok(index_problems(problems))
}
