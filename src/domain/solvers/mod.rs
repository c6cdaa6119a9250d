pub mod highs_solver;

pub use highs_solver::HighsSolver;
