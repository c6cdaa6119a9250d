use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::solver_factory::SolverType;

const DEFAULT_PORT: u16 = 9000;
const DEFAULT_JSON_LIMIT: usize = 2 * 1024 * 1024; // 2 MB

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("unknown solver {0:?}")]
    UnknownSolver(String),

    #[error("PROTECT is enabled but API_KEY is not set")]
    MissingApiKey,
}

/// Runtime settings, read once at startup and passed to whoever needs them.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub json_limit: usize,
    pub solver: SolverType,
    pub solve_timeout: Option<Duration>,
    pub cache_size: Option<NonZeroUsize>,
    pub problems_file: Option<PathBuf>,
    /// Required on mutating routes when set.
    pub api_key: Option<String>,
    pub sentry_dsn: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            json_limit: DEFAULT_JSON_LIMIT,
            solver: SolverType::default(),
            solve_timeout: None,
            cache_size: None,
            problems_file: None,
            api_key: None,
            sentry_dsn: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = parse_var("PORT")?.unwrap_or(defaults.port);
        let json_limit = parse_var("JSON_PAYLOAD_LIMIT")?.unwrap_or(defaults.json_limit);

        let solver = match non_empty_var("SOLVER") {
            Some(name) => SolverType::from_str(&name).ok_or(ConfigError::UnknownSolver(name))?,
            None => defaults.solver,
        };

        let solve_timeout = parse_var::<u64>("SOLVE_TIMEOUT_MS")?
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis);
        let cache_size = parse_var::<usize>("SOLVE_CACHE_SIZE")?.and_then(NonZeroUsize::new);
        let problems_file = non_empty_var("PROBLEMS_FILE").map(PathBuf::from);

        let protect = parse_var::<bool>("PROTECT")?.unwrap_or(false);
        let api_key = if protect {
            Some(non_empty_var("API_KEY").ok_or(ConfigError::MissingApiKey)?)
        } else {
            None
        };

        Ok(Config {
            port,
            json_limit,
            solver,
            solve_timeout,
            cache_size,
            problems_file,
            api_key,
            sentry_dsn: non_empty_var("SENTRY_DSN"),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match non_empty_var(key) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(None),
    }
}
