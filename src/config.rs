use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DB_PATH: &str = "football.sqlite";
const DEFAULT_POOL_SIZE: usize = 4;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub db_path: PathBuf,
    /// Idle connections kept by the store between queries.
    pub pool_size: usize,
    pub busy_timeout: Duration,
    pub log_filter: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            pool_size: DEFAULT_POOL_SIZE,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl StatsConfig {
    /// Reads `.env` (if any) and the `STATS_*` environment variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `STATS_*` values supplied by `lookup`. Blank or
    /// unparseable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = present("STATS_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));
        let pool_size = present("STATS_DB_POOL_SIZE")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_POOL_SIZE)
            .max(1);
        let busy_timeout_ms = present("STATS_DB_BUSY_TIMEOUT_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);
        let log_filter = present("STATS_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            db_path,
            pool_size,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
            log_filter,
        }
    }

    pub fn with_db_path(mut self, path: PathBuf) -> Self {
        self.db_path = path;
        self
    }
}
