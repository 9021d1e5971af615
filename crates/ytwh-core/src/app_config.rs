use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Colored terminal output is for interactive development runs only.
    /// Scheduled production runs and test runs log plain text.
    #[must_use]
    pub fn ansi_logs(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings, built once in `main` and passed down explicitly.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    /// Required by the `etl` commands only; `db ping` runs without it.
    pub youtube_api_key: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub api_base_url: String,
    pub api_timeout_secs: u64,
    pub api_user_agent: String,
    pub region_code: String,
    pub language: String,
    /// Per-call ID cap for batch lookups. The API rejects more than 50.
    pub batch_size: usize,
    pub handoff_path: PathBuf,
    pub truncate_duration_days: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("api_base_url", &self.api_base_url)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("api_user_agent", &self.api_user_agent)
            .field("region_code", &self.region_code)
            .field("language", &self.language)
            .field("batch_size", &self.batch_size)
            .field("handoff_path", &self.handoff_path)
            .field("truncate_duration_days", &self.truncate_duration_days)
            .finish()
    }
}
