use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Upper bound for the SQLite connection pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Directory exported reports are written to
    #[serde(default = "default_report_dir")]
    pub report_dir: String,

    /// File the tracing output goes to; the terminal belongs to the UI
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_database_url() -> String {
    "sqlite:time_tracker.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_report_dir() -> String {
    "reports".to_string()
}

fn default_log_file() -> String {
    "time_tracker.log".to_string()
}

/// Values given on the command line take precedence over the environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub database_url: Option<String>,
    pub report_dir: Option<String>,
    pub log_file: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.database_url {
            self.database_url = url;
        }
        if let Some(dir) = overrides.report_dir {
            self.report_dir = dir;
        }
        if let Some(file) = overrides.log_file {
            self.log_file = file;
        }
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Initialize environment variables and load configuration
pub fn init(overrides: Overrides) -> Result<Config> {
    let mut config = Config::load()?;
    config.apply(overrides);

    Ok(config)
}
