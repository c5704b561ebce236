use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            _ => Self::Dev,
        }
    }

    /// Returns the default data path for this environment
    pub fn default_data_path(&self) -> PathBuf {
        match self {
            Self::Dev => PathBuf::from("./data"),
            Self::Prod => PathBuf::from("/data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub env: Environment,
    pub data_path: PathBuf,
    pub database_url: String,
    pub max_connections: u32,

    /// Registry provider API token
    pub pappers_api_token: String,
    /// Directory provider API key
    pub gplaces_api_key: String,
    /// Base URL overrides, for tests and self-hosted mirrors
    pub pappers_base_url: Option<String>,
    pub gplaces_base_url: Option<String>,

    /// Rows in flight at once during batch enrichment. Kept low to respect
    /// provider rate limits.
    pub batch_concurrency: usize,
    /// Webhook target for job lifecycle notifications
    pub webhook_url: Option<String>,
}

impl Config {
    pub fn new(env: Environment, data_path: impl AsRef<Path>) -> Self {
        let data_path = data_path.as_ref().to_path_buf();
        let database_url = format!("sqlite:{}?mode=rwc", data_path.join("fiche.db").display());
        Self {
            env,
            data_path,
            database_url,
            max_connections: 5,
            pappers_api_token: String::new(),
            gplaces_api_key: String::new(),
            pappers_base_url: None,
            gplaces_base_url: None,
            batch_concurrency: 2,
            webhook_url: None,
        }
    }

    /// Build the configuration from environment variables.
    pub fn from_env() -> Self {
        let env = std::env::var("APP_ENV")
            .map(|v| Environment::from_str(&v))
            .unwrap_or_default();
        let data_path = std::env::var("DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env.default_data_path());

        let mut config = Self::new(env, data_path);
        config.pappers_api_token = std::env::var("PAPPERS_API_TOKEN").unwrap_or_default();
        config.gplaces_api_key = std::env::var("GPLACES_API_KEY").unwrap_or_default();
        config.pappers_base_url = std::env::var("PAPPERS_BASE_URL").ok();
        config.gplaces_base_url = std::env::var("GPLACES_BASE_URL").ok();
        config.webhook_url = std::env::var("WEBHOOK_URL").ok();
        if let Ok(concurrency) = std::env::var("BATCH_CONCURRENCY") {
            if let Ok(parsed) = concurrency.parse::<usize>() {
                config.batch_concurrency = parsed.max(1);
            }
        }
        config
    }

    /// Returns the path where batch output artifacts are written
    pub fn exports_path(&self) -> PathBuf {
        self.data_path.join("exports")
    }
}
