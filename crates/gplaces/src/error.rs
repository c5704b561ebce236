#[derive(Debug, thiserror::Error)]
pub enum GplacesError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status_code}): {message}")]
    Api { status_code: u16, message: String },

    #[error("Places API returned status {0}")]
    Status(String),

    #[error("JSON decode error at {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}
