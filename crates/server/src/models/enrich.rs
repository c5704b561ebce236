use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for single-query enrichment
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichRequest {
    pub query: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Canonical columns to include in the response, in caller order
    #[serde(default)]
    pub rows: Vec<String>,
}

/// Success envelope for single-query enrichment
#[derive(Debug, Clone, Serialize)]
pub struct EnrichResponse {
    pub error: bool,
    pub status: u16,
    pub message: String,
    pub data: Map<String, Value>,
}

impl EnrichResponse {
    pub fn ok(message: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            error: false,
            status: 200,
            message: message.into(),
            data,
        }
    }
}
