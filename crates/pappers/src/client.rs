use reqwest::Client;

use crate::error::PappersError;

const BASE_URL: &str = "https://api.pappers.fr/v2";

pub struct PappersClient {
    client: Client,
    api_token: String,
    base_url: String,
}

impl PappersClient {
    /// Create a PappersClient backed by the given reqwest Client.
    pub fn new(client: Client, api_token: impl Into<String>) -> Self {
        Self {
            client,
            api_token: api_token.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (used for tests and self-hosted mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn api_token(&self) -> &str {
        &self.api_token
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> crate::Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PappersError::Api {
                status_code: status.as_u16(),
                message: body,
            });
        }
        let deserializer = &mut serde_json::Deserializer::from_str(&body);
        serde_path_to_error::deserialize(deserializer).map_err(|e| PappersError::Json {
            path: e.path().to_string(),
            source: e.into_inner(),
        })
    }
}
