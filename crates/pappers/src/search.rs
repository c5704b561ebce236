use crate::models::{Entreprise, RechercheResponse};
use crate::PappersClient;

impl PappersClient {
    /// Full-text search over registered entities.
    pub async fn recherche(&self, query: &str) -> crate::Result<RechercheResponse> {
        let url = self.url("/recherche");
        let response = self
            .client()
            .get(&url)
            .query(&[("api_token", self.api_token()), ("q", query)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Fetch the detail record for a single SIREN.
    ///
    /// Returns `None` when the registry has no entity for the number
    /// (the API signals this with a 404).
    pub async fn entreprise(&self, siren: &str) -> crate::Result<Option<Entreprise>> {
        let url = self.url("/entreprise");
        let response = self
            .client()
            .get(&url)
            .query(&[("api_token", self.api_token()), ("siren", siren)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let entreprise = self.handle_response(response).await?;
        Ok(Some(entreprise))
    }
}
