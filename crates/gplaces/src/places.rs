use crate::models::{PlaceDetails, PlaceDetailsResponse, TextSearchResponse};
use crate::{GplacesClient, GplacesError};

const DETAIL_FIELDS: &str =
    "place_id,name,formatted_address,formatted_phone_number,website,rating,user_ratings_total,types";

impl GplacesClient {
    /// Free-text listing search. `ZERO_RESULTS` is an empty list, not an error.
    pub async fn text_search(&self, query: &str) -> crate::Result<TextSearchResponse> {
        let url = self.url("/textsearch/json");
        let response = self
            .client()
            .get(&url)
            .query(&[("key", self.api_key()), ("query", query)])
            .send()
            .await?;

        let parsed: TextSearchResponse = self.handle_response(response).await?;
        match parsed.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(parsed),
            other => Err(GplacesError::Status(other.to_string())),
        }
    }

    /// Fetch contact-level detail for one listing.
    pub async fn details(&self, place_id: &str) -> crate::Result<Option<PlaceDetails>> {
        let url = self.url("/details/json");
        let response = self
            .client()
            .get(&url)
            .query(&[
                ("key", self.api_key()),
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
            ])
            .send()
            .await?;

        let parsed: PlaceDetailsResponse = self.handle_response(response).await?;
        match parsed.status.as_str() {
            "OK" => Ok(parsed.result),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(None),
            other => Err(GplacesError::Status(other.to_string())),
        }
    }
}
