//! Directory/map provider adapter

use std::sync::Arc;

use async_trait::async_trait;
use gplaces::{GplacesClient, Place, PlaceDetails};

use super::clean;
use crate::{CompanyProvider, CompanyQuery, ProviderError, ProviderRecord, ProviderSource};

/// Directory provider backed by the Places API.
///
/// Returns at most one best-match listing. A listing whose contact fields
/// could not be extracted still counts as a result (all-unknown fields),
/// which is distinct from total absence.
pub struct GplacesProvider {
    client: Arc<GplacesClient>,
}

impl GplacesProvider {
    pub fn new(client: Arc<GplacesClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CompanyProvider for GplacesProvider {
    async fn search(&self, query: &CompanyQuery) -> Result<Vec<ProviderRecord>, ProviderError> {
        let text = match &query.location {
            Some(location) => format!("{} {}", query.raw, location),
            None => query.raw.clone(),
        };

        let response = self.client.text_search(&text).await?;
        let Some(candidate) = response.results.into_iter().next() else {
            return Ok(Vec::new());
        };

        let details = match candidate.place_id.as_deref() {
            Some(place_id) => self.client.details(place_id).await?,
            None => None,
        };

        Ok(vec![to_record(candidate, details)])
    }

    fn name(&self) -> &'static str {
        "gplaces"
    }
}

fn to_record(candidate: Place, details: Option<PlaceDetails>) -> ProviderRecord {
    let business_type = details
        .as_ref()
        .and_then(|d| d.primary_type())
        .or_else(|| {
            candidate
                .types
                .iter()
                .map(String::as_str)
                .find(|t| *t != "point_of_interest" && *t != "establishment")
        })
        .map(ToString::to_string);

    let details = details.unwrap_or_default();

    ProviderRecord {
        source: Some(ProviderSource::Gplaces),
        company_name: clean(details.name).or_else(|| clean(candidate.name)),
        business_type,
        formatted_address: clean(details.formatted_address)
            .or_else(|| clean(candidate.formatted_address)),
        phone: clean(details.formatted_phone_number),
        website: clean(details.website),
        rating: details.rating.or(candidate.rating),
        reviews_count: details.user_ratings_total.or(candidate.user_ratings_total),
        place_code: clean(details.place_id).or_else(|| clean(candidate.place_id)),
        ..Default::default()
    }
}
