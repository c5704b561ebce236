use serde::{Deserialize, Serialize};

/// Response of the text search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<Place>,
}

/// A listing candidate from text search. Only identity-level fields are
/// populated here; contact fields come from the details endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Place {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i64>,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Response of the place details endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceDetailsResponse {
    pub status: String,
    pub result: Option<PlaceDetails>,
}

/// Full listing detail for one place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i64>,
    #[serde(default)]
    pub types: Vec<String>,
}

impl PlaceDetails {
    /// Primary listing category, with internal markers filtered out.
    pub fn primary_type(&self) -> Option<&str> {
        self.types
            .iter()
            .map(|t| t.as_str())
            .find(|t| *t != "point_of_interest" && *t != "establishment")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_text_search() {
        let body = r#"{
            "status": "OK",
            "results": [{
                "place_id": "ChIJabc",
                "name": "ACME SAS",
                "formatted_address": "12 Rue de la Paix, 75002 Paris, France",
                "rating": 4.5,
                "user_ratings_total": 120,
                "types": ["point_of_interest", "restaurant"]
            }]
        }"#;

        let parsed: TextSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.results[0].rating, Some(4.5));
    }

    #[test]
    fn test_primary_type_skips_generic_markers() {
        let details = PlaceDetails {
            types: vec![
                "point_of_interest".to_string(),
                "establishment".to_string(),
                "bakery".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(details.primary_type(), Some("bakery"));
    }

    #[test]
    fn test_primary_type_none_when_only_generic() {
        let details = PlaceDetails {
            types: vec!["establishment".to_string()],
            ..Default::default()
        };
        assert_eq!(details.primary_type(), None);
    }
}
