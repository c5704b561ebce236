use serde::{Deserialize, Serialize};

/// Response of the full-text company search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RechercheResponse {
    #[serde(default)]
    pub resultats: Vec<Entreprise>,
    #[serde(default)]
    pub total: i64,
}

/// A legal entity as returned by the registry.
///
/// Fields are optional because the search endpoint returns a reduced
/// projection compared to the per-SIREN detail endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entreprise {
    pub siren: Option<String>,
    pub siren_formate: Option<String>,
    pub nom_entreprise: Option<String>,
    pub forme_juridique: Option<String>,
    pub code_naf: Option<String>,
    pub libelle_code_naf: Option<String>,
    pub siege: Option<Siege>,
    #[serde(default)]
    pub representants: Vec<Dirigeant>,
}

/// Registered head office of an entity, with structured address parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Siege {
    pub siret: Option<String>,
    pub siret_formate: Option<String>,
    pub numero_voie: Option<String>,
    pub type_voie: Option<String>,
    pub libelle_voie: Option<String>,
    pub complement_adresse: Option<String>,
    pub code_postal: Option<String>,
    pub ville: Option<String>,
    pub pays: Option<String>,
}

/// A directing person attached to an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dirigeant {
    pub nom_complet: Option<String>,
    pub qualite: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_recherche_response() {
        let body = r#"{
            "total": 1,
            "resultats": [{
                "siren": "123456789",
                "siren_formate": "123 456 789",
                "nom_entreprise": "ACME SAS",
                "forme_juridique": "SAS",
                "code_naf": "62.01Z",
                "siege": {
                    "siret": "12345678900012",
                    "siret_formate": "123 456 789 00012",
                    "numero_voie": "12",
                    "type_voie": "RUE",
                    "libelle_voie": "DE LA PAIX",
                    "code_postal": "75002",
                    "ville": "PARIS"
                },
                "representants": [{"nom_complet": "Jean Dupont", "qualite": "Président"}]
            }]
        }"#;

        let parsed: RechercheResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.total, 1);
        let first = &parsed.resultats[0];
        assert_eq!(first.nom_entreprise.as_deref(), Some("ACME SAS"));
        assert_eq!(
            first.siege.as_ref().unwrap().siret.as_deref(),
            Some("12345678900012")
        );
        assert_eq!(
            first.representants[0].nom_complet.as_deref(),
            Some("Jean Dupont")
        );
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let body = r#"{"resultats": [{"siren": "987654321"}]}"#;
        let parsed: RechercheResponse = serde_json::from_str(body).unwrap();
        let first = &parsed.resultats[0];
        assert!(first.nom_entreprise.is_none());
        assert!(first.siege.is_none());
        assert!(first.representants.is_empty());
    }
}
