//! Registry provider adapter

use std::sync::Arc;

use async_trait::async_trait;
use pappers::{Entreprise, PappersClient};

use super::clean;
use crate::{
    CompanyProvider, CompanyQuery, ProviderError, ProviderRecord, ProviderSource, QueryKind,
    RegisteredAddress,
};

/// Registry provider backed by the Pappers API.
pub struct PappersProvider {
    client: Arc<PappersClient>,
}

impl PappersProvider {
    pub fn new(client: Arc<PappersClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CompanyProvider for PappersProvider {
    async fn search(&self, query: &CompanyQuery) -> Result<Vec<ProviderRecord>, ProviderError> {
        match query.kind {
            QueryKind::Siren | QueryKind::Siret => {
                // A SIRET is the SIREN plus the 5-digit establishment code
                let siren = &query.raw[..9];
                let entreprise = self.client.entreprise(siren).await?;
                Ok(entreprise.into_iter().map(to_record).collect())
            }
            QueryKind::Name => {
                let response = self.client.recherche(&query.raw).await?;
                Ok(response.resultats.into_iter().map(to_record).collect())
            }
        }
    }

    fn name(&self) -> &'static str {
        "pappers"
    }
}

fn to_record(entreprise: Entreprise) -> ProviderRecord {
    let director_name = entreprise
        .representants
        .into_iter()
        .next()
        .and_then(|d| clean(d.nom_complet));

    let (siret, siret_formatted, registered_address) = match entreprise.siege {
        Some(siege) => {
            let address = RegisteredAddress {
                street_number: clean(siege.numero_voie),
                street_type: clean(siege.type_voie),
                street_name: clean(siege.libelle_voie),
                complement: clean(siege.complement_adresse),
                postal_code: clean(siege.code_postal),
                city: clean(siege.ville),
                country: clean(siege.pays),
            };
            let address = (address != RegisteredAddress::default()).then_some(address);
            (clean(siege.siret), clean(siege.siret_formate), address)
        }
        None => (None, None, None),
    };

    ProviderRecord {
        source: Some(ProviderSource::Pappers),
        company_name: clean(entreprise.nom_entreprise),
        legal_form: clean(entreprise.forme_juridique),
        siren: clean(entreprise.siren),
        siret,
        siret_formatted,
        naf_code: clean(entreprise.code_naf),
        director_name,
        registered_address,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pappers::{Dirigeant, Siege};

    #[test]
    fn test_to_record_maps_entity_fields() {
        let entreprise = Entreprise {
            siren: Some("123456789".to_string()),
            nom_entreprise: Some("ACME SAS".to_string()),
            forme_juridique: Some("SAS".to_string()),
            code_naf: Some("62.01Z".to_string()),
            siege: Some(Siege {
                siret: Some("12345678900012".to_string()),
                siret_formate: Some("123 456 789 00012".to_string()),
                numero_voie: Some("12".to_string()),
                type_voie: Some("RUE".to_string()),
                libelle_voie: Some("DE LA PAIX".to_string()),
                code_postal: Some("75002".to_string()),
                ville: Some("PARIS".to_string()),
                ..Default::default()
            }),
            representants: vec![Dirigeant {
                nom_complet: Some("Jean Dupont".to_string()),
                qualite: Some("Président".to_string()),
            }],
            ..Default::default()
        };

        let record = to_record(entreprise);
        assert_eq!(record.source, Some(ProviderSource::Pappers));
        assert_eq!(record.company_name.as_deref(), Some("ACME SAS"));
        assert_eq!(record.siret_formatted.as_deref(), Some("123 456 789 00012"));
        assert_eq!(record.director_name.as_deref(), Some("Jean Dupont"));
        assert_eq!(
            record.registered_address.unwrap().format().as_deref(),
            Some("12 RUE DE LA PAIX 75002 PARIS")
        );
        assert!(record.phone.is_none());
    }

    #[test]
    fn test_to_record_blank_strings_become_none() {
        let entreprise = Entreprise {
            nom_entreprise: Some("  ".to_string()),
            siege: Some(Siege::default()),
            ..Default::default()
        };

        let record = to_record(entreprise);
        assert!(record.company_name.is_none());
        assert!(record.registered_address.is_none());
    }
}
