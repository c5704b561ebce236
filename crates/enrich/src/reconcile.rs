//! Field-level reconciliation of provider results
//!
//! The registry is authoritative for legal/identity fields; the directory is
//! authoritative for commercial/contact fields. The precedence is enumerated
//! field by field so it can be tested in isolation, rather than implied by
//! key-overwrite order in a dynamic merge.

use crate::{CanonicalRecord, ProviderRecord};

/// Merge an optional registry candidate and an optional directory listing
/// into one canonical record.
///
/// Both absent (or contributing nothing) yields the all-null record, which
/// the retry executor treats as "no usable data" and callers treat as
/// "not found".
pub fn reconcile(
    registry: Option<&ProviderRecord>,
    directory: Option<&ProviderRecord>,
) -> CanonicalRecord {
    let mut record = CanonicalRecord::default();

    if let Some(registry) = registry {
        record.entreprise_name = registry.company_name.clone();
        record.siren_number = registry.siren.clone();
        // Prefer the formatted establishment number over the raw one
        record.siret_number = registry
            .siret_formatted
            .clone()
            .or_else(|| registry.siret.clone());
        record.naf_code = registry.naf_code.clone();
        record.full_name = registry.director_name.clone();
        record.address = registry
            .registered_address
            .as_ref()
            .and_then(|address| address.format());
    }

    if let Some(directory) = directory {
        if directory.business_type.is_some() {
            record.business_type = directory.business_type.clone();
            // activite_principale mirrors the directory listing category
            record.activite_principale = directory.business_type.clone();
        }
        if directory.phone.is_some() {
            record.phone_number = directory.phone.clone();
        }
        if directory.website.is_some() {
            record.website = directory.website.clone();
        }
        if directory.rating.is_some() {
            record.stars_count = directory.rating;
        }
        if directory.reviews_count.is_some() {
            record.reviews_count = directory.reviews_count;
        }
        // The directory address only fills a gap the registry left
        if record.address.is_none() {
            record.address = directory.formatted_address.clone();
        }
    }

    // employees_count and email_address have no populating source today
    record
}
