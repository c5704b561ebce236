//! Data models for enrichment queries and results

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static SIREN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{9}$").unwrap());
static SIRET_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{14}$").unwrap());

/// How a raw query string should be interpreted by provider adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Free-text company name
    Name,
    /// 9-digit national registry number
    Siren,
    /// 14-digit establishment registry number
    Siret,
}

impl QueryKind {
    /// Classify a raw query string. Anything that is not one of the two
    /// numeric patterns is a name; classification cannot fail.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if SIREN_PATTERN.is_match(trimmed) {
            QueryKind::Siren
        } else if SIRET_PATTERN.is_match(trimmed) {
            QueryKind::Siret
        } else {
            QueryKind::Name
        }
    }

    pub fn is_registry_number(&self) -> bool {
        matches!(self, QueryKind::Siren | QueryKind::Siret)
    }
}

/// One enrichment input. Created once per request or batch row, immutable.
#[derive(Debug, Clone)]
pub struct CompanyQuery {
    pub raw: String,
    pub kind: QueryKind,
    pub location: Option<String>,
}

impl CompanyQuery {
    pub fn new(raw: impl Into<String>, location: Option<String>) -> Self {
        let raw = raw.into().trim().to_string();
        let kind = QueryKind::classify(&raw);
        let location = location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Self { raw, kind, location }
    }

    /// A query shaped as a plain name lookup, used after a registry number
    /// has been resolved to a company name.
    pub fn name(raw: impl Into<String>, location: Option<String>) -> Self {
        Self {
            raw: raw.into(),
            kind: QueryKind::Name,
            location,
        }
    }
}

/// Which provider produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    Pappers,
    Gplaces,
}

/// Structured registered-address parts from the registry provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisteredAddress {
    pub street_number: Option<String>,
    pub street_type: Option<String>,
    pub street_name: Option<String>,
    pub complement: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl RegisteredAddress {
    /// Assemble a single display string. Absent or empty parts are skipped,
    /// never rendered as blanks.
    pub fn format(&self) -> Option<String> {
        let parts = [
            &self.street_number,
            &self.street_type,
            &self.street_name,
            &self.complement,
            &self.postal_code,
            &self.city,
            &self.country,
        ];
        let joined = parts
            .iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// Provider-native result bag. Each provider fills its own subset of fields;
/// an absent field is `None`, never an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub source: Option<ProviderSource>,

    pub company_name: Option<String>,
    pub legal_form: Option<String>,
    pub siren: Option<String>,
    pub siret: Option<String>,
    pub siret_formatted: Option<String>,
    pub naf_code: Option<String>,
    pub director_name: Option<String>,
    pub registered_address: Option<RegisteredAddress>,

    pub business_type: Option<String>,
    pub formatted_address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub reviews_count: Option<i64>,
    pub place_code: Option<String>,
}

/// The reconciled, provider-agnostic output schema. The serialized key set
/// is fixed and doubles as the projection whitelist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub entreprise_name: Option<String>,
    #[serde(rename = "type")]
    pub business_type: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub stars_count: Option<f64>,
    pub reviews_count: Option<i64>,
    pub siren_number: Option<String>,
    pub siret_number: Option<String>,
    pub naf_code: Option<String>,
    pub activite_principale: Option<String>,
    pub employees_count: Option<String>,
    pub full_name: Option<String>,
    pub email_address: Option<String>,
}

impl CanonicalRecord {
    /// Every column callers may request, in canonical order.
    pub const COLUMNS: [&'static str; 14] = [
        "entreprise_name",
        "type",
        "phone_number",
        "address",
        "website",
        "stars_count",
        "reviews_count",
        "siren_number",
        "siret_number",
        "naf_code",
        "activite_principale",
        "employees_count",
        "full_name",
        "email_address",
    ];

    /// True when no provider contributed any field ("no usable data").
    pub fn is_empty(&self) -> bool {
        self.entreprise_name.is_none()
            && self.business_type.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
            && self.website.is_none()
            && self.stars_count.is_none()
            && self.reviews_count.is_none()
            && self.siren_number.is_none()
            && self.siret_number.is_none()
            && self.naf_code.is_none()
            && self.activite_principale.is_none()
            && self.employees_count.is_none()
            && self.full_name.is_none()
            && self.email_address.is_none()
    }

    /// Value of a single canonical column as JSON (`Null` when absent).
    /// Unknown column names yield `None`; callers validate first.
    pub fn value_for(&self, column: &str) -> Option<serde_json::Value> {
        fn text(v: &Option<String>) -> serde_json::Value {
            v.as_deref().map_or(serde_json::Value::Null, Into::into)
        }

        let value = match column {
            "entreprise_name" => text(&self.entreprise_name),
            "type" => text(&self.business_type),
            "phone_number" => text(&self.phone_number),
            "address" => text(&self.address),
            "website" => text(&self.website),
            "stars_count" => self
                .stars_count
                .map_or(serde_json::Value::Null, |v| serde_json::json!(v)),
            "reviews_count" => self
                .reviews_count
                .map_or(serde_json::Value::Null, |v| serde_json::json!(v)),
            "siren_number" => text(&self.siren_number),
            "siret_number" => text(&self.siret_number),
            "naf_code" => text(&self.naf_code),
            "activite_principale" => text(&self.activite_principale),
            "employees_count" => text(&self.employees_count),
            "full_name" => text(&self.full_name),
            "email_address" => text(&self.email_address),
            _ => return None,
        };
        Some(value)
    }
}
