//! Column projection against the canonical whitelist

use serde_json::{Map, Value};

use crate::CanonicalRecord;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("At least one output column must be requested")]
    NoColumns,

    #[error("Unknown columns requested: {}", .0.join(", "))]
    InvalidColumns(Vec<String>),
}

/// Validate a caller-supplied column list against the whitelist.
///
/// All-or-nothing: a single unknown entry rejects the whole list.
pub fn validate_columns(columns: &[String]) -> Result<(), ProjectionError> {
    if columns.is_empty() {
        return Err(ProjectionError::NoColumns);
    }

    let invalid: Vec<String> = columns
        .iter()
        .filter(|c| !CanonicalRecord::COLUMNS.contains(&c.as_str()))
        .cloned()
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ProjectionError::InvalidColumns(invalid))
    }
}

/// Project a record onto the requested columns, preserving caller order.
/// The output contains exactly the requested keys, value-or-null.
pub fn project(
    record: &CanonicalRecord,
    columns: &[String],
) -> Result<Map<String, Value>, ProjectionError> {
    validate_columns(columns)?;

    let mut projected = Map::with_capacity(columns.len());
    for column in columns {
        // validate_columns guarantees every entry is known
        let value = record.value_for(column).unwrap_or(Value::Null);
        projected.insert(column.clone(), value);
    }
    Ok(projected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn sample_record() -> CanonicalRecord {
        CanonicalRecord {
            entreprise_name: Some("ACME SAS".to_string()),
            phone_number: Some("0102030405".to_string()),
            siren_number: Some("123456789".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_column_list_rejected() {
        assert_eq!(validate_columns(&[]), Err(ProjectionError::NoColumns));
    }

    #[test]
    fn test_unknown_columns_listed() {
        let result = validate_columns(&columns(&["entreprise_name", "unknown_column"]));
        assert_eq!(
            result,
            Err(ProjectionError::InvalidColumns(vec![
                "unknown_column".to_string()
            ]))
        );
    }

    #[test]
    fn test_projection_preserves_caller_order() {
        let projected = project(
            &sample_record(),
            &columns(&["phone_number", "entreprise_name"]),
        )
        .unwrap();

        let keys: Vec<&str> = projected.keys().map(String::as_str).collect();
        assert_eq!(keys, ["phone_number", "entreprise_name"]);
    }

    #[test]
    fn test_projection_returns_exactly_requested_keys() {
        let projected = project(&sample_record(), &columns(&["siren_number"])).unwrap();
        assert_eq!(projected.len(), 1);
        assert_eq!(
            projected.get("siren_number").unwrap(),
            &serde_json::json!("123456789")
        );
    }

    #[test]
    fn test_absent_fields_project_as_null() {
        let projected = project(&sample_record(), &columns(&["email_address"])).unwrap();
        assert!(projected.get("email_address").unwrap().is_null());
    }

    #[test]
    fn test_full_whitelist_is_projectable() {
        let all = columns(&CanonicalRecord::COLUMNS);
        let projected = project(&sample_record(), &all).unwrap();
        assert_eq!(projected.len(), 14);
    }
}
