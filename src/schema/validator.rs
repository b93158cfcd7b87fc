//! Batch shape validation
//!
//! Every row's case-folded field names must contain every case-folded
//! expected field. Extra fields are allowed. One failing row rejects the
//! whole batch, and a missing descriptor rejects it too.

use std::collections::HashSet;

use super::descriptor::SchemaDescriptor;
use super::errors::ValidationFailure;
use crate::template::RowBatch;

/// Validates row batches against schema descriptors. Stateless.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Check `batch` against `descriptor`.
    ///
    /// `endpoint` only names the endpoint in the failure.
    pub fn validate(
        endpoint: &str,
        descriptor: Option<&SchemaDescriptor>,
        batch: &RowBatch,
    ) -> Result<(), ValidationFailure> {
        let descriptor =
            descriptor.ok_or_else(|| ValidationFailure::UnknownDescriptor(endpoint.to_string()))?;

        if batch.is_empty() {
            return Err(ValidationFailure::EmptyBatch);
        }

        for (index, row) in batch.iter().enumerate() {
            let present: HashSet<String> = row.keys().map(|k| k.to_lowercase()).collect();
            let missing: Vec<String> = descriptor
                .folded()
                .filter(|(folded, _)| !present.contains(folded))
                .map(|(_, original)| original.to_string())
                .collect();

            if !missing.is_empty() {
                return Err(ValidationFailure::MissingFields {
                    row: index + 1,
                    missing,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::RowPayload;
    use serde_json::{json, Value};

    fn batch(rows: Vec<Value>) -> RowBatch {
        RowBatch::new(
            rows.into_iter()
                .map(|v| v.as_object().cloned().unwrap())
                .collect::<Vec<RowPayload>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_all_fields_present() {
        let d = SchemaDescriptor::new(["a", "b"]);
        let b = batch(vec![json!({"a": 1, "b": 2}), json!({"b": 3, "a": 4})]);
        assert!(SchemaValidator::validate("t", Some(&d), &b).is_ok());
    }

    #[test]
    fn test_case_insensitive_match_still_reports_missing() {
        let d = SchemaDescriptor::new(["a", "b"]);
        let b = batch(vec![json!({"A": 1})]);

        let err = SchemaValidator::validate("t", Some(&d), &b).unwrap_err();
        assert_eq!(
            err,
            ValidationFailure::MissingFields {
                row: 1,
                missing: vec!["b".into()]
            }
        );
    }

    #[test]
    fn test_mixed_case_is_accepted() {
        let d = SchemaDescriptor::new(["Param1", "param2"]);
        let b = batch(vec![json!({"PARAM1": "x", "Param2": "y"})]);
        assert!(SchemaValidator::validate("t", Some(&d), &b).is_ok());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let d = SchemaDescriptor::new(["a"]);
        let b = batch(vec![json!({"a": 1, "unexpected": true})]);
        assert!(SchemaValidator::validate("t", Some(&d), &b).is_ok());
    }

    #[test]
    fn test_one_bad_row_rejects_batch() {
        let d = SchemaDescriptor::new(["a"]);
        let b = batch(vec![json!({"a": 1}), json!({"z": 2}), json!({"a": 3})]);

        let err = SchemaValidator::validate("t", Some(&d), &b).unwrap_err();
        assert!(matches!(err, ValidationFailure::MissingFields { row: 2, .. }));
    }

    #[test]
    fn test_unknown_descriptor_fails_closed() {
        let b = batch(vec![json!({"a": 1})]);
        let err = SchemaValidator::validate("orders", None, &b).unwrap_err();
        assert_eq!(err, ValidationFailure::UnknownDescriptor("orders".into()));
    }
}
