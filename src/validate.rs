use log::error;
use thiserror::Error;

use crate::event::Event;

/// Ways a run request can fail validation.
///
/// Only the first violation found is reported: mode checks run before field
/// set checks, and missing fields are reported before unexpected ones.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: mode")]
    MissingMode,
    #[error("Received an unexpected mode: {mode}. Available modes are: {}", .allowed.join(", "))]
    UnknownMode {
        mode: String,
        allowed: &'static [&'static str],
    },
    #[error("Missing required {}: {}", plurality(.0), .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Found unexpected {}: {}", plurality(.0), .0.join(", "))]
    UnexpectedFields(Vec<String>),
}

fn plurality(fields: &[String]) -> &'static str {
    if fields.len() > 1 {
        "parameters"
    } else {
        "parameter"
    }
}

/// Check that the fields present in `event` exactly match `required`.
///
/// The request is never mutated; success carries no payload. A request
/// holding a superset of `required` is rejected even if the extra fields are
/// valid names for some other pipeline or mode.
pub fn validate(event: &Event, required: &[&str]) -> Result<(), ValidationError> {
    let mut missing: Vec<String> = required
        .iter()
        .filter(|field| !event.contains(field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(fail(ValidationError::MissingFields(missing)));
    }

    // event keys iterate in sorted order
    let extra: Vec<String> = event
        .keys()
        .filter(|field| !required.contains(field))
        .map(str::to_string)
        .collect();
    if !extra.is_empty() {
        return Err(fail(ValidationError::UnexpectedFields(extra)));
    }

    Ok(())
}

/// Log a validation failure once at the point of detection
pub fn fail(err: ValidationError) -> ValidationError {
    error!("{err}");
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: &[&str] = &["library_id", "portal_run_id", "subject_id"];

    fn complete_event() -> Event {
        Event::from([
            ("portal_run_id", "R1"),
            ("subject_id", "S1"),
            ("library_id", "L1"),
        ])
    }

    #[test]
    fn accepts_exact_field_set() {
        assert_eq!(validate(&complete_event(), REQUIRED), Ok(()));
    }

    #[test]
    fn reports_single_missing_field_by_name() {
        let event = Event::from([("portal_run_id", "R1"), ("subject_id", "S1")]);
        assert_eq!(
            validate(&event, REQUIRED),
            Err(ValidationError::MissingFields(vec!["library_id".to_string()]))
        );
    }

    #[test]
    fn reports_single_extra_field_by_name() {
        let event = Event::from([
            ("portal_run_id", "R1"),
            ("subject_id", "S1"),
            ("library_id", "L1"),
            ("extra_field", "x"),
        ]);
        assert_eq!(
            validate(&event, REQUIRED),
            Err(ValidationError::UnexpectedFields(vec![
                "extra_field".to_string()
            ]))
        );
    }

    #[test]
    fn missing_fields_take_priority_over_extra_fields() {
        let event = Event::from([("portal_run_id", "R1"), ("unrelated", "x")]);
        assert_eq!(
            validate(&event, REQUIRED),
            Err(ValidationError::MissingFields(vec![
                "library_id".to_string(),
                "subject_id".to_string(),
            ]))
        );
    }

    #[test]
    fn field_lists_are_sorted() {
        let event = Event::from([("z_field", "1"), ("a_field", "2")]);
        match validate(&event, &["subject_id", "portal_run_id"]) {
            Err(ValidationError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["portal_run_id", "subject_id"])
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn messages_inflect_for_plurality() {
        let one = ValidationError::MissingFields(vec!["subject_id".to_string()]);
        assert_eq!(one.to_string(), "Missing required parameter: subject_id");

        let two = ValidationError::UnexpectedFields(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(two.to_string(), "Found unexpected parameters: a, b");
    }
}
