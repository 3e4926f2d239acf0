//! Request and response shapes for patient operations.
//!
//! These are transient projections of the entity: validated on entry, never
//! persisted directly. Field names follow the external JSON contract
//! (camelCase).

use std::collections::BTreeMap;

use patient_types::{EmailAddress, NonEmptyText, TextError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{PatientError, PatientResult};

/// Maximum accepted length of a patient name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Incoming patient data for create and update operations.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientRequest {
    /// Full name of the patient.
    #[schema(example = "Ana Ruiz")]
    pub name: String,
    /// Email address of the patient.
    #[schema(example = "ana@x.com")]
    pub email: String,
    /// Residential address of the patient.
    #[schema(example = "1 Rd")]
    pub address: String,
    /// Date of birth in YYYY-MM-DD format.
    #[schema(example = "1990-01-01")]
    pub date_of_birth: String,
    /// Registration date in YYYY-MM-DD format. Required on create; carried
    /// but ignored on update, since the stored value is immutable.
    #[schema(example = "2025-04-17")]
    pub registered_date: Option<String>,
}

/// Patient data returned to callers.
///
/// The registration date is deliberately not exposed.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    /// Store-assigned identifier.
    #[schema(example = "f47ac10b-58cc-4372-a567-0e02b2c3d479")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    /// Date of birth in YYYY-MM-DD format.
    pub date_of_birth: String,
}

impl PatientRequest {
    /// Returns a copy with surrounding whitespace removed from every field.
    ///
    /// Lifecycle operations normalise before validating, so the values the
    /// checks accept are exactly the values that reach the store. Without
    /// this, `" ana@x.com"` would pass the (trimming) syntax check yet be
    /// persisted padded, slipping past the unique-email index.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            address: self.address.trim().to_owned(),
            date_of_birth: self.date_of_birth.trim().to_owned(),
            registered_date: self
                .registered_date
                .as_deref()
                .map(|date| date.trim().to_owned()),
        }
    }

    /// Validates the shape of a create request.
    ///
    /// Collects every field violation into one `PatientError::Validation`
    /// rather than failing on the first, so clients see the full picture.
    pub fn validate_create(&self) -> PatientResult<()> {
        let mut errors = self.field_errors();

        match self.registered_date.as_deref().map(str::trim) {
            None | Some("") => {
                errors.insert("registeredDate".into(), "Registered date is required.".into());
            }
            Some(_) => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PatientError::Validation(errors))
        }
    }

    /// Validates the shape of an update request.
    ///
    /// Identical to [`validate_create`](Self::validate_create) except that the
    /// registration date is not required: it is not part of the update
    /// contract.
    pub fn validate_update(&self) -> PatientResult<()> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PatientError::Validation(errors))
        }
    }

    fn field_errors(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();

        match NonEmptyText::bounded(&self.name, MAX_NAME_LEN) {
            Err(TextError::Empty) => {
                errors.insert("name".into(), "Name is required.".into());
            }
            Err(TextError::TooLong { .. }) => {
                errors.insert("name".into(), "Cannot exceed 100 characters.".into());
            }
            Err(TextError::InvalidEmail) | Ok(_) => {}
        }

        match EmailAddress::parse(&self.email) {
            Err(TextError::Empty) => {
                errors.insert("email".into(), "Email is required.".into());
            }
            Err(_) => {
                errors.insert("email".into(), "Email should be valid.".into());
            }
            Ok(_) => {}
        }

        if NonEmptyText::new(&self.address).is_err() {
            errors.insert("address".into(), "Address is required.".into());
        }

        if self.date_of_birth.trim().is_empty() {
            errors.insert("dateOfBirth".into(), "Date of birth is required.".into());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> PatientRequest {
        PatientRequest {
            name: "Ana Ruiz".into(),
            email: "ana@x.com".into(),
            address: "1 Rd".into(),
            date_of_birth: "1990-01-01".into(),
            registered_date: Some("2025-04-17".into()),
        }
    }

    #[test]
    fn valid_request_passes_both_modes() {
        let request = valid_request();
        assert!(request.validate_create().is_ok());
        assert!(request.validate_update().is_ok());
    }

    #[test]
    fn blank_fields_are_all_reported() {
        let request = PatientRequest {
            name: " ".into(),
            email: "".into(),
            address: "".into(),
            date_of_birth: "".into(),
            registered_date: None,
        };

        let err = request.validate_create().unwrap_err();
        let PatientError::Validation(errors) = err else {
            panic!("expected Validation error");
        };

        assert_eq!(
            errors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["address", "dateOfBirth", "email", "name", "registeredDate"]
        );
        assert_eq!(errors.get("name").map(String::as_str), Some("Name is required."));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let mut request = valid_request();
        request.name = "x".repeat(MAX_NAME_LEN + 1);

        let err = request.validate_create().unwrap_err();
        let PatientError::Validation(errors) = err else {
            panic!("expected Validation error");
        };
        assert_eq!(
            errors.get("name").map(String::as_str),
            Some("Cannot exceed 100 characters.")
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut request = valid_request();
        request.email = "not-an-email".into();

        let err = request.validate_update().unwrap_err();
        let PatientError::Validation(errors) = err else {
            panic!("expected Validation error");
        };
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("Email should be valid.")
        );
    }

    #[test]
    fn normalized_strips_surrounding_whitespace() {
        let request = PatientRequest {
            name: "  Ana Ruiz ".into(),
            email: " ana@x.com ".into(),
            address: " 1 Rd ".into(),
            date_of_birth: " 1990-01-01 ".into(),
            registered_date: Some(" 2025-04-17 ".into()),
        };

        let normalized = request.normalized();
        assert_eq!(normalized.name, "Ana Ruiz");
        assert_eq!(normalized.email, "ana@x.com");
        assert_eq!(normalized.address, "1 Rd");
        assert_eq!(normalized.date_of_birth, "1990-01-01");
        assert_eq!(normalized.registered_date.as_deref(), Some("2025-04-17"));
    }

    #[test]
    fn update_does_not_require_registered_date() {
        let mut request = valid_request();
        request.registered_date = None;

        assert!(request.validate_update().is_ok());
        assert!(request.validate_create().is_err());
    }
}
