//! Error taxonomy for the patient lifecycle service.
//!
//! `PatientError` is the closed set of failures an operation can surface to a
//! caller. Collaborator failures (`RepositoryError`, `BillingError`) are
//! translated at the service boundary; they never leak through unchanged.

use std::collections::BTreeMap;

use uuid::Uuid;

/// Failures reported by the persistence store.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The store's unique-email index rejected a write.
    #[error("email already in use: {0}")]
    DuplicateEmail(String),
    /// The referenced record does not exist.
    #[error("no patient record with id {0}")]
    NotFound(Uuid),
    /// The store is unavailable or failed unexpectedly.
    #[error("patient store unavailable: {0}")]
    Unavailable(String),
}

/// Failures reported by the billing provisioning call.
///
/// Billing failures are logged by the service and never surfaced to the
/// caller of a lifecycle operation.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("invalid billing endpoint: {0}")]
    Endpoint(String),
    #[error("billing RPC failed: {0}")]
    Rpc(String),
}

/// Domain errors surfaced by patient lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    /// Field-level shape violations, keyed by external field name.
    #[error("request validation failed")]
    Validation(BTreeMap<String, String>),
    /// A date string did not parse as an ISO `YYYY-MM-DD` date.
    #[error("invalid date in {field}: {value}")]
    InvalidDateFormat { field: &'static str, value: String },
    /// The email is already associated with another patient.
    #[error("a patient with this email already exists: {0}")]
    EmailAlreadyExists(String),
    /// The referenced patient does not exist.
    #[error("patient not found with id {0}")]
    PatientNotFound(Uuid),
    /// The persistence store failed; not retried, propagated as a server error.
    #[error("repository failure: {0}")]
    Repository(String),
}

impl PatientError {
    /// Renders the field-keyed payload returned to clients.
    ///
    /// Uniqueness and not-found errors use fixed messages so no internal
    /// detail leaks; the shape is identical no matter which operation
    /// produced the error.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        match self {
            PatientError::Validation(errors) => errors.clone(),
            PatientError::InvalidDateFormat { field, .. } => one(
                field,
                "Must be a valid date in YYYY-MM-DD format.",
            ),
            PatientError::EmailAlreadyExists(_) => one("email", "Email address already exists"),
            PatientError::PatientNotFound(_) => one("patient", "Patient not found"),
            PatientError::Repository(_) => one("error", "Internal server error"),
        }
    }
}

fn one(field: &str, message: &str) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    errors.insert(field.to_owned(), message.to_owned());
    errors
}

impl From<RepositoryError> for PatientError {
    /// Store-reported outcomes keep their domain meaning: a late unique-index
    /// violation at save time is the same `EmailAlreadyExists` the pre-flight
    /// check produces, and a not-found report becomes `PatientNotFound`.
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail(email) => PatientError::EmailAlreadyExists(email),
            RepositoryError::NotFound(id) => PatientError::PatientNotFound(id),
            RepositoryError::Unavailable(detail) => PatientError::Repository(detail),
        }
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_exists_payload_is_fixed() {
        let err = PatientError::EmailAlreadyExists("ana@x.com".into());
        let errors = err.field_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("Email address already exists")
        );
    }

    #[test]
    fn repository_error_payload_hides_detail() {
        let err = PatientError::Repository("connection refused to 10.0.0.3".into());
        let errors = err.field_errors();
        assert_eq!(
            errors.get("error").map(String::as_str),
            Some("Internal server error")
        );
        assert!(!errors.values().any(|m| m.contains("10.0.0.3")));
    }

    #[test]
    fn duplicate_email_from_store_maps_to_email_already_exists() {
        let err = PatientError::from(RepositoryError::DuplicateEmail("ana@x.com".into()));
        assert!(matches!(err, PatientError::EmailAlreadyExists(email) if email == "ana@x.com"));
    }
}
