//! Conversions between external shapes and the patient entity.
//!
//! Both directions are pure. Date parsing is the only fallible step and its
//! failure is a client-input error, never a server error.

use chrono::NaiveDate;

use crate::dto::{PatientRequest, PatientResponse};
use crate::error::{PatientError, PatientResult};
use crate::patient::Patient;

/// Parses an ISO `YYYY-MM-DD` date string from the named external field.
pub(crate) fn parse_iso_date(field: &'static str, value: &str) -> PatientResult<NaiveDate> {
    value
        .parse::<NaiveDate>()
        .map_err(|_| PatientError::InvalidDateFormat {
            field,
            value: value.to_owned(),
        })
}

/// Builds a not-yet-persisted entity from a create request.
///
/// Copies name/email/address verbatim and parses both date strings. The
/// identifier stays unassigned; the store allocates it at save time.
///
/// # Errors
///
/// Returns `PatientError::InvalidDateFormat` if either date string is missing
/// or not a valid ISO date.
pub fn to_entity(request: &PatientRequest) -> PatientResult<Patient> {
    let date_of_birth = parse_iso_date("dateOfBirth", &request.date_of_birth)?;

    // A missing registration date cannot parse, so it shares the single
    // failure mode of every other date problem.
    let registered = request.registered_date.as_deref().unwrap_or_default();
    let registered_date = parse_iso_date("registeredDate", registered)?;

    Ok(Patient {
        id: None,
        name: request.name.clone(),
        email: request.email.clone(),
        address: request.address.clone(),
        date_of_birth,
        registered_date,
    })
}

/// Projects an entity into the response shape.
///
/// The identifier renders as a string (empty for a not-yet-persisted entity;
/// the service only maps persisted ones). The registration date is
/// intentionally dropped.
pub fn to_response(patient: &Patient) -> PatientResponse {
    PatientResponse {
        id: patient.id.map(|id| id.to_string()).unwrap_or_default(),
        name: patient.name.clone(),
        email: patient.email.clone(),
        address: patient.address.clone(),
        date_of_birth: patient.date_of_birth.to_string(),
    }
}
