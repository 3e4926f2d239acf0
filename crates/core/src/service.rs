//! Patient lifecycle service.
//!
//! Orchestrates the repository and billing contracts and owns the sequencing
//! rules: the email-uniqueness check runs before any write, and the billing
//! provisioning call runs only after the record is durably saved.

use std::sync::Arc;

use uuid::Uuid;

use crate::billing::BillingClient;
use crate::dto::{PatientRequest, PatientResponse};
use crate::error::{PatientError, PatientResult};
use crate::mapper;
use crate::patient::Patient;
use crate::repository::PatientRepository;

/// Patient lifecycle operations over explicit collaborators.
#[derive(Clone)]
pub struct PatientService {
    repository: Arc<dyn PatientRepository>,
    billing: Arc<dyn BillingClient>,
}

impl PatientService {
    pub fn new(repository: Arc<dyn PatientRepository>, billing: Arc<dyn BillingClient>) -> Self {
        Self {
            repository,
            billing,
        }
    }

    /// Returns all patients in the store's natural order.
    ///
    /// # Errors
    ///
    /// `PatientError::Repository` if the store is unavailable.
    pub async fn list_patients(&self) -> PatientResult<Vec<PatientResponse>> {
        let patients = self.repository.find_all().await?;
        Ok(patients.iter().map(mapper::to_response).collect())
    }

    /// Creates a patient and provisions its billing account.
    ///
    /// Sequencing: shape validation, then the email pre-check (no entity is
    /// built and no billing call happens on a duplicate), then mapping, then
    /// the save. The billing call runs only after a successful save; its
    /// failure is logged and never alters the outcome.
    ///
    /// # Errors
    ///
    /// `Validation`, `EmailAlreadyExists`, `InvalidDateFormat`, or
    /// `Repository`.
    pub async fn create_patient(&self, request: PatientRequest) -> PatientResult<PatientResponse> {
        let request = request.normalized();
        request.validate_create()?;

        if self.repository.exists_by_email(&request.email).await? {
            return Err(PatientError::EmailAlreadyExists(request.email));
        }

        let entity = mapper::to_entity(&request)?;
        let saved = self.repository.save(entity).await?;
        let id = saved
            .id
            .ok_or_else(|| PatientError::Repository("store returned an unassigned id".into()))?;

        if let Err(err) = self
            .billing
            .create_billing_account(id, &saved.name, &saved.email)
            .await
        {
            tracing::warn!("billing account provisioning failed for patient {id}: {err}");
        }

        Ok(mapper::to_response(&saved))
    }

    /// Updates an existing patient.
    ///
    /// Loads the entity, re-checks email uniqueness excluding the patient
    /// itself, then saves an updated copy. The registration date of the
    /// stored record is never altered, whatever the request carries.
    ///
    /// # Errors
    ///
    /// `Validation`, `PatientNotFound`, `EmailAlreadyExists`,
    /// `InvalidDateFormat`, or `Repository`.
    pub async fn update_patient(
        &self,
        id: Uuid,
        request: PatientRequest,
    ) -> PatientResult<PatientResponse> {
        let request = request.normalized();
        request.validate_update()?;

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(PatientError::PatientNotFound(id))?;

        if self
            .repository
            .exists_by_email_excluding(&request.email, id)
            .await?
        {
            return Err(PatientError::EmailAlreadyExists(request.email));
        }

        let date_of_birth = mapper::parse_iso_date("dateOfBirth", &request.date_of_birth)?;
        let updated = Patient {
            name: request.name,
            email: request.email,
            address: request.address,
            date_of_birth,
            ..existing
        };

        let saved = self.repository.save(updated).await?;
        Ok(mapper::to_response(&saved))
    }

    /// Deletes a patient by id.
    ///
    /// Deleting an unknown id fails with `PatientNotFound`; the delete is not
    /// idempotent from the caller's perspective.
    ///
    /// # Errors
    ///
    /// `PatientNotFound` or `Repository`.
    pub async fn delete_patient(&self, id: Uuid) -> PatientResult<()> {
        self.repository.delete_by_id(id).await?;
        Ok(())
    }
}
