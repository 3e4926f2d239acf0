//! Persistence contract for patient records, with the in-memory reference store.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::RepositoryError;
use crate::patient::Patient;

/// Contract the lifecycle service requires from the persistence store.
///
/// `find_all` returns records in the store's natural order; the order carries
/// no semantic meaning. `save` inserts when the entity's id is unassigned
/// (the store allocates one) and updates otherwise. The store owns the
/// authoritative unique-email index: a conflicting write fails with
/// [`RepositoryError::DuplicateEmail`] even if a pre-flight existence check
/// passed.
#[tonic::async_trait]
pub trait PatientRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Patient>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, RepositoryError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;

    /// Like [`exists_by_email`](Self::exists_by_email), but ignores the record
    /// with the given id, so a patient can keep their own current email.
    async fn exists_by_email_excluding(&self, email: &str, id: Uuid)
        -> Result<bool, RepositoryError>;

    async fn save(&self, patient: Patient) -> Result<Patient, RepositoryError>;

    /// Removes the record with the given id. Reports
    /// [`RepositoryError::NotFound`] when no such record exists.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// In-memory patient store keyed by id.
///
/// Natural order is id order. The unique-email index is enforced inside
/// `save` under the write lock, which stands in for the unique constraint a
/// durable store would carry.
#[derive(Debug, Default)]
pub struct InMemoryPatientRepository {
    records: RwLock<BTreeMap<Uuid, Patient>>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, BTreeMap<Uuid, Patient>>, RepositoryError> {
        self.records
            .read()
            .map_err(|_| RepositoryError::Unavailable("patient store lock poisoned".into()))
    }

    fn write_guard(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<Uuid, Patient>>, RepositoryError> {
        self.records
            .write()
            .map_err(|_| RepositoryError::Unavailable("patient store lock poisoned".into()))
    }
}

#[tonic::async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn find_all(&self) -> Result<Vec<Patient>, RepositoryError> {
        let records = self.read_guard()?;
        Ok(records.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, RepositoryError> {
        let records = self.read_guard()?;
        Ok(records.get(&id).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        let records = self.read_guard()?;
        Ok(records.values().any(|patient| patient.email == email))
    }

    async fn exists_by_email_excluding(
        &self,
        email: &str,
        id: Uuid,
    ) -> Result<bool, RepositoryError> {
        let records = self.read_guard()?;
        Ok(records
            .values()
            .any(|patient| patient.email == email && patient.id != Some(id)))
    }

    async fn save(&self, patient: Patient) -> Result<Patient, RepositoryError> {
        let mut records = self.write_guard()?;

        // The unique-email index: any other record holding this email blocks
        // the write, whether inserting or updating.
        let conflict = records
            .values()
            .any(|existing| existing.email == patient.email && existing.id != patient.id);
        if conflict {
            return Err(RepositoryError::DuplicateEmail(patient.email));
        }

        let id = patient.id.unwrap_or_else(Uuid::new_v4);
        let mut stored = patient;
        stored.id = Some(id);
        records.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut records = self.write_guard()?;
        records.remove(&id).ok_or(RepositoryError::NotFound(id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn patient(email: &str) -> Patient {
        Patient {
            id: None,
            name: "Ana Ruiz".into(),
            email: email.into(),
            address: "1 Rd".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            registered_date: NaiveDate::from_ymd_opt(2025, 4, 17).unwrap(),
        }
    }

    #[tokio::test]
    async fn save_assigns_an_id_on_insert() {
        let repo = InMemoryPatientRepository::new();
        let saved = repo.save(patient("ana@x.com")).await.unwrap();

        assert!(saved.id.is_some(), "store should assign an id");
        let found = repo.find_by_id(saved.id.unwrap()).await.unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn save_rejects_a_second_record_with_the_same_email() {
        let repo = InMemoryPatientRepository::new();
        repo.save(patient("ana@x.com")).await.unwrap();

        let err = repo.save(patient("ana@x.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateEmail(email) if email == "ana@x.com"));
    }

    #[tokio::test]
    async fn save_allows_a_record_to_keep_its_own_email() {
        let repo = InMemoryPatientRepository::new();
        let saved = repo.save(patient("ana@x.com")).await.unwrap();

        let mut updated = saved.clone();
        updated.address = "2 Rd".into();
        let resaved = repo.save(updated).await.unwrap();

        assert_eq!(resaved.id, saved.id);
        assert_eq!(resaved.address, "2 Rd");
    }

    #[tokio::test]
    async fn exists_by_email_excluding_ignores_the_named_record() {
        let repo = InMemoryPatientRepository::new();
        let ana = repo.save(patient("ana@x.com")).await.unwrap();
        let bob = repo.save(patient("bob@x.com")).await.unwrap();

        assert!(!repo
            .exists_by_email_excluding("ana@x.com", ana.id.unwrap())
            .await
            .unwrap());
        assert!(repo
            .exists_by_email_excluding("ana@x.com", bob.id.unwrap())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn delete_reports_not_found_for_unknown_id() {
        let repo = InMemoryPatientRepository::new();
        let id = Uuid::new_v4();

        let err = repo.delete_by_id(id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn find_all_returns_records_in_id_order() {
        let repo = InMemoryPatientRepository::new();
        repo.save(patient("ana@x.com")).await.unwrap();
        repo.save(patient("bob@x.com")).await.unwrap();
        repo.save(patient("cid@x.com")).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 3);
        let ids: Vec<_> = all.iter().map(|p| p.id.unwrap()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted, "natural order should be id order");
    }
}
