//! The patient entity.

use chrono::NaiveDate;
use uuid::Uuid;

/// A durable patient record.
///
/// The identifier is assigned by the persistence store on first save and is
/// immutable afterwards; an entity built from a request carries `None` until
/// then. All field-level validation happens at the boundary before an entity
/// is constructed, so the entity carries no enforcement logic of its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patient {
    /// Store-assigned identifier, `None` for a not-yet-persisted entity.
    pub id: Option<Uuid>,
    pub name: String,
    /// Globally unique across all patients, exact match as stored.
    pub email: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    /// Set once at creation; updates never alter it.
    pub registered_date: NaiveDate,
}
