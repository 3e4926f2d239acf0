//! # Patient Core
//!
//! Core business logic for the patient lifecycle service.
//!
//! This crate contains the decision logic of the system:
//! - The `Patient` entity and the request/response shapes with boundary validation
//! - Mapping between external shapes and the stored entity
//! - The repository and billing contracts the service depends on
//! - `PatientService`, which enforces email uniqueness, orders the billing
//!   side effect after a durable save, and translates failures into the
//!   domain error taxonomy
//!
//! **No API concerns**: HTTP routing, status codes, and OpenAPI metadata
//! belong to the binary; the gRPC billing transport belongs to `billing-grpc`.

pub mod billing;
pub mod dto;
pub mod error;
pub mod mapper;
pub mod patient;
pub mod repository;
pub mod service;

pub use billing::{BillingAccount, BillingClient};
pub use dto::{PatientRequest, PatientResponse};
pub use error::{BillingError, PatientError, PatientResult, RepositoryError};
pub use patient::Patient;
pub use repository::{InMemoryPatientRepository, PatientRepository};
pub use service::PatientService;
