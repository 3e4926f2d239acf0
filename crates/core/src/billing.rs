//! Billing provisioning contract.

use uuid::Uuid;

use crate::error::BillingError;

/// A billing account created by the remote billing service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillingAccount {
    pub account_id: String,
    pub status: String,
}

/// Contract for the remote billing provisioning call.
///
/// Invoked exactly once per successful patient creation, strictly after the
/// patient record is durably saved. The call may fail independently of the
/// record's durability; the service logs the failure and does not surface it.
#[tonic::async_trait]
pub trait BillingClient: Send + Sync {
    async fn create_billing_account(
        &self,
        patient_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<BillingAccount, BillingError>;
}
