//! # Billing gRPC
//!
//! The tonic implementation of the core's `BillingClient` contract.
//!
//! The channel connects lazily: a billing service that is down at startup or
//! mid-flight surfaces as a per-call `BillingError`, which the lifecycle
//! service logs without failing the create operation.

use billing_proto::pb::billing_client::BillingClient as BillingGrpc;
use billing_proto::pb::BillingAccountReq;
use patient_core::{BillingAccount, BillingClient, BillingError};
use tonic::transport::{Channel, Endpoint};
use tonic::Request;
use uuid::Uuid;

/// Billing client backed by a gRPC channel.
#[derive(Clone, Debug)]
pub struct GrpcBillingClient {
    client: BillingGrpc<Channel>,
}

impl GrpcBillingClient {
    /// Creates a client for the given endpoint, e.g. `http://localhost:9001`.
    ///
    /// No connection is attempted here; the channel dials on first use.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Endpoint` if the address is not a valid URI.
    pub fn from_addr(addr: &str) -> Result<Self, BillingError> {
        let channel = Endpoint::from_shared(addr.to_owned())
            .map_err(|err| BillingError::Endpoint(err.to_string()))?
            .connect_lazy();
        Ok(Self {
            client: BillingGrpc::new(channel),
        })
    }

    /// Wraps an already-established channel, for callers that manage their own.
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            client: BillingGrpc::new(channel),
        }
    }
}

#[tonic::async_trait]
impl BillingClient for GrpcBillingClient {
    async fn create_billing_account(
        &self,
        patient_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<BillingAccount, BillingError> {
        // Generated clients take &mut self; clone the cheap channel handle.
        let mut client = self.client.clone();

        let response = client
            .create_billing_account(Request::new(BillingAccountReq {
                patient_id: patient_id.to_string(),
                name: name.to_owned(),
                email: email.to_owned(),
            }))
            .await
            .map_err(|status| BillingError::Rpc(status.to_string()))?
            .into_inner();

        tracing::debug!(
            "billing account {} provisioned for patient {patient_id}",
            response.account_id
        );

        Ok(BillingAccount {
            account_id: response.account_id,
            status: response.status,
        })
    }
}
