//! # Billing Proto
//!
//! Generated protobuf types for the billing provisioning contract.
//!
//! Contains:
//! - Protobuf-generated types (`pb` module)
//! - The `Billing` gRPC client and server stubs
//!
//! Used by `billing-grpc` for the real client and by tests for spy servers.

// Re-export the generated protobuf module. The generated code will be placed
// into OUT_DIR at build time by the build script.
pub mod pb {
    tonic::include_proto!("billing.v1");
}

pub use pb::*;
