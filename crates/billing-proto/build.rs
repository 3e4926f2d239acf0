//! Build script for the `billing-proto` crate.
//!
//! ## Purpose
//! Generates Rust protobuf types from `billing.proto` for the billing
//! provisioning contract.
//!
//! ## Intended use
//! The generated client is used by `billing-grpc`; the generated server is
//! available for test doubles and local billing stubs.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let proto_file = std::path::Path::new(manifest_dir).join("billing.proto");
    let proto_include_root = std::path::Path::new(manifest_dir);

    println!("cargo:rerun-if-changed={}", proto_file.display());
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .type_attribute(".", "#[derive(serde::Serialize, serde::Deserialize)]")
        .compile_protos(std::slice::from_ref(&proto_file), &[proto_include_root])?;

    Ok(())
}
