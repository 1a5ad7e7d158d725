//! certwalk-lib: RFC 5280 certificate chain validation.
//!
//! Given a presented certificate chain (leaf first), a trust store of
//! anchors, a target hostname, and a validation instant, the validator
//! decides whether the chain is acceptable and enumerates every reason it
//! is not. DER decoding and signature arithmetic are delegated to
//! `x509-parser`; this crate owns chain walking, hostname matching, leaf
//! policy, and CA constraint enforcement.

mod fingerprint;
mod oid;
pub mod validate;

pub use fingerprint::{compute_fingerprint, format_fingerprint, DigestAlgorithm};
pub use validate::{
    default_match_subject_issuer, default_validate_name, default_validate_time, find_match,
    find_system_ca_bundle, parse_pem_chain, validate, validate_at, validate_der_chain, Checks,
    FailureReason, Hooks, KeyPurpose, KeyUsageFlag, TrustStore,
};

/// Errors returned by certwalk-lib.
///
/// These cover the fallible shell around validation (reading inputs,
/// building trust stores). Defects found in a chain are never reported
/// here; they come back as [`FailureReason`] values.
#[derive(Debug, thiserror::Error)]
pub enum CertwalkError {
    #[error("Invalid PEM format: {0}")]
    PemError(String),

    #[error("Invalid DER format: {0}")]
    DerError(String),

    #[error("Unsupported value: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Trust store error: {0}")]
    StoreError(String),
}
