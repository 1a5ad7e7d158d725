//! Leaf-only policy checks: version gate, key usage, key purpose.
//!
//! The key usage and key purpose checks follow RFC 5280's reading of an
//! absent extension: an unconstrained key is usable for any purpose, so
//! absence passes.

use super::{FailureReason, KeyPurpose, KeyUsageFlag};
use x509_parser::prelude::*;

/// X.509v3 is encoded as version value 2.
pub(crate) fn check_version(cert: &X509Certificate<'_>) -> Vec<FailureReason> {
    if cert.version().0 == 2 {
        Vec::new()
    } else {
        vec![FailureReason::LeafNotV3]
    }
}

/// Every required flag must be contained in the leaf's key usage
/// extension, when that extension is present.
pub(crate) fn check_key_usage(
    required: &[KeyUsageFlag],
    cert: &X509Certificate<'_>,
) -> Vec<FailureReason> {
    match cert.key_usage() {
        Ok(Some(ku)) if !required.iter().all(|flag| flag.is_set(&ku.value)) => {
            vec![FailureReason::LeafKeyUsageNotAllowed]
        }
        _ => Vec::new(),
    }
}

/// Every required purpose must be contained in the leaf's extended key
/// usage extension, when that extension is present.
pub(crate) fn check_key_purpose(
    required: &[KeyPurpose],
    cert: &X509Certificate<'_>,
) -> Vec<FailureReason> {
    match cert.extended_key_usage() {
        Ok(Some(eku)) if !required.iter().all(|purpose| purpose.is_allowed(&eku.value)) => {
            vec![FailureReason::LeafKeyPurposeNotAllowed]
        }
        _ => Vec::new(),
    }
}
