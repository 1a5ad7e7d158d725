//! CA constraint enforcement for selected issuers.

use super::FailureReason;
use x509_parser::prelude::*;

/// Gate a certificate chosen as issuer at `level` intermediates above the
/// leaf (0 for the leaf's direct issuer).
///
/// All applicable failures are reported together as one composite check:
/// a missing keyCertSign bit, missing or negative CA basic constraints,
/// and an exceeded path length constraint. An absent key usage extension
/// leaves the signer unrestricted; an absent path length constraint
/// leaves the depth unrestricted (RFC 5280 Section 4.2.1.9).
pub(crate) fn check_ca(level: usize, cert: &X509Certificate<'_>) -> Vec<FailureReason> {
    let mut reasons = Vec::new();

    if let Ok(Some(ku)) = cert.key_usage() {
        if !ku.value.key_cert_sign() {
            reasons.push(FailureReason::NotAllowedToSign);
        }
    }

    match cert.basic_constraints() {
        Ok(Some(bc)) => {
            if !bc.value.ca {
                reasons.push(FailureReason::NotAnAuthority);
            }
            if let Some(pathlen) = bc.value.path_len_constraint {
                if (pathlen as usize) < level {
                    reasons.push(FailureReason::AuthorityTooDeep);
                }
            }
        }
        _ => reasons.push(FailureReason::NotAnAuthority),
    }

    reasons
}
