//! The chain walking state machine.
//!
//! Starting at the leaf, each step either terminates the walk (trust
//! anchor found, untrusted self-signed certificate, or no issuer left) or
//! selects the next issuer from the remaining presented chain, gates it,
//! verifies the signature link, and advances. The walk consumes one
//! certificate per step, so it terminates after at most `chain length`
//! steps.

use super::{ca, leaf, Checks, FailureReason, Hooks, TrustStore};
use crate::oid;
use x509_parser::prelude::*;

/// Accumulates failure reasons under the configured exhaustion mode.
///
/// In fail-fast mode the first recorded reason halts every later step; in
/// exhaustive mode every step runs and reasons concatenate in execution
/// order. Steps flagged inactive are skipped in both modes.
struct Outcome {
    reasons: Vec<FailureReason>,
    exhaustive: bool,
}

impl Outcome {
    fn new(exhaustive: bool) -> Self {
        Outcome {
            reasons: Vec::new(),
            exhaustive,
        }
    }

    fn halted(&self) -> bool {
        !self.exhaustive && !self.reasons.is_empty()
    }

    fn step<F>(&mut self, active: bool, step: F)
    where
        F: FnOnce() -> Vec<FailureReason>,
    {
        if active && !self.halted() {
            self.reasons.extend(step());
        }
    }
}

/// Run the full validation pipeline: leaf checks, then the walk.
#[allow(clippy::indexing_slicing)] // remaining[0] guarded by the is_empty check above it
pub(crate) fn run(
    now: i64,
    hooks: &Hooks,
    checks: &Checks,
    store: &TrustStore,
    hostname: &str,
    chain: &[X509Certificate<'_>],
) -> Vec<FailureReason> {
    let Some((top, rest)) = chain.split_first() else {
        return vec![FailureReason::EmptyChain];
    };

    let mut out = Outcome::new(checks.exhaustive);

    // Leaf phase: hostname, version, then key usage and key purpose as
    // one composite check (both report even in fail-fast mode).
    out.step(checks.fqhn, || (hooks.validate_name)(hostname, top));
    out.step(checks.leaf_v3, || leaf::check_version(top));
    out.step(
        !checks.leaf_key_usage.is_empty() || !checks.leaf_key_purpose.is_empty(),
        || {
            let mut reasons = leaf::check_key_usage(&checks.leaf_key_usage, top);
            reasons.extend(leaf::check_key_purpose(&checks.leaf_key_purpose, top));
            reasons
        },
    );

    // Walking phase. `level` counts intermediates crossed between the
    // leaf and the issuer about to be gated; the anchor never adds one.
    let mut level = 0usize;
    let mut current = top;
    let mut remaining: Vec<&X509Certificate<'_>> = rest.iter().collect();

    loop {
        if out.halted() {
            break;
        }

        out.step(checks.time_validity, || (hooks.validate_time)(now, current));
        out.step(true, || screen_critical_extensions(current));

        // A trusted anchor for the issuer ends the walk, whatever else
        // the presented chain still holds.
        if let Some(anchor_der) = store.find_certificate(current.issuer().as_raw()) {
            out.step(true, || check_anchor_signature(current, anchor_der));
            break;
        }

        // Self-signed but not anchored: flagged even when the
        // self-signature itself is sound.
        if current.subject().as_raw() == current.issuer().as_raw() {
            out.step(true, || vec![FailureReason::SelfSigned]);
            out.step(true, || check_signature(current, current));
            break;
        }

        if remaining.is_empty() {
            out.step(true, || vec![FailureReason::UnknownCa]);
            break;
        }

        let found = if checks.strict_ordering {
            (hooks.match_subject_issuer)(current.issuer(), remaining[0]).then_some(0)
        } else {
            remaining
                .iter()
                .position(|cand| (hooks.match_subject_issuer)(current.issuer(), *cand))
        };
        let Some(pos) = found else {
            out.step(true, || vec![FailureReason::UnknownCa]);
            break;
        };
        let issuer = remaining.remove(pos);

        out.step(checks.ca_constraints, || ca::check_ca(level, issuer));
        out.step(true, || check_signature(current, issuer));

        level += 1;
        current = issuer;
    }

    out.reasons
}

/// Adapter over the external signature primitive: verify `signed`'s
/// embedded signature with `signer`'s public key.
fn check_signature(
    signed: &X509Certificate<'_>,
    signer: &X509Certificate<'_>,
) -> Vec<FailureReason> {
    match signed.verify_signature(Some(signer.public_key())) {
        Ok(()) => Vec::new(),
        Err(e) => vec![FailureReason::InvalidSignature(e.to_string())],
    }
}

/// Verify against an anchor held as DER by the trust store. A store entry
/// that no longer parses cannot anchor anything.
fn check_anchor_signature(signed: &X509Certificate<'_>, anchor_der: &[u8]) -> Vec<FailureReason> {
    match X509Certificate::from_der(anchor_der) {
        Ok((_, anchor)) => check_signature(signed, &anchor),
        Err(_) => vec![FailureReason::UnknownCa],
    }
}

/// RFC 5280 Section 4.2: a certificate with a critical extension outside
/// the recognized set must be rejected.
fn screen_critical_extensions(cert: &X509Certificate<'_>) -> Vec<FailureReason> {
    for ext in cert.extensions() {
        if ext.critical && !oid::is_known_extension(ext.oid.to_id_string().as_str()) {
            return vec![FailureReason::UnknownCriticalExtension];
        }
    }
    Vec::new()
}
