//! Hostname matching against a leaf certificate's names.
//!
//! The candidate set is the subject common name followed by the DNS
//! entries of the subject alternative name extension. Matching is
//! label-wise with a restricted leftmost wildcard: `*` covers exactly one
//! label and must leave at least two fixed labels, with an extra guard
//! against short public-suffix-like tails such as `*.co.uk`.

use super::FailureReason;
use crate::oid;
use x509_parser::prelude::*;

pub(crate) fn validate_name(fqhn: &str, cert: &X509Certificate<'_>) -> Vec<FailureReason> {
    let Some(cn) = extract_cn(cert) else {
        return vec![FailureReason::NoCommonName];
    };
    let mut candidates = vec![cn];
    candidates.extend(extract_san_dns_names(cert));
    find_match(fqhn, &candidates)
}

/// Match a hostname against an ordered list of certificate name
/// candidates.
///
/// The first candidate whose matcher accepts short-circuits to success.
/// On total failure, syntactic defects (`InvalidName`, `InvalidWildcard`)
/// of the candidates are returned in candidate order; when every
/// candidate was merely a mismatch, a single `NameMismatch` is emitted
/// rather than one per candidate.
pub fn find_match(fqhn: &str, candidates: &[String]) -> Vec<FailureReason> {
    let mut hard = Vec::new();
    for candidate in candidates {
        let reasons = match_domain(fqhn, candidate);
        if reasons.is_empty() {
            return Vec::new();
        }
        hard.extend(
            reasons
                .into_iter()
                .filter(|r| !matches!(r, FailureReason::NameMismatch(_))),
        );
    }
    if hard.is_empty() {
        vec![FailureReason::NameMismatch(fqhn.to_string())]
    } else {
        hard
    }
}

/// Match one candidate name. DNS names compare case-insensitively.
#[allow(clippy::indexing_slicing)] // labels is non-empty: split always yields at least one item
fn match_domain(fqhn: &str, candidate: &str) -> Vec<FailureReason> {
    let pattern = candidate.to_ascii_lowercase();
    let host = fqhn.to_ascii_lowercase();

    let labels: Vec<&str> = pattern.split('.').collect();
    if labels.iter().any(|l| l.is_empty()) {
        return vec![FailureReason::InvalidName(candidate.to_string())];
    }

    let host_labels: Vec<&str> = host.split('.').collect();
    if labels[0] == "*" {
        return match_wildcard(fqhn, &labels[1..], &host_labels);
    }

    // A '*' anywhere but the leftmost label is an ordinary character.
    if labels == host_labels {
        Vec::new()
    } else {
        vec![FailureReason::NameMismatch(fqhn.to_string())]
    }
}

/// Match a wildcard pattern. `suffix` holds the pattern labels after the
/// `*`, outermost last; the wildcard covers exactly one host label.
#[allow(clippy::indexing_slicing)] // inner[0] and inner[1] guarded by the length check above
fn match_wildcard(fqhn: &str, suffix: &[&str], host_labels: &[&str]) -> Vec<FailureReason> {
    let mut inner: Vec<&str> = suffix.to_vec();
    inner.reverse();

    // '*' and '*.com' would cover a whole TLD.
    if inner.len() < 2 {
        return vec![FailureReason::InvalidWildcard];
    }
    // Short TLD plus short second-level label, e.g. '*.co.uk'.
    if inner[0].len() <= 2 && inner[1].len() <= 3 && inner.len() < 3 {
        return vec![FailureReason::InvalidWildcard];
    }

    let mut host_rev: Vec<&str> = host_labels.to_vec();
    host_rev.reverse();
    if host_rev.len() == inner.len() + 1 && host_rev.starts_with(&inner) {
        Vec::new()
    } else {
        vec![FailureReason::NameMismatch(fqhn.to_string())]
    }
}

/// Extract the common name from the certificate subject.
fn extract_cn(cert: &X509Certificate<'_>) -> Option<String> {
    for rdn in cert.subject().iter() {
        for attr in rdn.iter() {
            if attr.attr_type().to_id_string() == oid::COMMON_NAME {
                return attr.as_str().ok().map(|s| s.to_string());
            }
        }
    }
    None
}

/// Extract DNS names from the subject alternative name extension. Other
/// SAN variants are ignored.
fn extract_san_dns_names(cert: &X509Certificate<'_>) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(Some(san)) = cert.subject_alternative_name() {
        for gn in &san.value.general_names {
            if let GeneralName::DNSName(name) = gn {
                names.push(name.to_string());
            }
        }
    }
    names
}
