//! Certificate chain validation against a trust store.
//!
//! The entry points take a parsed, leaf-first certificate chain and return
//! the (possibly empty) ordered sequence of [`FailureReason`]s found while
//! walking from the leaf to a trust anchor. An empty sequence means the
//! chain is acceptable; a non-empty one means the chain must not be
//! trusted, not even partially.
//!
//! Validation never fails with an error: defects are data. The only
//! fallible operations in this module are the conveniences that parse PEM
//! or DER input before validating.

mod ca;
mod leaf;
mod name;
mod trust_store;
mod walker;

use crate::CertwalkError;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use x509_parser::extensions::{ExtendedKeyUsage, KeyUsage};
use x509_parser::prelude::*;

pub use name::find_match;
pub use trust_store::{find_system_ca_bundle, TrustStore};

/// A single reason a certificate chain was rejected.
///
/// Validation returns these in the order the corresponding checks ran; in
/// fail-fast mode the sequence holds the first defect found, in exhaustive
/// mode it holds every defect across every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    /// A visited certificate carries a critical extension outside the
    /// recognized set (RFC 5280 Section 4.2).
    UnknownCriticalExtension,
    /// The validation instant is past the certificate's notAfter.
    Expired,
    /// The validation instant is before the certificate's notBefore.
    InFuture,
    /// The chain reached a self-signed certificate that is not an anchor.
    SelfSigned,
    /// No issuer could be found in the trust store or the presented chain.
    UnknownCa,
    /// A selected issuer's key usage lacks keyCertSign.
    NotAllowedToSign,
    /// A selected issuer has no CA basic constraints.
    NotAnAuthority,
    /// A selected issuer's path length constraint is exceeded.
    AuthorityTooDeep,
    /// The leaf subject has no common name attribute.
    NoCommonName,
    /// A certificate name candidate is syntactically invalid.
    InvalidName(String),
    /// No certificate name candidate matched the target hostname.
    NameMismatch(String),
    /// A wildcard name would cover too broad a namespace.
    InvalidWildcard,
    /// The leaf's key usage does not cover every required flag.
    LeafKeyUsageNotAllowed,
    /// The leaf's extended key usage does not cover every required purpose.
    LeafKeyPurposeNotAllowed,
    /// The leaf is not an X.509v3 certificate.
    LeafNotV3,
    /// The presented chain was empty.
    EmptyChain,
    /// Signature verification failed; carries the signature layer's reason.
    InvalidSignature(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::UnknownCriticalExtension => {
                write!(f, "certificate carries an unrecognized critical extension")
            }
            FailureReason::Expired => write!(f, "certificate has expired"),
            FailureReason::InFuture => write!(f, "certificate is not yet valid"),
            FailureReason::SelfSigned => {
                write!(f, "certificate is self-signed and not a trust anchor")
            }
            FailureReason::UnknownCa => {
                write!(f, "no trusted certificate found for the issuer")
            }
            FailureReason::NotAllowedToSign => {
                write!(f, "issuer key usage does not include keyCertSign")
            }
            FailureReason::NotAnAuthority => {
                write!(f, "issuer is not a certificate authority")
            }
            FailureReason::AuthorityTooDeep => {
                write!(f, "issuer path length constraint violated")
            }
            FailureReason::NoCommonName => {
                write!(f, "certificate subject has no common name")
            }
            FailureReason::InvalidName(name) => {
                write!(f, "certificate name '{}' is malformed", name)
            }
            FailureReason::NameMismatch(host) => {
                write!(f, "hostname '{}' does not match certificate names", host)
            }
            FailureReason::InvalidWildcard => {
                write!(f, "certificate wildcard name is not acceptable")
            }
            FailureReason::LeafKeyUsageNotAllowed => {
                write!(f, "leaf key usage does not cover the required flags")
            }
            FailureReason::LeafKeyPurposeNotAllowed => {
                write!(f, "leaf extended key usage does not cover the required purposes")
            }
            FailureReason::LeafNotV3 => write!(f, "leaf certificate is not X.509v3"),
            FailureReason::EmptyChain => write!(f, "empty certificate chain"),
            FailureReason::InvalidSignature(reason) => {
                write!(f, "signature verification failed: {}", reason)
            }
        }
    }
}

/// Key usage bits of RFC 5280 Section 4.2.1.3, used to express required
/// leaf key usages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUsageFlag {
    DigitalSignature,
    NonRepudiation,
    KeyEncipherment,
    DataEncipherment,
    KeyAgreement,
    KeyCertSign,
    CrlSign,
    EncipherOnly,
    DecipherOnly,
}

impl KeyUsageFlag {
    /// Whether this flag is set in a decoded key usage extension.
    pub fn is_set(self, usage: &KeyUsage) -> bool {
        match self {
            KeyUsageFlag::DigitalSignature => usage.digital_signature(),
            KeyUsageFlag::NonRepudiation => usage.non_repudiation(),
            KeyUsageFlag::KeyEncipherment => usage.key_encipherment(),
            KeyUsageFlag::DataEncipherment => usage.data_encipherment(),
            KeyUsageFlag::KeyAgreement => usage.key_agreement(),
            KeyUsageFlag::KeyCertSign => usage.key_cert_sign(),
            KeyUsageFlag::CrlSign => usage.crl_sign(),
            KeyUsageFlag::EncipherOnly => usage.encipher_only(),
            KeyUsageFlag::DecipherOnly => usage.decipher_only(),
        }
    }
}

impl std::str::FromStr for KeyUsageFlag {
    type Err = CertwalkError;

    /// Parses the OpenSSL-style flag names (e.g. `digitalSignature`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "digitalSignature" => Ok(KeyUsageFlag::DigitalSignature),
            "nonRepudiation" => Ok(KeyUsageFlag::NonRepudiation),
            "keyEncipherment" => Ok(KeyUsageFlag::KeyEncipherment),
            "dataEncipherment" => Ok(KeyUsageFlag::DataEncipherment),
            "keyAgreement" => Ok(KeyUsageFlag::KeyAgreement),
            "keyCertSign" => Ok(KeyUsageFlag::KeyCertSign),
            "cRLSign" => Ok(KeyUsageFlag::CrlSign),
            "encipherOnly" => Ok(KeyUsageFlag::EncipherOnly),
            "decipherOnly" => Ok(KeyUsageFlag::DecipherOnly),
            other => Err(CertwalkError::Unsupported(format!(
                "unknown key usage flag: {}",
                other
            ))),
        }
    }
}

/// Extended key usage purposes (RFC 5280 Section 4.2.1.12), used to
/// express required leaf key purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPurpose {
    ServerAuth,
    ClientAuth,
    CodeSigning,
    EmailProtection,
    TimeStamping,
    OcspSigning,
    /// Any other purpose, as a dotted-decimal OID string.
    Other(String),
}

impl KeyPurpose {
    /// Whether a decoded extended key usage extension covers this purpose.
    ///
    /// `anyExtendedKeyUsage` in the extension covers every purpose.
    pub fn is_allowed(&self, eku: &ExtendedKeyUsage<'_>) -> bool {
        if eku.any {
            return true;
        }
        match self {
            KeyPurpose::ServerAuth => eku.server_auth,
            KeyPurpose::ClientAuth => eku.client_auth,
            KeyPurpose::CodeSigning => eku.code_signing,
            KeyPurpose::EmailProtection => eku.email_protection,
            KeyPurpose::TimeStamping => eku.time_stamping,
            KeyPurpose::OcspSigning => eku.ocsp_signing,
            KeyPurpose::Other(oid) => eku.other.iter().any(|o| o.to_id_string() == *oid),
        }
    }
}

impl std::str::FromStr for KeyPurpose {
    type Err = CertwalkError;

    /// Parses OpenSSL's named purposes (`sslserver`, `sslclient`,
    /// `smimesign`, `codesign`, `timestampsign`, `ocsphelper`) or a
    /// dotted-decimal OID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sslserver" => Ok(KeyPurpose::ServerAuth),
            "sslclient" => Ok(KeyPurpose::ClientAuth),
            "codesign" => Ok(KeyPurpose::CodeSigning),
            "smimesign" | "smimeencrypt" => Ok(KeyPurpose::EmailProtection),
            "timestampsign" => Ok(KeyPurpose::TimeStamping),
            "ocsphelper" => Ok(KeyPurpose::OcspSigning),
            other if !other.is_empty()
                && other.bytes().all(|b| b.is_ascii_digit() || b == b'.') =>
            {
                Ok(KeyPurpose::Other(other.to_string()))
            }
            other => Err(CertwalkError::Unsupported(format!(
                "unknown key purpose: {}",
                other
            ))),
        }
    }
}

/// Policy configuration controlling which checks run and how failures
/// accumulate.
#[derive(Debug, Clone)]
pub struct Checks {
    /// Enforce the validity interval on every certificate the walker
    /// visits.
    pub time_validity: bool,
    /// Require the presented chain to already be in issuer order; when
    /// off, the walker scans the remaining chain for each issuer.
    pub strict_ordering: bool,
    /// Run the CA constraint gate (keyCertSign, CA basic constraints,
    /// path length) on every selected issuer.
    pub ca_constraints: bool,
    /// Accumulate every failure instead of stopping at the first.
    pub exhaustive: bool,
    /// Require the leaf to be an X.509v3 certificate.
    pub leaf_v3: bool,
    /// Key usage flags the leaf must allow, if its key usage extension is
    /// present. Empty disables the check.
    pub leaf_key_usage: Vec<KeyUsageFlag>,
    /// Purposes the leaf must allow, if its extended key usage extension
    /// is present. Empty disables the check.
    pub leaf_key_purpose: Vec<KeyPurpose>,
    /// Match the leaf's names against the target hostname.
    pub fqhn: bool,
}

impl Default for Checks {
    fn default() -> Self {
        Checks {
            time_validity: true,
            strict_ordering: false,
            ca_constraints: true,
            exhaustive: false,
            leaf_v3: true,
            leaf_key_usage: Vec::new(),
            leaf_key_purpose: Vec::new(),
            fqhn: true,
        }
    }
}

/// Swappable predicates used by the walker.
///
/// The defaults implement the reference semantics; auditors can replace
/// individual entries to observe or relax a decision point.
#[derive(Clone)]
pub struct Hooks {
    /// Decides whether a candidate certificate is the issuer named by a
    /// distinguished name.
    pub match_subject_issuer: fn(&X509Name<'_>, &X509Certificate<'_>) -> bool,
    /// Checks one certificate's validity interval at an instant.
    pub validate_time: fn(i64, &X509Certificate<'_>) -> Vec<FailureReason>,
    /// Matches the leaf certificate's names against the target hostname.
    pub validate_name: fn(&str, &X509Certificate<'_>) -> Vec<FailureReason>,
}

impl Default for Hooks {
    fn default() -> Self {
        Hooks {
            match_subject_issuer: default_match_subject_issuer,
            validate_time: default_validate_time,
            validate_name: default_validate_name,
        }
    }
}

/// Default issuer match: exact distinguished name equality, compared on
/// the raw DER name bytes.
pub fn default_match_subject_issuer(
    issuer_dn: &X509Name<'_>,
    candidate: &X509Certificate<'_>,
) -> bool {
    candidate.subject().as_raw() == issuer_dn.as_raw()
}

/// Default time validation: the instant must fall inside
/// `[notBefore, notAfter]`.
pub fn default_validate_time(now: i64, cert: &X509Certificate<'_>) -> Vec<FailureReason> {
    let validity = cert.validity();
    if now < validity.not_before.timestamp() {
        return vec![FailureReason::InFuture];
    }
    if now > validity.not_after.timestamp() {
        return vec![FailureReason::Expired];
    }
    Vec::new()
}

/// Default hostname validation; see [`find_match`] for the matching rules.
pub fn default_validate_name(hostname: &str, cert: &X509Certificate<'_>) -> Vec<FailureReason> {
    name::validate_name(hostname, cert)
}

/// Validate a certificate chain at the current system time.
///
/// Convenience wrapper over [`validate_at`]; everything else about the
/// call is deterministic.
pub fn validate(
    hooks: &Hooks,
    checks: &Checks,
    store: &TrustStore,
    hostname: &str,
    chain: &[X509Certificate<'_>],
) -> Vec<FailureReason> {
    validate_at(unix_now(), hooks, checks, store, hostname, chain)
}

/// Validate a certificate chain at a given Unix timestamp.
///
/// The chain is leaf first. Returns the ordered sequence of failures; an
/// empty sequence means every activated check passed at every relevant
/// position.
pub fn validate_at(
    now: i64,
    hooks: &Hooks,
    checks: &Checks,
    store: &TrustStore,
    hostname: &str,
    chain: &[X509Certificate<'_>],
) -> Vec<FailureReason> {
    walker::run(now, hooks, checks, store, hostname, chain)
}

/// Parse a leaf-first chain of DER-encoded certificates and validate it.
///
/// `at_time` validates at a specific Unix timestamp; `None` uses the
/// current system time. A certificate that fails to parse is a
/// collaborator error, not a validation failure, and is reported as
/// `Err`.
pub fn validate_der_chain(
    at_time: Option<i64>,
    hooks: &Hooks,
    checks: &Checks,
    store: &TrustStore,
    hostname: &str,
    chain_der: &[Vec<u8>],
) -> Result<Vec<FailureReason>, CertwalkError> {
    let parsed: Vec<X509Certificate<'_>> = chain_der
        .iter()
        .enumerate()
        .map(|(i, der)| {
            X509Certificate::from_der(der)
                .map(|(_, x509)| x509)
                .map_err(|e| {
                    CertwalkError::DerError(format!(
                        "failed to parse certificate at depth {}: {}",
                        i, e
                    ))
                })
        })
        .collect::<Result<_, _>>()?;

    let now = at_time.unwrap_or_else(unix_now);
    Ok(validate_at(now, hooks, checks, store, hostname, &parsed))
}

/// Parse a PEM-encoded file containing one or more certificates into
/// individual DER-encoded certificates.
pub fn parse_pem_chain(input: &[u8]) -> Result<Vec<Vec<u8>>, CertwalkError> {
    let mut certs = Vec::new();

    for pem_result in Pem::iter_from_buffer(input) {
        match pem_result {
            Ok(pem) => {
                if pem.label == "CERTIFICATE" || pem.label == "TRUSTED CERTIFICATE" {
                    certs.push(pem.contents);
                }
            }
            Err(e) => {
                // Stop at the first error once something was read
                // (trailing garbage after the last block).
                if !certs.is_empty() {
                    break;
                }
                return Err(CertwalkError::PemError(format!(
                    "failed to parse PEM: {}",
                    e
                )));
            }
        }
    }

    if certs.is_empty() {
        return Err(CertwalkError::PemError(
            "no certificates found in PEM input".into(),
        ));
    }

    Ok(certs)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
