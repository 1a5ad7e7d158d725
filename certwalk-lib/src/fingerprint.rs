//! Certificate fingerprint (digest) computation.

use crate::CertwalkError;
use digest::Digest;

/// Hash algorithms supported for certificate fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl std::str::FromStr for DigestAlgorithm {
    type Err = CertwalkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "sha384" => Ok(DigestAlgorithm::Sha384),
            "sha512" => Ok(DigestAlgorithm::Sha512),
            other => Err(CertwalkError::Unsupported(format!(
                "unknown digest algorithm: {}",
                other
            ))),
        }
    }
}

/// Compute the fingerprint of a certificate's signed DER encoding.
///
/// The fingerprint is the digest of the full signed certificate bytes,
/// matching what `openssl x509 -fingerprint` prints. Use
/// [`format_fingerprint`] to render it in OpenSSL's display format.
pub fn compute_fingerprint(der_bytes: &[u8], algorithm: DigestAlgorithm) -> Vec<u8> {
    match algorithm {
        DigestAlgorithm::Sha1 => sha1::Sha1::digest(der_bytes).to_vec(),
        DigestAlgorithm::Sha256 => sha2::Sha256::digest(der_bytes).to_vec(),
        DigestAlgorithm::Sha384 => sha2::Sha384::digest(der_bytes).to_vec(),
        DigestAlgorithm::Sha512 => sha2::Sha512::digest(der_bytes).to_vec(),
    }
}

/// Render a fingerprint as a colon-separated uppercase hex string
/// (e.g., "AB:CD:EF:..."), OpenSSL's display format.
pub fn format_fingerprint(fingerprint: &[u8]) -> String {
    fingerprint
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}
