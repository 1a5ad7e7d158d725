//! Trust anchor storage and system trust store discovery.
//!
//! A [`TrustStore`] maps a subject distinguished name (raw DER bytes) to
//! one anchor certificate. Anchors can be loaded from PEM bundles, from
//! directories laid out like OpenSSL's `-CApath`, or from the system
//! store discovered via `openssl-probe` and the `SSL_CERT_FILE` /
//! `SSL_CERT_DIR` environment variables.

use crate::CertwalkError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use x509_parser::prelude::*;

/// Well-known CA bundle file paths, in order of preference.
const KNOWN_CA_BUNDLE_PATHS: &[&str] = &[
    "/etc/ssl/certs/ca-certificates.crt", // Debian/Ubuntu
    "/etc/pki/tls/certs/ca-bundle.crt",   // RHEL/CentOS/Fedora
    "/etc/ssl/ca-bundle.pem",             // openSUSE
    "/etc/ssl/cert.pem",                  // macOS, Alpine
];

/// Well-known CA certificate directory paths.
const KNOWN_CA_DIR_PATHS: &[&str] = &["/etc/ssl/certs"];

/// Check if a file looks like a PEM certificate file for trust store
/// loading: `.pem`, `.crt`, `.cer`, or OpenSSL hash-linked names
/// (`XXXXXXXX.N` with a single-digit extension).
fn is_pem_cert_file(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e,
        None => return false,
    };
    matches!(ext, "pem" | "crt" | "cer")
        || (ext.len() == 1 && ext.bytes().next().is_some_and(|b| b.is_ascii_digit()))
}

/// A set of trusted anchor certificates, indexed by subject name.
///
/// Every certificate in the store is treated as a root of trust: the
/// walker terminates as soon as it finds an entry for a visited
/// certificate's issuer. When two anchors share a subject name, the
/// first one registered wins.
pub struct TrustStore {
    anchors_by_subject: HashMap<Vec<u8>, Vec<u8>>,
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore")
            .field("count", &self.anchors_by_subject.len())
            .finish()
    }
}

impl TrustStore {
    /// Create an empty trust store.
    pub fn new() -> Self {
        TrustStore {
            anchors_by_subject: HashMap::new(),
        }
    }

    /// Load the system trust store.
    ///
    /// Searches the same locations OpenSSL does:
    /// 1. `SSL_CERT_FILE` environment variable
    /// 2. Bundle path discovered by `openssl-probe`
    /// 3. Well-known bundle file paths
    /// 4. `SSL_CERT_DIR` environment variable
    /// 5. Directory discovered by `openssl-probe`
    /// 6. Well-known certificate directories
    pub fn system() -> Result<Self, CertwalkError> {
        let mut store = TrustStore::new();

        if let Some(bundle_path) = find_system_ca_bundle() {
            if let Ok(data) = std::fs::read(&bundle_path) {
                let added = store.add_pem_bundle(&data)?;
                if added > 0 {
                    return Ok(store);
                }
            }
        }

        let probe = openssl_probe::probe();
        let dir_candidates = std::env::var("SSL_CERT_DIR")
            .ok()
            .into_iter()
            .chain(
                probe
                    .cert_dir
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned()),
            )
            .chain(KNOWN_CA_DIR_PATHS.iter().map(|s| (*s).to_string()));

        for dir in dir_candidates {
            if let Ok(added) = store.add_pem_directory(Path::new(&dir)) {
                if added > 0 {
                    return Ok(store);
                }
            }
        }

        if store.is_empty() {
            return Err(CertwalkError::StoreError(
                "no system trust store found".into(),
            ));
        }

        Ok(store)
    }

    /// Create a trust store from a PEM bundle (e.g. a CA certificates
    /// file).
    pub fn from_pem(pem_data: &[u8]) -> Result<Self, CertwalkError> {
        let mut store = TrustStore::new();
        store.add_pem_bundle(pem_data)?;
        Ok(store)
    }

    /// Create a trust store from a PEM file path.
    pub fn from_pem_file(path: &Path) -> Result<Self, CertwalkError> {
        let data = std::fs::read(path).map_err(|e| {
            CertwalkError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        Self::from_pem(&data)
    }

    /// Add a DER-encoded anchor certificate. A later certificate with a
    /// subject already in the store is ignored.
    pub fn add_der(&mut self, der: &[u8]) -> Result<(), CertwalkError> {
        let (_, x509) = X509Certificate::from_der(der)
            .map_err(|e| CertwalkError::DerError(format!("{}", e)))?;

        self.anchors_by_subject
            .entry(x509.subject().as_raw().to_vec())
            .or_insert_with(|| der.to_vec());

        Ok(())
    }

    /// Add all certificates from a PEM bundle. Returns the number of
    /// certificates actually added (entries that fail to parse are
    /// skipped, as CA bundles sometimes carry non-certificate blocks).
    pub fn add_pem_bundle(&mut self, pem_data: &[u8]) -> Result<usize, CertwalkError> {
        let certs = super::parse_pem_chain(pem_data)?;
        let mut added = 0;
        for cert_der in certs {
            if self.add_der(&cert_der).is_ok() {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Load certificates from a directory of PEM files (like OpenSSL's
    /// `-CApath`).
    pub fn add_pem_directory(&mut self, dir: &Path) -> Result<usize, CertwalkError> {
        let mut total = 0;
        let entries = std::fs::read_dir(dir).map_err(|e| {
            CertwalkError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", dir.display(), e),
            ))
        })?;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_pem_cert_file(&path) {
                if let Ok(data) = std::fs::read(&path) {
                    if let Ok(added) = self.add_pem_bundle(&data) {
                        total += added;
                    }
                }
            }
        }
        Ok(total)
    }

    /// Find the anchor whose subject equals the given distinguished name
    /// (raw DER bytes). Returns the anchor's DER encoding.
    pub fn find_certificate(&self, subject_dn_raw: &[u8]) -> Option<&[u8]> {
        self.anchors_by_subject
            .get(subject_dn_raw)
            .map(|der| der.as_slice())
    }

    /// Check if a DER-encoded certificate is in the trust store, matching
    /// by subject and exact DER content.
    pub fn contains(&self, der: &[u8]) -> bool {
        if let Ok((_, x509)) = X509Certificate::from_der(der) {
            return self.find_certificate(x509.subject().as_raw()) == Some(der);
        }
        false
    }

    /// Number of anchors in the store.
    pub fn len(&self) -> usize {
        self.anchors_by_subject.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.anchors_by_subject.is_empty()
    }
}

impl Default for TrustStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the system CA bundle path (same location OpenSSL uses).
///
/// Checks, in order: the `SSL_CERT_FILE` environment variable, the path
/// discovered by `openssl-probe`, then the well-known bundle paths.
pub fn find_system_ca_bundle() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SSL_CERT_FILE") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Some(p);
        }
    }

    let probe = openssl_probe::probe();
    if let Some(file) = probe.cert_file {
        let path = PathBuf::from(&file);
        if path.exists() {
            return Some(path);
        }
    }

    for candidate in KNOWN_CA_BUNDLE_PATHS {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return Some(p);
        }
    }
    None
}
