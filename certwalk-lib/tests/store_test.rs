#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Trust store loading and lookup, PEM chain parsing, and fingerprint
//! helpers.

use certwalk_lib::{
    compute_fingerprint, format_fingerprint, parse_pem_chain, DigestAlgorithm, TrustStore,
};
use std::path::PathBuf;
use x509_parser::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn testdata_dir() -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.pop();
    p.push("testdata");
    p
}

fn load_pem(name: &str) -> Vec<u8> {
    let path = testdata_dir().join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

fn load_der(name: &str) -> Vec<u8> {
    parse_pem_chain(&load_pem(name)).unwrap().remove(0)
}

// ---------------------------------------------------------------------------
// Trust store
// ---------------------------------------------------------------------------

#[test]
fn empty_store() {
    let store = TrustStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert_eq!(store.find_certificate(b"anything"), None);
}

#[test]
fn from_pem_bundle_loads_every_certificate() {
    let mut bundle = load_pem("root-ca.pem");
    bundle.extend(load_pem("self-signed.pem"));

    let store = TrustStore::from_pem(&bundle).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn lookup_is_keyed_by_subject_name() {
    let root_der = load_der("root-ca.pem");
    let leaf_der = load_der("leaf.pem");
    let mut store = TrustStore::new();
    store.add_der(&root_der).unwrap();

    let (_, root) = X509Certificate::from_der(&root_der).unwrap();
    let (_, leaf) = X509Certificate::from_der(&leaf_der).unwrap();

    assert_eq!(
        store.find_certificate(root.subject().as_raw()),
        Some(root_der.as_slice())
    );
    // The leaf's issuer is the root's subject.
    assert_eq!(
        store.find_certificate(leaf.issuer().as_raw()),
        Some(root_der.as_slice())
    );
    assert_eq!(store.find_certificate(leaf.subject().as_raw()), None);

    assert!(store.contains(&root_der));
    assert!(!store.contains(&leaf_der));
}

#[test]
fn first_anchor_per_subject_wins() {
    let root_der = load_der("root-ca.pem");
    let mut store = TrustStore::new();
    store.add_der(&root_der).unwrap();
    store.add_der(&root_der).unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn add_der_rejects_garbage() {
    let mut store = TrustStore::new();
    assert!(store.add_der(b"not a certificate").is_err());
    assert!(store.is_empty());
}

#[test]
fn directory_loading_follows_capath_conventions() {
    let dir = std::env::temp_dir().join(format!("certwalk-store-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("root.pem"), load_pem("root-ca.pem")).unwrap();
    std::fs::write(dir.join("extra.crt"), load_pem("self-signed.pem")).unwrap();
    std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();

    let mut store = TrustStore::new();
    let added = store.add_pem_directory(&dir).unwrap();
    assert_eq!(added, 2);
    assert_eq!(store.len(), 2);

    std::fs::remove_dir_all(&dir).unwrap();
}

// ---------------------------------------------------------------------------
// PEM chain parsing
// ---------------------------------------------------------------------------

#[test]
fn pem_chain_keeps_order() {
    let mut bundle = load_pem("leaf.pem");
    bundle.extend(load_pem("root-ca.pem"));

    let ders = parse_pem_chain(&bundle).unwrap();
    assert_eq!(ders.len(), 2);
    assert_eq!(ders[0], load_der("leaf.pem"));
    assert_eq!(ders[1], load_der("root-ca.pem"));
}

#[test]
fn pem_parsing_rejects_empty_and_garbage_input() {
    assert!(parse_pem_chain(b"").is_err());
    assert!(parse_pem_chain(b"no pem here").is_err());
}

// ---------------------------------------------------------------------------
// Fingerprints and encoding helpers
// ---------------------------------------------------------------------------

fn unhex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

#[test]
fn fingerprint_digests_match_known_vectors() {
    // SHA-256("") and SHA-1("abc"), the classic test vectors.
    assert_eq!(
        compute_fingerprint(b"", DigestAlgorithm::Sha256),
        unhex("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
    );
    assert_eq!(
        compute_fingerprint(b"abc", DigestAlgorithm::Sha1),
        unhex("a9993e364706816aba3e25717850c26c9cd0d89d")
    );
}

#[test]
fn fingerprint_lengths_per_algorithm() {
    let der = load_der("root-ca.pem");
    assert_eq!(compute_fingerprint(&der, DigestAlgorithm::Sha1).len(), 20);
    assert_eq!(compute_fingerprint(&der, DigestAlgorithm::Sha256).len(), 32);
    assert_eq!(compute_fingerprint(&der, DigestAlgorithm::Sha384).len(), 48);
    assert_eq!(compute_fingerprint(&der, DigestAlgorithm::Sha512).len(), 64);
}

#[test]
fn digest_algorithm_parses_from_names() {
    assert_eq!("sha256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
    assert!("md5".parse::<DigestAlgorithm>().is_err());
}

#[test]
fn fingerprint_formatting_matches_openssl_style() {
    assert_eq!(format_fingerprint(&[0xab, 0x0c, 0xef]), "AB:0C:EF");
    assert_eq!(format_fingerprint(&[]), "");
}
