//! OID string constants used throughout certwalk-lib.
//!
//! Object Identifiers are defined by ITU-T X.660 and referenced
//! extensively in RFC 5280. Grouping them here avoids magic strings
//! scattered across modules and gives each OID a readable name.

// ── X.509 Distinguished Name attributes (RFC 4519 / X.520) ──────────────

pub const COMMON_NAME: &str = "2.5.4.3";

// ── X.509v3 extensions (RFC 5280 Section 4.2) ───────────────────────────

pub const EXT_SUBJECT_KEY_ID: &str = "2.5.29.14";
pub const EXT_KEY_USAGE: &str = "2.5.29.15";
pub const EXT_SUBJECT_ALT_NAME: &str = "2.5.29.17";
pub const EXT_ISSUER_ALT_NAME: &str = "2.5.29.18";
pub const EXT_BASIC_CONSTRAINTS: &str = "2.5.29.19";
pub const EXT_NAME_CONSTRAINTS: &str = "2.5.29.30";
pub const EXT_CRL_DISTRIBUTION_POINTS: &str = "2.5.29.31";
pub const EXT_CERTIFICATE_POLICIES: &str = "2.5.29.32";
pub const EXT_POLICY_MAPPINGS: &str = "2.5.29.33";
pub const EXT_AUTHORITY_KEY_ID: &str = "2.5.29.35";
pub const EXT_POLICY_CONSTRAINTS: &str = "2.5.29.36";
pub const EXT_EXTENDED_KEY_USAGE: &str = "2.5.29.37";
pub const EXT_FRESHEST_CRL: &str = "2.5.29.46";
pub const EXT_INHIBIT_ANY_POLICY: &str = "2.5.29.54";

// ── PKIX Authority/Subject Information Access (RFC 5280 Section 4.2.2) ──

pub const EXT_AUTHORITY_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.1";
pub const EXT_SUBJECT_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.11";
pub const EXT_TLS_FEATURE: &str = "1.3.6.1.5.5.7.1.12";

// ── Certificate Transparency (RFC 6962) ──────────────────────────────────

pub const EXT_SCT_LIST: &str = "1.3.6.1.4.1.11129.2.4.2";
pub const EXT_CT_POISON: &str = "1.3.6.1.4.1.11129.2.4.3";

// ── Netscape extensions (legacy) ─────────────────────────────────────────

pub const EXT_NETSCAPE_CERT_TYPE: &str = "2.16.840.1.113730.1.1";

/// Check if an extension OID is one we recognize and process.
/// RFC 5280 Section 4.2 requires that implementations reject certificates
/// containing unrecognized critical extensions.
pub(crate) fn is_known_extension(oid: &str) -> bool {
    matches!(
        oid,
        // RFC 5280 standard extensions
        EXT_SUBJECT_KEY_ID
        | EXT_KEY_USAGE
        | EXT_SUBJECT_ALT_NAME
        | EXT_ISSUER_ALT_NAME
        | EXT_BASIC_CONSTRAINTS
        | EXT_NAME_CONSTRAINTS
        | EXT_CRL_DISTRIBUTION_POINTS
        | EXT_CERTIFICATE_POLICIES
        | EXT_POLICY_MAPPINGS
        | EXT_AUTHORITY_KEY_ID
        | EXT_POLICY_CONSTRAINTS
        | EXT_EXTENDED_KEY_USAGE
        | EXT_FRESHEST_CRL
        | EXT_INHIBIT_ANY_POLICY
        // Common extensions in practice
        | EXT_AUTHORITY_INFO_ACCESS
        | EXT_SUBJECT_INFO_ACCESS
        | EXT_TLS_FEATURE
        | EXT_SCT_LIST
        | EXT_CT_POISON
        // Netscape extensions (legacy, but still seen)
        | EXT_NETSCAPE_CERT_TYPE
    )
}
