//! certwalk: validate X.509 certificate chains from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use certwalk_lib::{
    compute_fingerprint, format_fingerprint, parse_pem_chain, validate_der_chain, Checks,
    DigestAlgorithm, Hooks, TrustStore,
};

#[derive(Parser)]
#[command(name = "certwalk", about = "Validate X.509 certificate chains")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a certificate chain against a trust store
    Verify {
        /// PEM file containing the chain, leaf first. Reads from stdin if omitted.
        file: Option<PathBuf>,
        /// Hostname to match against the leaf certificate's CN/SAN.
        /// Omitting it skips hostname matching.
        #[arg(long)]
        hostname: Option<String>,
        /// PEM file containing trusted CA certificates (default: system trust store)
        #[arg(long = "CAfile", visible_alias = "ca-file", value_name = "FILE")]
        ca_file: Option<PathBuf>,
        /// Directory of trusted CA certificates in PEM format
        #[arg(long = "CApath", visible_alias = "ca-path", value_name = "DIR")]
        ca_path: Option<PathBuf>,
        /// Validate at a specific Unix timestamp instead of now
        #[arg(long, value_name = "EPOCH")]
        attime: Option<i64>,
        /// Skip validity date checks
        #[arg(long)]
        no_check_time: bool,
        /// Require the presented chain to already be in issuer order
        #[arg(long)]
        strict_order: bool,
        /// Report every failure instead of stopping at the first
        #[arg(long)]
        exhaustive: bool,
        /// Skip the leaf X.509v3 version check
        #[arg(long)]
        no_v3: bool,
        /// Skip CA constraint checks on issuers
        #[arg(long)]
        no_ca_constraints: bool,
        /// Key usage flag the leaf must allow (e.g. digitalSignature); repeatable
        #[arg(long = "key-usage", value_name = "FLAG")]
        key_usage: Vec<String>,
        /// Purpose the leaf must allow (sslserver, sslclient, ... or an OID); repeatable
        #[arg(long, value_name = "PURPOSE")]
        purpose: Vec<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Print a certificate fingerprint
    Fingerprint {
        /// Certificate file (PEM or DER). Reads from stdin if omitted.
        file: Option<PathBuf>,
        /// Hash algorithm: sha1, sha256, sha384, or sha512
        #[arg(long, default_value = "sha256")]
        digest: String,
    },
}

fn read_input(file: Option<&PathBuf>) -> Result<Vec<u8>> {
    match file {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Verify {
            file,
            hostname,
            ca_file,
            ca_path,
            attime,
            no_check_time,
            strict_order,
            exhaustive,
            no_v3,
            no_ca_constraints,
            key_usage,
            purpose,
            json,
        } => {
            let input = read_input(file.as_ref())?;

            let mut store = match ca_file {
                Some(path) => TrustStore::from_pem_file(path)?,
                None => TrustStore::system()?,
            };
            if let Some(dir) = ca_path {
                store.add_pem_directory(dir)?;
            }

            let checks = Checks {
                time_validity: !no_check_time,
                strict_ordering: *strict_order,
                ca_constraints: !no_ca_constraints,
                exhaustive: *exhaustive,
                leaf_v3: !no_v3,
                leaf_key_usage: key_usage
                    .iter()
                    .map(|s| s.parse())
                    .collect::<Result<_, _>>()?,
                leaf_key_purpose: purpose
                    .iter()
                    .map(|s| s.parse())
                    .collect::<Result<_, _>>()?,
                fqhn: hostname.is_some(),
            };

            let chain_der = parse_pem_chain(&input)?;
            let failures = validate_der_chain(
                *attime,
                &Hooks::default(),
                &checks,
                &store,
                hostname.as_deref().unwrap_or(""),
                &chain_der,
            )?;

            if *json {
                let report = serde_json::json!({
                    "valid": failures.is_empty(),
                    "failures": &failures,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if failures.is_empty() {
                println!("OK");
            } else {
                for failure in &failures {
                    println!("{}", failure);
                }
            }

            if !failures.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Fingerprint { file, digest } => {
            let input = read_input(file.as_ref())?;
            let algorithm: DigestAlgorithm = digest.parse()?;

            // Auto-detect PEM vs DER input.
            let trimmed: Vec<u8> = input
                .iter()
                .skip_while(|b| b.is_ascii_whitespace())
                .take(11)
                .copied()
                .collect();
            let der = if trimmed.starts_with(b"-----BEGIN") {
                parse_pem_chain(&input)?
                    .into_iter()
                    .next()
                    .context("no certificate found in input")?
            } else {
                input
            };

            println!("{}", format_fingerprint(&compute_fingerprint(&der, algorithm)));
        }
    }

    Ok(())
}
