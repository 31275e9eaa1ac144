//! Environment Manifest CLI - Bridge interface for provisioning tooling
//!
//! Commands: validate, fingerprint
//! Outputs JSON to stdout, logs to stderr
//! Returns non-zero on validation failure

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use envmanifest_core::{
    compute_manifest_hash, load_manifest, EnvironmentManifest, LoadError, ValidationReport,
};

#[derive(Parser)]
#[command(name = "envmanifest-cli")]
#[command(about = "Environment Manifest CLI - network invariant checks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an environment manifest
    Validate {
        /// Path to a JSON manifest
        #[arg(short, long, conflicts_with = "payload", required_unless_present = "payload")]
        manifest: Option<PathBuf>,

        /// Inline JSON manifest
        #[arg(short, long)]
        payload: Option<String>,
    },

    /// Print the manifest fingerprint
    Fingerprint {
        /// Path to a JSON manifest
        #[arg(short, long)]
        manifest: PathBuf,
    },
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_manifest(
    manifest: Option<PathBuf>,
    payload: Option<String>,
) -> Result<EnvironmentManifest, LoadError> {
    match (manifest, payload) {
        (Some(path), _) => load_manifest(&path),
        (None, Some(payload)) => EnvironmentManifest::from_json_str(&payload),
        (None, None) => EnvironmentManifest::from_json_str("{}"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Validate { manifest, payload } => {
            let manifest = match read_manifest(manifest, payload) {
                Ok(m) => m,
                Err(e) => {
                    tracing::error!(error = %e, "could not load manifest");
                    println!("{}", serde_json::json!({"valid": false, "error": e.to_string()}));
                    return ExitCode::FAILURE;
                }
            };

            let report = match ValidationReport::generate(&manifest) {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!(error = %e, "could not hash manifest");
                    return ExitCode::FAILURE;
                }
            };

            if let Err(e) = print_json(&report) {
                eprintln!("failed to encode report: {}", e);
                return ExitCode::FAILURE;
            }
            if report.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2) // Validation failure
            }
        }

        Commands::Fingerprint { manifest } => {
            let hash = load_manifest(&manifest)
                .map_err(|e| e.to_string())
                .and_then(|m| compute_manifest_hash(&m).map_err(|e| e.to_string()));
            let output = match &hash {
                Ok(hash) => serde_json::json!({"manifest_hash": hash}),
                Err(e) => {
                    tracing::error!(error = %e, "could not fingerprint manifest");
                    serde_json::json!({"error": e})
                }
            };
            match (print_json(&output), hash) {
                (Ok(()), Ok(_)) => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            }
        }
    }
}
