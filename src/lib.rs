//! Environment Manifest Core - Network Invariant Validator
//!
//! Decides whether an environment's network tree (VPC subnets, HTTP
//! exposure, CDN) is consistent before anything is provisioned.
//!
//! # Guarantees
//! 1. Validation Is Pure - no I/O, no mutation, same tree gives same answer
//! 2. First Failure Wins - one error, qualified by its full field path
//! 3. Modes Are Derived - imported vs. managed comes from the subnets themselves
//! 4. Reports Always Validate - no report skips the rules

pub mod arn;
pub mod error;
pub mod manifest;
pub mod hashing;
pub mod validation;
pub mod report;

pub use arn::{Arn, ArnError};
pub use error::{ErrorKind, LoadError, ManifestError, SubnetTier};
pub use manifest::{
    load_manifest, load_validated, AdvancedCdnConfig, CdnConfig, EnvironmentConfig,
    EnvironmentManifest, HttpConfig, NetworkConfig, ObservabilityConfig, PrivateHttpConfig,
    PublicHttpConfig, SubnetEntry, SubnetsConfiguration, VpcConfig,
};
pub use hashing::{canonical_json, compute_manifest_hash};
pub use validation::Validate;
pub use report::{ReportedError, ValidationReport};

pub const VALIDATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum number of availability zones for a managed VPC that declares any.
pub const MIN_AZS: usize = 2;
