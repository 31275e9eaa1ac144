//! Validation Report - Machine-Readable Outcome
//!
//! CRITICAL: generate MUST call validate internally. A report never claims
//! a manifest is valid without running every rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ManifestError};
use crate::hashing::compute_manifest_hash;
use crate::manifest::EnvironmentManifest;
use crate::validation::Validate;
use crate::VALIDATOR_VERSION;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportedError {
    pub kind: ErrorKind,
    pub message: String,
    pub path: Vec<String>,
}

impl From<&ManifestError> for ReportedError {
    fn from(err: &ManifestError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            path: err.path().into_iter().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub manifest_name: Option<String>,
    pub imported: bool,
    pub managed_vpc_customized: bool,
    #[serde(default)]
    pub error: Option<ReportedError>,
    pub manifest_hash: String,
    pub validator_version: String,
    pub checked_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn generate(manifest: &EnvironmentManifest) -> Result<Self, serde_json::Error> {
        let outcome = manifest.validate();
        let manifest_hash = compute_manifest_hash(manifest)?;
        let vpc = &manifest.config.network.vpc;

        match &outcome {
            Ok(()) => tracing::info!(
                manifest = manifest.name.as_deref().unwrap_or_default(),
                hash = %manifest_hash,
                "manifest is valid"
            ),
            Err(err) => tracing::warn!(
                manifest = manifest.name.as_deref().unwrap_or_default(),
                kind = ?err.kind(),
                error = %err,
                "manifest rejected"
            ),
        }

        Ok(Self {
            valid: outcome.is_ok(),
            manifest_name: manifest.name.clone(),
            imported: vpc.imported(),
            managed_vpc_customized: vpc.managed_vpc_customized(),
            error: outcome.as_ref().err().map(ReportedError::from),
            manifest_hash,
            validator_version: VALIDATOR_VERSION.to_string(),
            checked_at: Utc::now(),
        })
    }
}
