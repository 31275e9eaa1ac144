//! Error System - Path-Qualified Failures
//!
//! Every validator returns the first failure it sees.
//! Callers wrap it with their own path segment and return immediately.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::arn::ArnError;

/// Failure taxonomy, resolved through any number of context wrappers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FieldRequired,
    FieldMutuallyExclusive,
    SetMismatch,
    CardinalityViolation,
    ParseError,
    ReferenceError,
}

/// Which subnet list a rule is talking about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubnetTier {
    Public,
    Private,
}

impl SubnetTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetTier::Public => "public",
            SubnetTier::Private => "private",
        }
    }
}

impl std::fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ManifestError>,
    },

    #[error("\"{0}\" must be specified")]
    FieldRequired(&'static str),

    #[error("{}", mutually_exclusive_message(.first, .second, *.must_exist))]
    FieldMutuallyExclusive {
        first: &'static str,
        second: &'static str,
        must_exist: bool,
    },

    #[error("cannot import VPC resources (with \"id\" fields) and customize VPC resources (with \"cidr\" and \"az\" fields) at the same time")]
    MixedVpcStyles,

    #[error("public subnets and private subnets do not span the same availability zones")]
    AzsNotEqual,

    #[error("VPC must have subnets in order to proceed with environment creation")]
    NoSubnets,

    #[error("{}", too_few_subnets_message(*.0))]
    TooFewSubnets(SubnetTier),

    #[error("require at least {0} availability zones")]
    TooFewAzs(usize),

    #[error("number of {tier} subnet CIDRs ({cidrs}) does not match number of AZs ({azs})")]
    CidrCountMismatch {
        tier: SubnetTier,
        cidrs: usize,
        azs: usize,
    },

    #[error(transparent)]
    InvalidArn(#[from] ArnError),

    #[error("subnets must be imported to specify internal ALB subnet placement")]
    AlbPlacementRequiresImport,

    #[error("subnet(s) specified for internal ALB placement not imported")]
    AlbSubnetsNotImported,
}

fn mutually_exclusive_message(first: &str, second: &str, must_exist: bool) -> String {
    if must_exist {
        format!("must specify one of \"{}\" and \"{}\"", first, second)
    } else {
        format!("must specify one, not both, of \"{}\" and \"{}\"", first, second)
    }
}

fn too_few_subnets_message(tier: SubnetTier) -> &'static str {
    match tier {
        SubnetTier::Public => "at least two public subnets must be imported to enable Load Balancing",
        SubnetTier::Private => "at least two private subnets must be imported",
    }
}

impl ManifestError {
    /// Wrap this error with a path segment such as `validate "vpc"`.
    pub fn context(self, context: impl Into<String>) -> Self {
        ManifestError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every path segment stripped.
    pub fn root_cause(&self) -> &ManifestError {
        let mut current = self;
        while let ManifestError::Context { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// Path segments from outermost to innermost.
    pub fn path(&self) -> Vec<&str> {
        let mut segments = vec![];
        let mut current = self;
        while let ManifestError::Context { context, source } = current {
            segments.push(context.as_str());
            current = source.as_ref();
        }
        segments
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ManifestError::Context { source, .. } => source.kind(),
            ManifestError::FieldRequired(_) => ErrorKind::FieldRequired,
            ManifestError::FieldMutuallyExclusive { .. } | ManifestError::MixedVpcStyles => {
                ErrorKind::FieldMutuallyExclusive
            }
            ManifestError::AzsNotEqual => ErrorKind::SetMismatch,
            ManifestError::NoSubnets
            | ManifestError::TooFewSubnets(_)
            | ManifestError::TooFewAzs(_)
            | ManifestError::CidrCountMismatch { .. } => ErrorKind::CardinalityViolation,
            ManifestError::InvalidArn(_) => ErrorKind::ParseError,
            ManifestError::AlbPlacementRequiresImport | ManifestError::AlbSubnetsNotImported => {
                ErrorKind::ReferenceError
            }
        }
    }
}

pub(crate) trait ResultExt<T> {
    fn with_context<C, F>(self, f: F) -> Result<T, ManifestError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E: Into<ManifestError>> ResultExt<T> for Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T, ManifestError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().context(f()))
    }
}

/// Failures at the CLI boundary: reading, parsing, then validating a manifest.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid manifest: {0}")]
    Invalid(#[from] ManifestError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_chain_renders_outermost_first() {
        let err = ManifestError::FieldMutuallyExclusive {
            first: "id",
            second: "cidr",
            must_exist: false,
        }
        .context("validate \"public[1]\"")
        .context("validate \"subnets\"");

        assert_eq!(
            err.to_string(),
            r#"validate "subnets": validate "public[1]": must specify one, not both, of "id" and "cidr""#
        );
        assert_eq!(err.path(), vec![r#"validate "subnets""#, r#"validate "public[1]""#]);
        assert_eq!(err.kind(), ErrorKind::FieldMutuallyExclusive);
    }

    #[test]
    fn test_must_exist_message() {
        let err = ManifestError::FieldMutuallyExclusive {
            first: "id",
            second: "cidr",
            must_exist: true,
        };
        assert_eq!(err.to_string(), r#"must specify one of "id" and "cidr""#);
    }

    #[test]
    fn test_with_context_wraps_arn_errors() {
        let result: Result<(), ArnError> = Err(ArnError::InvalidPrefix);
        let err = result.with_context(|| "parse \"certificates[0]\"").unwrap_err();
        assert_eq!(err.to_string(), r#"parse "certificates[0]": arn: invalid prefix"#);
        assert_eq!(err.kind(), ErrorKind::ParseError);
        assert_eq!(err.root_cause(), &ManifestError::InvalidArn(ArnError::InvalidPrefix));
    }

    #[test]
    fn test_unwrapped_error_has_empty_path() {
        let err = ManifestError::NoSubnets;
        assert!(err.path().is_empty());
        assert_eq!(err.kind(), ErrorKind::CardinalityViolation);
    }
}
