//! Validation System - Nested Node Validators
//!
//! Each manifest node validates itself and delegates to its children,
//! top-down, stopping at the first failure. Parents wrap child failures
//! with their own path segment.

use std::collections::HashSet;

use crate::arn::Arn;
use crate::error::{ManifestError, ResultExt, SubnetTier};
use crate::manifest::{
    AdvancedCdnConfig, CdnConfig, EnvironmentConfig, EnvironmentManifest, HttpConfig,
    NetworkConfig, ObservabilityConfig, PrivateHttpConfig, PublicHttpConfig, SubnetEntry,
    SubnetsConfiguration, VpcConfig,
};
use crate::MIN_AZS;

/// Validation trait - implemented by every node of the manifest tree
pub trait Validate {
    fn validate(&self) -> Result<(), ManifestError>;
}

impl Validate for EnvironmentManifest {
    fn validate(&self) -> Result<(), ManifestError> {
        self.config.validate()
    }
}

impl Validate for EnvironmentConfig {
    fn validate(&self) -> Result<(), ManifestError> {
        self.network.validate().with_context(|| r#"validate "network""#)?;
        self.observability
            .validate()
            .with_context(|| r#"validate "observability""#)?;
        self.http.validate().with_context(|| r#"validate "http config""#)?;

        // Placement needs the VPC import mode, which the HTTP node cannot see.
        if !self.http.private.internal_alb_subnets.is_empty() {
            if !self.network.vpc.imported() {
                return Err(ManifestError::AlbPlacementRequiresImport);
            }
            self.validate_internal_alb_subnets()?;
        }
        Ok(())
    }
}

impl EnvironmentConfig {
    fn validate_internal_alb_subnets(&self) -> Result<(), ManifestError> {
        let placement = &self.http.private.internal_alb_subnets;
        let imported: HashSet<&str> = self.network.vpc.imported_subnet_ids().collect();
        let found: HashSet<&str> = placement
            .iter()
            .map(String::as_str)
            .filter(|id| imported.contains(id))
            .collect();

        tracing::debug!(
            requested = placement.len(),
            found = found.len(),
            "checking internal ALB subnet placement"
        );

        // Repeated IDs collapse in `found`, so they can never satisfy the count.
        if found.len() != placement.len() {
            return Err(ManifestError::AlbSubnetsNotImported);
        }
        Ok(())
    }
}

impl Validate for NetworkConfig {
    fn validate(&self) -> Result<(), ManifestError> {
        self.vpc.validate().with_context(|| r#"validate "vpc""#)
    }
}

impl Validate for VpcConfig {
    fn validate(&self) -> Result<(), ManifestError> {
        let imported = self.imported();
        let customized = self.managed_vpc_customized();
        if imported && customized {
            return Err(ManifestError::MixedVpcStyles);
        }
        self.subnets.validate().with_context(|| r#"validate "subnets""#)?;

        tracing::debug!(
            imported,
            customized,
            public = self.subnets.public.len(),
            private = self.subnets.private.len(),
            "validating VPC subnets"
        );

        if imported {
            self.validate_imported_vpc()
                .with_context(|| r#"validate "subnets" for an imported VPC"#)?;
        } else if customized {
            self.validate_managed_vpc()
                .with_context(|| r#"validate "subnets" for an adjusted VPC"#)?;
        }
        Ok(())
    }
}

impl VpcConfig {
    fn validate_imported_vpc(&self) -> Result<(), ManifestError> {
        for tier in [SubnetTier::Public, SubnetTier::Private] {
            for (idx, subnet) in self.tier(tier).iter().enumerate() {
                if subnet.subnet_id().is_none() {
                    return Err(ManifestError::FieldRequired("id")
                        .context(format!("validate {}[{}]", tier, idx)));
                }
            }
        }

        if self.subnets.is_empty() {
            return Err(ManifestError::NoSubnets);
        }
        let public = self.subnets.public.len();
        let private = self.subnets.private.len();
        // Zero on one side is accepted; exactly one is not.
        for (tier, count) in [(SubnetTier::Public, public), (SubnetTier::Private, private)] {
            if count == 1 {
                return Err(ManifestError::TooFewSubnets(tier)
                    .context(format!("validate \"{}\"", tier)));
            }
        }
        Ok(())
    }

    fn validate_managed_vpc(&self) -> Result<(), ManifestError> {
        let public = TierLayout::collect(SubnetTier::Public, &self.subnets.public)?;
        let private = TierLayout::collect(SubnetTier::Private, &self.subnets.private)?;

        if public.azs != private.azs {
            return Err(ManifestError::AzsNotEqual);
        }
        let num_azs = public.azs.len();
        if num_azs == 0 {
            return Ok(());
        }
        if num_azs < MIN_AZS {
            return Err(ManifestError::TooFewAzs(MIN_AZS));
        }
        for layout in [&public, &private] {
            if layout.cidrs.len() != num_azs {
                return Err(ManifestError::CidrCountMismatch {
                    tier: layout.tier,
                    cidrs: layout.cidrs.len(),
                    azs: num_azs,
                }
                .context(format!("validate \"{}\"", layout.tier)));
            }
        }
        Ok(())
    }

    fn tier(&self, tier: SubnetTier) -> &[SubnetEntry] {
        match tier {
            SubnetTier::Public => &self.subnets.public,
            SubnetTier::Private => &self.subnets.private,
        }
    }
}

/// Distinct CIDRs and AZs declared on one side of a managed VPC.
struct TierLayout<'a> {
    tier: SubnetTier,
    cidrs: HashSet<&'a str>,
    azs: HashSet<&'a str>,
}

impl<'a> TierLayout<'a> {
    fn collect(tier: SubnetTier, subnets: &'a [SubnetEntry]) -> Result<Self, ManifestError> {
        let mut layout = Self {
            tier,
            cidrs: HashSet::new(),
            azs: HashSet::new(),
        };
        for (idx, subnet) in subnets.iter().enumerate() {
            let cidr = subnet.cidr().ok_or_else(|| {
                ManifestError::FieldRequired("cidr").context(format!("validate {}[{}]", tier, idx))
            })?;
            layout.cidrs.insert(cidr);
            if let Some(az) = subnet.az() {
                layout.azs.insert(az);
            }
        }
        Ok(layout)
    }
}

impl Validate for SubnetsConfiguration {
    fn validate(&self) -> Result<(), ManifestError> {
        for (idx, subnet) in self.public.iter().enumerate() {
            subnet
                .validate()
                .with_context(|| format!("validate \"public[{}]\"", idx))?;
        }
        for (idx, subnet) in self.private.iter().enumerate() {
            subnet
                .validate()
                .with_context(|| format!("validate \"private[{}]\"", idx))?;
        }
        Ok(())
    }
}

impl Validate for SubnetEntry {
    fn validate(&self) -> Result<(), ManifestError> {
        if self.subnet_id().is_some() && self.cidr().is_some() {
            return Err(ManifestError::FieldMutuallyExclusive {
                first: "id",
                second: "cidr",
                must_exist: false,
            });
        }
        if self.subnet_id().is_some() && self.az().is_some() {
            return Err(ManifestError::FieldMutuallyExclusive {
                first: "id",
                second: "az",
                must_exist: false,
            });
        }
        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> Result<(), ManifestError> {
        Ok(())
    }
}

impl Validate for HttpConfig {
    fn validate(&self) -> Result<(), ManifestError> {
        self.public.validate().with_context(|| r#"validate "public""#)?;
        self.private.validate().with_context(|| r#"validate "private""#)?;
        Ok(())
    }
}

impl Validate for PublicHttpConfig {
    fn validate(&self) -> Result<(), ManifestError> {
        validate_certificates(&self.certificates)
    }
}

impl Validate for PrivateHttpConfig {
    fn validate(&self) -> Result<(), ManifestError> {
        validate_certificates(&self.certificates)
    }
}

fn validate_certificates(certificates: &[String]) -> Result<(), ManifestError> {
    for (idx, cert) in certificates.iter().enumerate() {
        cert.parse::<Arn>()
            .with_context(|| format!("parse \"certificates[{}]\"", idx))?;
    }
    Ok(())
}

impl Validate for CdnConfig {
    fn validate(&self) -> Result<(), ManifestError> {
        if self.is_empty() {
            return Ok(());
        }
        self.advanced.validate()
    }
}

impl Validate for AdvancedCdnConfig {
    fn validate(&self) -> Result<(), ManifestError> {
        Ok(())
    }
}
