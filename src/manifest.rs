//! Manifest Tree - Environment Network Posture
//!
//! Plain data. Modes are derived from the fields on demand, never stored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::validation::Validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub config: EnvironmentConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub cdn: CdnConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub vpc: VpcConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpcConfig {
    #[serde(default)]
    pub subnets: SubnetsConfiguration,
}

impl VpcConfig {
    /// True if any subnet references an existing subnet by ID.
    pub fn imported(&self) -> bool {
        self.subnets.iter().any(|s| s.subnet_id().is_some())
    }

    /// True if any subnet declares a CIDR block or an availability zone.
    pub fn managed_vpc_customized(&self) -> bool {
        self.subnets
            .iter()
            .any(|s| s.cidr().is_some() || s.az().is_some())
    }

    /// Every non-empty subnet ID, private subnets first.
    pub fn imported_subnet_ids(&self) -> impl Iterator<Item = &str> {
        self.subnets
            .private
            .iter()
            .chain(&self.subnets.public)
            .filter_map(SubnetEntry::subnet_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubnetsConfiguration {
    #[serde(default)]
    pub public: Vec<SubnetEntry>,
    #[serde(default)]
    pub private: Vec<SubnetEntry>,
}

impl SubnetsConfiguration {
    /// Public entries, then private entries.
    pub fn iter(&self) -> impl Iterator<Item = &SubnetEntry> {
        self.public.iter().chain(&self.private)
    }

    pub fn len(&self) -> usize {
        self.public.len() + self.private.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One subnet declaration. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub az: Option<String>,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

impl SubnetEntry {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_cidr(cidr: impl Into<String>, az: Option<&str>) -> Self {
        Self {
            id: None,
            cidr: Some(cidr.into()),
            az: az.map(str::to_string),
        }
    }

    pub fn subnet_id(&self) -> Option<&str> {
        non_empty(&self.id)
    }

    pub fn cidr(&self) -> Option<&str> {
        non_empty(&self.cidr)
    }

    pub fn az(&self) -> Option<&str> {
        non_empty(&self.az)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_insights: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default)]
    pub public: PublicHttpConfig,
    #[serde(default)]
    pub private: PrivateHttpConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicHttpConfig {
    #[serde(default)]
    pub certificates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivateHttpConfig {
    /// Subnets the internal load balancer is placed into.
    #[serde(default, rename = "subnets")]
    pub internal_alb_subnets: Vec<String>,
    #[serde(default)]
    pub certificates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CdnConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub advanced: AdvancedCdnConfig,
}

impl CdnConfig {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.advanced.is_empty()
    }
}

/// Advanced CDN settings. No fields are recognised yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedCdnConfig {}

impl AdvancedCdnConfig {
    pub fn is_empty(&self) -> bool {
        true
    }
}

impl EnvironmentManifest {
    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Read and parse a manifest without validating it.
pub fn load_manifest(path: &Path) -> Result<EnvironmentManifest, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    EnvironmentManifest::from_json_str(&content)
}

/// Read, parse and validate a manifest. Only valid trees are returned.
pub fn load_validated(path: &Path) -> Result<EnvironmentManifest, LoadError> {
    let manifest = load_manifest(path)?;
    manifest.validate()?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mode_predicates() {
        let mut vpc = VpcConfig::default();
        assert!(!vpc.imported());
        assert!(!vpc.managed_vpc_customized());

        vpc.subnets.private.push(SubnetEntry::with_id("subnet-1"));
        assert!(vpc.imported());
        assert!(!vpc.managed_vpc_customized());

        vpc.subnets.public.push(SubnetEntry {
            az: Some("us-east-1a".to_string()),
            ..Default::default()
        });
        assert!(vpc.managed_vpc_customized());
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let entry = SubnetEntry {
            id: Some(String::new()),
            cidr: Some(String::new()),
            az: None,
        };
        assert_eq!(entry.subnet_id(), None);
        assert_eq!(entry.cidr(), None);

        let vpc = VpcConfig {
            subnets: SubnetsConfiguration {
                public: vec![entry],
                private: vec![],
            },
        };
        assert!(!vpc.imported());
        assert!(!vpc.managed_vpc_customized());
    }

    #[test]
    fn test_imported_subnet_ids_private_first() {
        let vpc = VpcConfig {
            subnets: SubnetsConfiguration {
                public: vec![SubnetEntry::with_id("pub-1"), SubnetEntry::default()],
                private: vec![SubnetEntry::with_id("priv-1")],
            },
        };
        let ids: Vec<_> = vpc.imported_subnet_ids().collect();
        assert_eq!(ids, vec!["priv-1", "pub-1"]);
    }

    #[test]
    fn test_parse_manifest_keys() {
        let manifest = EnvironmentManifest::from_json_str(
            r#"{
                "name": "test",
                "type": "Environment",
                "network": {"vpc": {"subnets": {
                    "public": [{"cidr": "10.0.0.0/24", "az": "us-east-1a"}],
                    "private": [{"id": "subnet-2"}]
                }}},
                "http": {"private": {"subnets": ["subnet-2"], "certificates": []}},
                "cdn": {"enabled": true}
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.name.as_deref(), Some("test"));
        assert_eq!(manifest.kind.as_deref(), Some("Environment"));
        let subnets = &manifest.config.network.vpc.subnets;
        assert_eq!(subnets.public[0].az(), Some("us-east-1a"));
        assert_eq!(subnets.private[0].subnet_id(), Some("subnet-2"));
        assert_eq!(manifest.config.http.private.internal_alb_subnets, vec!["subnet-2"]);
        assert!(!manifest.config.cdn.is_empty());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let manifest = EnvironmentManifest::from_json_str("{}").unwrap();
        assert_eq!(manifest, EnvironmentManifest::default());
        assert!(manifest.config.cdn.is_empty());
    }

    #[test]
    fn test_load_validated_rejects_invalid_tree() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"network": {{"vpc": {{"subnets": {{"public": [{{"id": "subnet-1"}}]}}}}}}}}"#
        )
        .unwrap();

        let err = load_validated(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Invalid(_)));
        assert!(err.to_string().contains("at least two public subnets"));

        // Loading alone does not validate.
        assert!(load_manifest(file.path()).is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = load_manifest(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }
}
