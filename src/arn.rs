//! Resource identifiers for certificates.
//!
//! Format: `arn:partition:service:region:account-id:resource`.
//! The resource section may itself contain colons.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const PREFIX: &str = "arn:";
const SECTIONS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArnError {
    #[error("arn: invalid prefix")]
    InvalidPrefix,

    #[error("arn: not enough sections")]
    NotEnoughSections,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub resource: String,
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with(PREFIX) {
            return Err(ArnError::InvalidPrefix);
        }
        let sections: Vec<&str> = s.splitn(SECTIONS, ':').collect();
        let &[_, partition, service, region, account_id, resource] = sections.as_slice() else {
            return Err(ArnError::NotEnoughSections);
        };
        Ok(Self {
            partition: partition.to_string(),
            service: service.to_string(),
            region: region.to_string(),
            account_id: account_id.to_string(),
            resource: resource.to_string(),
        })
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_certificate_arn() {
        let arn: Arn = "arn:aws:acm:us-east-1:123456789012:certificate/abc-123"
            .parse()
            .unwrap();
        assert_eq!(arn.partition, "aws");
        assert_eq!(arn.service, "acm");
        assert_eq!(arn.region, "us-east-1");
        assert_eq!(arn.account_id, "123456789012");
        assert_eq!(arn.resource, "certificate/abc-123");
    }

    #[test]
    fn test_resource_keeps_colons() {
        let arn: Arn = "arn:aws:logs:us-west-2:123456789012:log-group:/ecs/app:*"
            .parse()
            .unwrap();
        assert_eq!(arn.resource, "log-group:/ecs/app:*");
        assert_eq!(
            arn.to_string(),
            "arn:aws:logs:us-west-2:123456789012:log-group:/ecs/app:*"
        );
    }

    #[test]
    fn test_empty_region_and_account_allowed() {
        let arn: Arn = "arn:aws:s3:::my-bucket".parse().unwrap();
        assert_eq!(arn.region, "");
        assert_eq!(arn.account_id, "");
        assert_eq!(arn.resource, "my-bucket");
    }

    #[test]
    fn test_invalid_prefix() {
        assert_eq!("not-an-arn".parse::<Arn>(), Err(ArnError::InvalidPrefix));
        assert_eq!("ARN:aws:acm:::x".parse::<Arn>(), Err(ArnError::InvalidPrefix));
    }

    #[test]
    fn test_not_enough_sections() {
        let err = "arn:aws:acm:us-east-1".parse::<Arn>().unwrap_err();
        assert_eq!(err, ArnError::NotEnoughSections);
        assert_eq!(err.to_string(), "arn: not enough sections");
    }
}
