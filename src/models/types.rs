use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CostError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Aws,
    Azure,
    Gcp,
    Ibm,
    Oracle,
    Alibaba,
    Digitalocean,
}

impl Provider {
    /// Every supported provider, in reporting order.
    pub const ALL: [Provider; 7] = [
        Self::Aws,
        Self::Azure,
        Self::Gcp,
        Self::Ibm,
        Self::Oracle,
        Self::Alibaba,
        Self::Digitalocean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::Gcp => "gcp",
            Self::Ibm => "ibm",
            Self::Oracle => "oracle",
            Self::Alibaba => "alibaba",
            Self::Digitalocean => "digitalocean",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CostError::ProviderUnsupported(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Sort key: lower ranks come first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Compute,
    Storage,
    Database,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compute => write!(f, "compute"),
            Self::Storage => write!(f, "storage"),
            Self::Database => write!(f, "database"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse_is_case_insensitive() {
        assert_eq!("GCP".parse::<Provider>().unwrap(), Provider::Gcp);
        assert_eq!("digitalocean".parse::<Provider>().unwrap(), Provider::Digitalocean);
    }

    #[test]
    fn test_unknown_provider_is_unsupported() {
        let err = "linode".parse::<Provider>().unwrap_err();
        assert!(matches!(err, CostError::ProviderUnsupported(ref p) if p == "linode"));
    }

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::High.rank() < Severity::Medium.rank());
        assert!(Severity::Medium.rank() < Severity::Low.rank());
    }
}
