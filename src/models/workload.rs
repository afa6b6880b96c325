use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::Provider;

pub const DEFAULT_HOURS_PER_MONTH: f64 = 730.0;
pub const MAX_HOURS_PER_MONTH: f64 = 744.0;
const DEFAULT_SIZE_GB: f64 = 100.0;

/// A declared workload to price and analyse. Absent fields take the
/// documented defaults during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Workload {
    #[serde(default)]
    pub compute: Vec<ComputeRequest>,
    #[serde(default)]
    pub storage: Vec<StorageRequest>,
    #[serde(default)]
    pub database: Vec<DatabaseRequest>,
    #[serde(default)]
    pub networking: Vec<NetworkingRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bigquery: Option<serde_json::Value>,
    #[serde(default)]
    pub region: BTreeMap<Provider, String>,
    #[serde(default, rename = "deploymentStrategy")]
    pub deployment_strategy: DeploymentStrategy,
    #[serde(default)]
    pub preferred_provider: Provider,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentStrategy {
    #[default]
    SingleCloud,
    MultiCloud,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InstanceSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl std::fmt::Display for InstanceSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Large => write!(f, "large"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComputeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<InstanceSize>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_hours", rename = "hoursPerMonth")]
    pub hours_per_month: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    /// Remaining keys, including `<provider>_instance` overrides.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ComputeRequest {
    pub fn size(&self) -> InstanceSize {
        self.size.unwrap_or_default()
    }

    /// Explicit instance id for `provider`, if the request carries one.
    pub fn instance_override(&self, provider: Provider) -> Option<&str> {
        self.extra
            .get(&format!("{provider}_instance"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Instance id to price on `provider`: the override, else the size table.
    pub fn instance_for(&self, provider: Provider) -> &str {
        self.instance_override(provider)
            .unwrap_or_else(|| provider.profile().instance_for(self.size()))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Object,
    Block,
    Premium,
    #[default]
    Standard,
    /// Any other declared type. Priced as block storage.
    #[serde(other)]
    Other,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Object => write!(f, "object"),
            Self::Block => write!(f, "block"),
            Self::Premium => write!(f, "premium"),
            Self::Standard => write!(f, "standard"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageRequest {
    #[serde(default, rename = "type")]
    pub kind: StorageType,
    #[serde(default = "default_size_gb", rename = "sizeGB")]
    pub size_gb: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization: Option<f64>,
    #[serde(default)]
    pub critical: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseRequest {
    #[serde(default = "default_db_type", rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_hours", rename = "hoursPerMonth")]
    pub hours_per_month: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization: Option<f64>,
}

impl DatabaseRequest {
    /// `mysql` entries price against relational SKUs, everything else
    /// against key-value/document SKUs.
    pub fn is_relational(&self) -> bool {
        self.kind.eq_ignore_ascii_case("mysql")
    }

    pub fn is_high_tier(&self) -> bool {
        self.tier
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("high"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkingRequest {
    #[serde(rename = "type")]
    pub kind: String,
}

fn default_quantity() -> u32 {
    1
}

fn default_hours() -> f64 {
    DEFAULT_HOURS_PER_MONTH
}

fn default_size_gb() -> f64 {
    DEFAULT_SIZE_GB
}

fn default_db_type() -> String {
    "mysql".into()
}

impl Workload {
    /// Region to price `provider` in: the workload override or the default.
    pub fn region_for(&self, provider: Provider) -> &str {
        self.region
            .get(&provider)
            .map(String::as_str)
            .unwrap_or_else(|| provider.default_region())
    }

    /// Sum of all compute quantities.
    pub fn compute_units(&self) -> u64 {
        self.compute.iter().map(|vm| u64::from(vm.quantity)).sum()
    }

    pub fn has_cdn(&self) -> bool {
        self.networking
            .iter()
            .any(|n| n.kind.eq_ignore_ascii_case("cdn"))
    }

    pub fn has_bigquery(&self) -> bool {
        match &self.bigquery {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Array(items)) => !items.is_empty(),
            Some(serde_json::Value::Object(fields)) => !fields.is_empty(),
            Some(_) => true,
        }
    }

    /// Reject numeric fields no real workload can carry.
    pub fn validate(&self) -> Result<(), String> {
        for (i, vm) in self.compute.iter().enumerate() {
            check_hours(vm.hours_per_month, "compute", i)?;
            check_utilization(vm.utilization, "compute", i)?;
        }
        for (i, volume) in self.storage.iter().enumerate() {
            if !volume.size_gb.is_finite() || volume.size_gb < 0.0 {
                return Err(format!("storage[{i}].sizeGB must be a non-negative number"));
            }
            check_utilization(volume.utilization, "storage", i)?;
        }
        for (i, db) in self.database.iter().enumerate() {
            check_hours(db.hours_per_month, "database", i)?;
            check_utilization(db.utilization, "database", i)?;
        }
        Ok(())
    }
}

fn check_hours(hours: f64, section: &str, index: usize) -> Result<(), String> {
    if !hours.is_finite() || !(0.0..=MAX_HOURS_PER_MONTH).contains(&hours) {
        return Err(format!(
            "{section}[{index}].hoursPerMonth must be between 0 and {MAX_HOURS_PER_MONTH}"
        ));
    }
    Ok(())
}

fn check_utilization(utilization: Option<f64>, section: &str, index: usize) -> Result<(), String> {
    match utilization {
        Some(u) if !u.is_finite() || !(0.0..=100.0).contains(&u) => Err(format!(
            "{section}[{index}].utilization must be between 0 and 100"
        )),
        _ => Ok(()),
    }
}
