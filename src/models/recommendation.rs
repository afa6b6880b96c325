use serde::{Deserialize, Serialize};

use super::types::Severity;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    ComputeRightsizing,
    ComputeScaling,
    StorageTier,
    StorageRightsizing,
    DatabaseRightsizing,
    ReservedInstances,
    SavingsPlan,
    ReservedDatabase,
    RegionOptimization,
    ProviderSwitch,
    StorageLifecycle,
    StorageTiering,
    ProviderCommitment,
    MultiCloudManagement,
    MigrationPlanning,
}

/// Which part of the bill a recommendation acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactArea {
    Compute,
    Storage,
    Database,
    WholeBill,
    ProviderSpecific,
    Other,
}

impl RecommendationType {
    pub fn impact_area(self) -> ImpactArea {
        match self {
            Self::ComputeRightsizing
            | Self::ComputeScaling
            | Self::ReservedInstances
            | Self::SavingsPlan => ImpactArea::Compute,
            Self::StorageTier
            | Self::StorageRightsizing
            | Self::StorageLifecycle
            | Self::StorageTiering => ImpactArea::Storage,
            Self::DatabaseRightsizing | Self::ReservedDatabase => ImpactArea::Database,
            Self::RegionOptimization | Self::ProviderSwitch => ImpactArea::WholeBill,
            Self::ProviderCommitment => ImpactArea::ProviderSpecific,
            Self::MultiCloudManagement | Self::MigrationPlanning => ImpactArea::Other,
        }
    }
}

/// Expected reduction range, serialized as `"<low>-<high>%"` or `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SavingPotential {
    Range { low: u32, high: u32 },
    NotApplicable,
}

impl SavingPotential {
    pub fn range(low: u32, high: u32) -> Self {
        Self::Range { low, high }
    }

    /// Midpoint of the range as a fraction (`20-30%` → `0.25`).
    pub fn average_fraction(&self) -> Option<f64> {
        match self {
            Self::Range { low, high } => Some(f64::from(low + high) / 200.0),
            Self::NotApplicable => None,
        }
    }
}

impl std::fmt::Display for SavingPotential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Range { low, high } => write!(f, "{low}-{high}%"),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

impl From<SavingPotential> for String {
    fn from(value: SavingPotential) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for SavingPotential {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "N/A" {
            return Ok(Self::NotApplicable);
        }
        let parsed = value
            .strip_suffix('%')
            .and_then(|body| body.split_once('-'))
            .and_then(|(low, high)| Some((low.trim().parse().ok()?, high.trim().parse().ok()?)));
        match parsed {
            Some((low, high)) => Ok(Self::Range { low, high }),
            None => Err(format!("invalid saving potential '{value}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub rec_type: RecommendationType,
    pub severity: Severity,
    pub description: String,
    pub saving_potential: SavingPotential,
    pub resource: String,
    pub recommendation: String,
    pub action: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationSummary {
    pub total_recommendations: usize,
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
    pub estimated_monthly_savings: f64,
    pub current_monthly_cost: f64,
    pub savings_percentage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationReport {
    pub recommendations: Vec<Recommendation>,
    pub summary: RecommendationSummary,
}
