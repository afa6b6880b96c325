use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::{Provider, ResourceKind};

/// One priced SKU as published by a pricing source. Compute records carry
/// `hourly`/`vcpu`/`memory`, storage records `monthly_per_gb`, database
/// records `hourly` or `monthly`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_per_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<f64>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

/// SKU id → price record. Empty when the source has nothing for the request.
pub type PriceTable = BTreeMap<String, PriceRecord>;

/// A single priced line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostLine {
    pub provider: Provider,
    pub kind: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub resource_id: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_cost: Option<f64>,
    pub monthly_cost: f64,
    #[serde(default)]
    pub specs: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CostDetails {
    pub compute: Vec<CostLine>,
    pub storage: Vec<CostLine>,
    pub database: Vec<CostLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderCostTotal {
    pub compute: f64,
    pub storage: f64,
    pub database: f64,
    pub total: f64,
    pub details: CostDetails,
}

impl ProviderCostTotal {
    /// Share of the total spent on `kind`, or `fallback` when nothing is spent.
    pub fn share(&self, kind: ResourceKind, fallback: f64) -> f64 {
        if self.total <= 0.0 {
            return fallback;
        }
        let part = match kind {
            ResourceKind::Compute => self.compute,
            ResourceKind::Storage => self.storage,
            ResourceKind::Database => self.database,
        };
        part / self.total
    }
}

/// Monthly cost of a workload on every provider.
pub type CostReport = BTreeMap<Provider, ProviderCostTotal>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRank {
    pub provider: Provider,
    pub region: String,
    pub total: f64,
    /// Extra monthly cost compared to the cheapest provider.
    pub delta: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderComparison {
    pub ranking: Vec<ProviderRank>,
    pub cheapest: Option<Provider>,
    pub most_expensive: Option<Provider>,
    pub spread: f64,
    pub currency: String,
}
