use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::PricingSource;
use crate::errors::CostError;
use crate::models::{PriceTable, Provider};

const BUNDLED_PRICING: &str = include_str!("../../data/pricing.json");

/// In-memory price catalog laid out as
/// `compute[provider][region][instance]`, `storage[provider][sku]` and
/// `database[provider][sku]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingCatalog {
    #[serde(default)]
    compute: HashMap<Provider, HashMap<String, PriceTable>>,
    #[serde(default)]
    storage: HashMap<Provider, PriceTable>,
    #[serde(default)]
    database: HashMap<Provider, PriceTable>,
}

impl PricingCatalog {
    /// The catalog compiled into the binary.
    pub fn bundled() -> anyhow::Result<Self> {
        Ok(serde_json::from_str(BUNDLED_PRICING)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    #[cfg(test)]
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn sku_count(&self) -> usize {
        let compute: usize = self
            .compute
            .values()
            .flat_map(|regions| regions.values())
            .map(|table| table.len())
            .sum();
        let storage: usize = self.storage.values().map(|t| t.len()).sum();
        let database: usize = self.database.values().map(|t| t.len()).sum();
        compute + storage + database
    }
}

fn section(
    tables: &HashMap<Provider, PriceTable>,
    provider: Provider,
) -> Result<PriceTable, CostError> {
    tables
        .get(&provider)
        .cloned()
        .ok_or_else(|| CostError::ProviderUnsupported(provider.to_string()))
}

#[async_trait]
impl PricingSource for PricingCatalog {
    async fn compute_pricing(&self, provider: Provider, region: &str) -> Result<PriceTable, CostError> {
        let regions = self
            .compute
            .get(&provider)
            .ok_or_else(|| CostError::ProviderUnsupported(provider.to_string()))?;
        Ok(regions.get(region).cloned().unwrap_or_default())
    }

    async fn storage_pricing(&self, provider: Provider) -> Result<PriceTable, CostError> {
        section(&self.storage, provider)
    }

    async fn database_pricing(&self, provider: Provider) -> Result<PriceTable, CostError> {
        section(&self.database, provider)
    }
}
