//! Price lookups. The engine only sees the [`PricingSource`] trait; the
//! bundled/file catalog and the remote pricing service implement it.

pub mod catalog;
pub mod remote;

use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{PricingConfig, PricingSourceKind};
use crate::errors::CostError;
use crate::models::{PriceTable, Provider};

pub use catalog::PricingCatalog;
pub use remote::RemotePricing;

#[async_trait]
pub trait PricingSource: Send + Sync {
    /// Instance prices for `provider` in `region`. Unknown regions yield an
    /// empty table.
    async fn compute_pricing(&self, provider: Provider, region: &str) -> Result<PriceTable, CostError>;

    async fn storage_pricing(&self, provider: Provider) -> Result<PriceTable, CostError>;

    async fn database_pricing(&self, provider: Provider) -> Result<PriceTable, CostError>;
}

/// Build the pricing source selected in configuration.
pub fn from_config(config: &PricingConfig) -> anyhow::Result<Arc<dyn PricingSource>> {
    let source: Arc<dyn PricingSource> = match config.source {
        PricingSourceKind::Bundled => {
            let catalog = PricingCatalog::bundled()?;
            tracing::info!(skus = catalog.sku_count(), "Loaded bundled pricing catalog");
            Arc::new(catalog)
        }
        PricingSourceKind::File => {
            let path = config.data_path.as_deref().context("pricing.data_path is not set")?;
            let catalog = PricingCatalog::from_path(path)?;
            tracing::info!(path, skus = catalog.sku_count(), "Loaded pricing catalog");
            Arc::new(catalog)
        }
        PricingSourceKind::Remote => {
            let url = config.remote_url.as_deref().context("pricing.remote_url is not set")?;
            let timeout = Duration::from_secs(config.request_timeout_secs);
            tracing::info!(url, "Using remote pricing service");
            Arc::new(RemotePricing::new(url, timeout)?)
        }
    };
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(source: PricingSourceKind) -> PricingConfig {
        PricingConfig {
            source,
            ..PricingConfig::default()
        }
    }

    #[tokio::test]
    async fn test_bundled_source() {
        let source = from_config(&config(PricingSourceKind::Bundled)).unwrap();
        let table = source.compute_pricing(Provider::Aws, "us-east-1").await.unwrap();
        assert!(table.contains_key("m5.large"));
    }

    #[test]
    fn test_file_source_requires_path() {
        assert!(from_config(&config(PricingSourceKind::File)).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut cfg = config(PricingSourceKind::File);
        cfg.data_path = Some("/nonexistent/pricing.json".into());
        assert!(from_config(&cfg).is_err());
    }
}
