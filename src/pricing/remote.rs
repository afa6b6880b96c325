use async_trait::async_trait;
use std::time::Duration;

use super::PricingSource;
use crate::errors::CostError;
use crate::models::{PriceTable, Provider};

/// Client for an external pricing service exposing
/// `/compute/{provider}/{region}`, `/storage/{provider}` and
/// `/database/{provider}`.
pub struct RemotePricing {
    client: reqwest::Client,
    base_url: String,
}

impl RemotePricing {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CostError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CostError::UpstreamUnavailable(format!("client init: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch(&self, path: &str) -> Result<PriceTable, CostError> {
        let url = self.url(path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CostError::UpstreamUnavailable(format!("GET {url}: {e}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(%url, "Pricing service has no data");
            return Ok(PriceTable::new());
        }

        if !resp.status().is_success() {
            let status = resp.status();
            tracing::error!(%url, %status, "Pricing service returned an error");
            return Err(CostError::UpstreamUnavailable(format!("GET {url}: {status}")));
        }

        resp.json::<PriceTable>()
            .await
            .map_err(|e| CostError::UpstreamUnavailable(format!("decode {url}: {e}")))
    }
}

#[async_trait]
impl PricingSource for RemotePricing {
    async fn compute_pricing(&self, provider: Provider, region: &str) -> Result<PriceTable, CostError> {
        self.fetch(&format!("compute/{provider}/{region}")).await
    }

    async fn storage_pricing(&self, provider: Provider) -> Result<PriceTable, CostError> {
        self.fetch(&format!("storage/{provider}")).await
    }

    async fn database_pricing(&self, provider: Provider) -> Result<PriceTable, CostError> {
        self.fetch(&format!("database/{provider}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let remote = RemotePricing::new("http://pricing.internal/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(remote.url("storage/aws"), "http://pricing.internal/api/storage/aws");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_upstream_error() {
        let remote = RemotePricing::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = remote.storage_pricing(Provider::Aws).await.unwrap_err();
        assert!(matches!(err, CostError::UpstreamUnavailable(_)));
    }
}
