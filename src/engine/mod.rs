pub mod aggregator;
pub mod calculator;
pub mod ranker;
pub mod rules;

use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::ResultCache;
use crate::errors::CostError;
use crate::models::{CostReport, Provider, ProviderComparison, ProviderRank, RecommendationReport, Workload};
use crate::pricing::PricingSource;

use rules::{default_rules, run_rules, RuleContext};

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Cache key for a workload result. serde emits struct fields in
/// declaration order and maps sorted, so equal workloads hash equally.
fn cache_key(prefix: &str, workload: &Workload) -> Option<String> {
    let canonical = serde_json::to_vec(workload).ok()?;
    Some(format!("{prefix}:{}", hex::encode(Sha256::digest(&canonical))))
}

/// Prices workloads and produces recommendations, memoizing results in the
/// injected cache.
#[derive(Clone)]
pub struct CostEngine {
    pricing: Arc<dyn PricingSource>,
    cache: Arc<dyn ResultCache>,
    ttl: Duration,
}

impl CostEngine {
    pub fn new(pricing: Arc<dyn PricingSource>, cache: Arc<dyn ResultCache>, ttl: Duration) -> Self {
        Self { pricing, cache, ttl }
    }

    async fn cached<T: serde::de::DeserializeOwned>(&self, key: Option<&str>) -> Option<T> {
        let value = self.cache.get(key?).await?;
        match serde_json::from_value(value) {
            Ok(hit) => Some(hit),
            Err(e) => {
                warn!(key, error = %e, "Discarding unreadable cache entry");
                None
            }
        }
    }

    async fn store<T: serde::Serialize>(&self, key: Option<&str>, result: &T) {
        let Some(key) = key else { return };
        match serde_json::to_value(result) {
            Ok(value) => self.cache.set(key, value, self.ttl).await,
            Err(e) => warn!(key, error = %e, "Result not cached"),
        }
    }

    /// Monthly cost of `workload` on every provider.
    pub async fn calculate_workload_cost(&self, workload: &Workload) -> Result<CostReport, CostError> {
        let key = cache_key("costs", workload);
        if let Some(hit) = self.cached::<CostReport>(key.as_deref()).await {
            debug!("Cost report served from cache");
            return Ok(hit);
        }

        let report = aggregator::aggregate(self.pricing.as_ref(), workload).await?;
        self.store(key.as_deref(), &report).await;
        Ok(report)
    }

    /// Ranked recommendations for `workload`. Pricing failures only remove
    /// the savings estimate; the workload rules still run. Reports built
    /// without pricing are not cached.
    pub async fn generate_recommendations(&self, workload: &Workload) -> RecommendationReport {
        let key = cache_key("recommendations", workload);
        if let Some(hit) = self.cached::<RecommendationReport>(key.as_deref()).await {
            debug!("Recommendations served from cache");
            return hit;
        }

        let pricing = match self.calculate_workload_cost(workload).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "Pricing failed, generating recommendations without cost data");
                None
            }
        };

        let ctx = RuleContext {
            workload,
            pricing: pricing.as_ref(),
        };
        let recommendations = run_rules(&default_rules(), &ctx);
        let report = ranker::build_report(recommendations, workload, pricing.as_ref());

        if pricing.is_some() {
            self.store(key.as_deref(), &report).await;
        }
        report
    }

    /// Providers ordered cheapest first. Ties keep provider order.
    pub async fn compare_providers(&self, workload: &Workload) -> Result<ProviderComparison, CostError> {
        let report = self.calculate_workload_cost(workload).await?;

        let mut ranked: Vec<(Provider, f64)> = report.iter().map(|(p, c)| (*p, c.total)).collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let cheapest_total = ranked.first().map_or(0.0, |(_, total)| *total);
        let most_expensive_total = ranked.last().map_or(0.0, |(_, total)| *total);

        let ranking = ranked
            .iter()
            .map(|(provider, total)| ProviderRank {
                provider: *provider,
                region: workload.region_for(*provider).to_string(),
                total: *total,
                delta: round2(total - cheapest_total),
            })
            .collect();

        Ok(ProviderComparison {
            ranking,
            cheapest: ranked.first().map(|(p, _)| *p),
            most_expensive: ranked.last().map(|(p, _)| *p),
            spread: round2(most_expensive_total - cheapest_total),
            currency: "USD".to_string(),
        })
    }
}
