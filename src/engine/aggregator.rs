use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::calculator::CostCalculator;
use super::round2;
use crate::errors::CostError;
use crate::models::{
    CostDetails, CostLine, CostReport, DeploymentStrategy, Provider, ProviderCostTotal, Workload,
};
use crate::pricing::PricingSource;

/// Running totals for one provider. Sums stay at full precision until
/// [`Accumulator::finish`].
#[derive(Default)]
struct Accumulator {
    compute: f64,
    storage: f64,
    database: f64,
    details: CostDetails,
}

impl Accumulator {
    fn add_compute(&mut self, line: CostLine) {
        self.compute += line.monthly_cost;
        self.details.compute.push(line);
    }

    fn add_storage(&mut self, line: CostLine) {
        self.storage += line.monthly_cost;
        self.details.storage.push(line);
    }

    fn add_database(&mut self, line: CostLine) {
        self.database += line.monthly_cost;
        self.details.database.push(line);
    }

    fn finish(self) -> ProviderCostTotal {
        let total = self.compute + self.storage + self.database;
        ProviderCostTotal {
            compute: round2(self.compute),
            storage: round2(self.storage),
            database: round2(self.database),
            total: round2(total),
            details: self.details,
        }
    }
}

/// Price `workload` on every provider.
///
/// Single-cloud compute entries are priced on all providers so totals are
/// comparable; multi-cloud entries only on the provider they name. Storage
/// and database entries are always priced everywhere, and a missing SKU
/// there only drops that line. A compute pricing failure aborts the whole
/// calculation.
pub async fn aggregate(pricing: &dyn PricingSource, workload: &Workload) -> Result<CostReport, CostError> {
    let calculator = CostCalculator::new(pricing);
    let mut totals: BTreeMap<Provider, Accumulator> = Provider::ALL
        .into_iter()
        .map(|p| (p, Accumulator::default()))
        .collect();

    for vm in &workload.compute {
        let targets = match workload.deployment_strategy {
            DeploymentStrategy::MultiCloud => vec![vm.provider.unwrap_or_default()],
            DeploymentStrategy::SingleCloud => Provider::ALL.to_vec(),
        };

        for provider in targets {
            let region = workload.region_for(provider);
            let instance = vm.instance_for(provider);
            let line = calculator
                .compute_cost(provider, region, instance, vm.quantity, vm.hours_per_month)
                .await?;
            if let Some(acc) = totals.get_mut(&provider) {
                acc.add_compute(line);
            }
        }
    }

    for (index, volume) in workload.storage.iter().enumerate() {
        for provider in Provider::ALL {
            let sku = provider.profile().storage_sku(volume.kind);
            match calculator.storage_cost(provider, sku, volume.size_gb).await {
                Ok(line) => {
                    if let Some(acc) = totals.get_mut(&provider) {
                        acc.add_storage(line);
                    }
                }
                Err(e) => warn!(%provider, sku, entry = index, error = %e, "Skipping storage entry"),
            }
        }
    }

    for (index, db) in workload.database.iter().enumerate() {
        for provider in Provider::ALL {
            let sku = provider.profile().database_sku(db.is_relational());
            match calculator.database_cost(provider, sku, db.quantity).await {
                Ok(line) => {
                    if let Some(acc) = totals.get_mut(&provider) {
                        acc.add_database(line);
                    }
                }
                Err(e) => warn!(%provider, sku, entry = index, error = %e, "Skipping database entry"),
            }
        }
    }

    let report: CostReport = totals
        .into_iter()
        .map(|(provider, acc)| (provider, acc.finish()))
        .collect();

    debug!(
        compute_entries = workload.compute.len(),
        storage_entries = workload.storage.len(),
        database_entries = workload.database.len(),
        "Aggregated workload cost"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingCatalog;
    use serde_json::json;

    fn workload(value: serde_json::Value) -> Workload {
        serde_json::from_value(value).unwrap()
    }

    fn assert_totals_consistent(report: &CostReport) {
        for (provider, cost) in report {
            let sum = cost.compute + cost.storage + cost.database;
            assert!((cost.total - sum).abs() <= 0.011, "{provider}: {} vs {sum}", cost.total);
        }
    }

    #[tokio::test]
    async fn test_empty_workload_has_all_providers() {
        let catalog = PricingCatalog::bundled().unwrap();
        let report = aggregate(&catalog, &Workload::default()).await.unwrap();

        assert_eq!(report.len(), 7);
        assert!(report.values().all(|c| c.total == 0.0));
    }

    #[tokio::test]
    async fn test_single_cloud_prices_every_provider() {
        let catalog = PricingCatalog::bundled().unwrap();
        let w = workload(json!({
            "compute": [{ "size": "large", "quantity": 2 }],
            "storage": [{ "type": "object", "sizeGB": 500 }],
            "database": [{ "type": "mysql" }]
        }));
        let report = aggregate(&catalog, &w).await.unwrap();

        assert_eq!(report.len(), 7);
        for cost in report.values() {
            assert!(cost.compute > 0.0);
            assert!(cost.storage > 0.0);
            assert!(cost.database > 0.0);
            assert_eq!(cost.details.compute.len(), 1);
        }
        // m5.large: 0.096 * 2 * 730
        assert_eq!(report[&Provider::Aws].compute, 140.16);
        // s3-standard: 0.023 * 500
        assert_eq!(report[&Provider::Aws].storage, 11.5);
        assert_eq!(report[&Provider::Aws].details.compute[0].resource_id, "m5.large");
        assert_totals_consistent(&report);
    }

    #[tokio::test]
    async fn test_multi_cloud_prices_named_provider_only() {
        let catalog = PricingCatalog::bundled().unwrap();
        let w = workload(json!({
            "deploymentStrategy": "multi-cloud",
            "compute": [{ "provider": "gcp", "quantity": 2 }]
        }));
        let report = aggregate(&catalog, &w).await.unwrap();

        for (provider, cost) in &report {
            if *provider == Provider::Gcp {
                // e2-medium: 0.0335 * 2 * 730
                assert_eq!(cost.compute, 48.91);
            } else {
                assert_eq!(cost.compute, 0.0);
            }
        }
    }

    #[tokio::test]
    async fn test_multi_cloud_defaults_to_aws() {
        let catalog = PricingCatalog::bundled().unwrap();
        let w = workload(json!({
            "deploymentStrategy": "multi-cloud",
            "compute": [{ "size": "small" }]
        }));
        let report = aggregate(&catalog, &w).await.unwrap();

        assert!(report[&Provider::Aws].compute > 0.0);
        assert_eq!(report.values().filter(|c| c.compute > 0.0).count(), 1);
    }

    #[tokio::test]
    async fn test_region_override_is_used() {
        let catalog = PricingCatalog::bundled().unwrap();
        let w = workload(json!({
            "deploymentStrategy": "multi-cloud",
            "region": { "aws": "eu-west-1" },
            "compute": [{ "provider": "aws", "size": "large" }]
        }));
        let report = aggregate(&catalog, &w).await.unwrap();

        let line = &report[&Provider::Aws].details.compute[0];
        assert_eq!(line.region.as_deref(), Some("eu-west-1"));
        assert_eq!(report[&Provider::Aws].compute, 78.11);
    }

    #[tokio::test]
    async fn test_compute_failure_propagates() {
        let catalog = PricingCatalog::bundled().unwrap();
        let w = workload(json!({
            "region": { "ibm": "eu-de" },
            "compute": [{ "size": "small" }]
        }));
        let err = aggregate(&catalog, &w).await.unwrap_err();
        assert!(matches!(err, CostError::PricingNotFound { provider: Provider::Ibm, .. }));
    }

    #[tokio::test]
    async fn test_storage_failure_is_isolated() {
        let catalog = PricingCatalog::from_value(json!({
            "storage": {
                "aws": { "ebs-gp3": { "monthly_per_gb": 0.08 } },
                "azure": {}
            }
        }))
        .unwrap();
        let w = workload(json!({ "storage": [{ "type": "block", "sizeGB": 100 }] }));
        let report = aggregate(&catalog, &w).await.unwrap();

        assert_eq!(report.len(), 7);
        assert_eq!(report[&Provider::Aws].storage, 8.0);
        assert_eq!(report[&Provider::Azure].storage, 0.0);
        assert!(report[&Provider::Azure].details.storage.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_storage_type_uses_block_sku() {
        let catalog = PricingCatalog::bundled().unwrap();
        let w = workload(json!({ "storage": [{ "type": "archive", "sizeGB": 50 }] }));
        let report = aggregate(&catalog, &w).await.unwrap();

        let line = &report[&Provider::Aws].details.storage[0];
        assert_eq!(line.resource_id, "ebs-gp3");
        // ebs-gp3: 0.08 * 50
        assert_eq!(report[&Provider::Aws].storage, 4.0);
    }

    #[tokio::test]
    async fn test_database_ignores_declared_hours() {
        let catalog = PricingCatalog::bundled().unwrap();
        let w = workload(json!({ "database": [{ "type": "mysql", "hoursPerMonth": 100 }] }));
        let report = aggregate(&catalog, &w).await.unwrap();

        // rds-mysql: 0.068 * 730
        assert_eq!(report[&Provider::Aws].database, 49.64);
    }

    #[tokio::test]
    async fn test_non_mysql_uses_document_sku() {
        let catalog = PricingCatalog::bundled().unwrap();
        let w = workload(json!({ "database": [{ "type": "mongodb", "quantity": 2 }] }));
        let report = aggregate(&catalog, &w).await.unwrap();

        assert_eq!(report[&Provider::Aws].details.database[0].resource_id, "dynamodb");
        assert_eq!(report[&Provider::Aws].database, 60.0);
    }

    #[tokio::test]
    async fn test_aggregation_is_deterministic() {
        let catalog = PricingCatalog::bundled().unwrap();
        let w = workload(json!({
            "compute": [{ "size": "medium", "quantity": 3, "hoursPerMonth": 500 }],
            "storage": [{ "type": "premium", "sizeGB": 750 }],
            "database": [{}]
        }));
        let first = aggregate(&catalog, &w).await.unwrap();
        let second = aggregate(&catalog, &w).await.unwrap();

        assert_eq!(first, second);
        assert_totals_consistent(&first);
    }
}
