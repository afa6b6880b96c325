use serde_json::json;

use crate::errors::CostError;
use crate::models::{CostLine, PriceRecord, PriceTable, Provider, ResourceKind};
use crate::pricing::PricingSource;

/// Hours in a billing month. Database pricing always uses this, whatever the
/// workload declares.
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Prices single line items against a pricing source.
pub struct CostCalculator<'a> {
    pricing: &'a dyn PricingSource,
}

fn lookup<'t>(
    table: &'t PriceTable,
    provider: Provider,
    kind: ResourceKind,
    region: &str,
    resource: &str,
) -> Result<&'t PriceRecord, CostError> {
    table.get(resource).ok_or_else(|| not_found(provider, kind, region, resource))
}

fn not_found(provider: Provider, kind: ResourceKind, region: &str, resource: &str) -> CostError {
    CostError::PricingNotFound {
        provider,
        kind,
        region: region.to_string(),
        resource: resource.to_string(),
    }
}

impl<'a> CostCalculator<'a> {
    pub fn new(pricing: &'a dyn PricingSource) -> Self {
        Self { pricing }
    }

    pub async fn compute_cost(
        &self,
        provider: Provider,
        region: &str,
        instance_type: &str,
        quantity: u32,
        hours_per_month: f64,
    ) -> Result<CostLine, CostError> {
        let table = self.pricing.compute_pricing(provider, region).await?;
        let price = lookup(&table, provider, ResourceKind::Compute, region, instance_type)?;
        let hourly = price
            .hourly
            .ok_or_else(|| not_found(provider, ResourceKind::Compute, region, instance_type))?;

        let hourly_cost = hourly * f64::from(quantity);
        let monthly_cost = hourly_cost * hours_per_month;

        Ok(CostLine {
            provider,
            kind: ResourceKind::Compute,
            region: Some(region.to_string()),
            resource_id: instance_type.to_string(),
            quantity,
            size_gb: None,
            hourly_cost: Some(hourly_cost),
            monthly_cost,
            specs: json!({
                "vcpu": price.vcpu,
                "memory": price.memory,
                "hours_per_month": hours_per_month,
            }),
        })
    }

    pub async fn storage_cost(
        &self,
        provider: Provider,
        storage_type: &str,
        size_gb: f64,
    ) -> Result<CostLine, CostError> {
        let table = self.pricing.storage_pricing(provider).await?;
        let region = provider.default_region();
        let price = lookup(&table, provider, ResourceKind::Storage, region, storage_type)?;
        let per_gb = price
            .monthly_per_gb
            .ok_or_else(|| not_found(provider, ResourceKind::Storage, region, storage_type))?;

        Ok(CostLine {
            provider,
            kind: ResourceKind::Storage,
            region: None,
            resource_id: storage_type.to_string(),
            quantity: 1,
            size_gb: Some(size_gb),
            hourly_cost: None,
            monthly_cost: per_gb * size_gb,
            specs: price.details.clone(),
        })
    }

    pub async fn database_cost(
        &self,
        provider: Provider,
        db_type: &str,
        quantity: u32,
    ) -> Result<CostLine, CostError> {
        let table = self.pricing.database_pricing(provider).await?;
        let region = provider.default_region();
        let price = lookup(&table, provider, ResourceKind::Database, region, db_type)?;

        // A record with neither rate prices at zero rather than failing.
        let (hourly_cost, monthly_cost) = match (price.monthly, price.hourly) {
            (Some(monthly), _) => (None, monthly * f64::from(quantity)),
            (None, Some(hourly)) => {
                let hourly_cost = hourly * f64::from(quantity);
                (Some(hourly_cost), hourly_cost * HOURS_PER_MONTH)
            }
            (None, None) => (None, 0.0),
        };

        Ok(CostLine {
            provider,
            kind: ResourceKind::Database,
            region: None,
            resource_id: db_type.to_string(),
            quantity,
            size_gb: None,
            hourly_cost,
            monthly_cost,
            specs: price.details.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingCatalog;

    fn fixture() -> PricingCatalog {
        PricingCatalog::from_value(json!({
            "compute": {
                "aws": {
                    "us-east-1": {
                        "t2.medium": { "hourly": 0.05, "vcpu": 2, "memory": 4 },
                        "broken": { "vcpu": 2 }
                    },
                    "us-west-2": {}
                }
            },
            "storage": {
                "aws": { "ebs-gp3": { "monthly_per_gb": 0.08 } }
            },
            "database": {
                "aws": {
                    "rds-mysql": { "hourly": 0.1 },
                    "dynamodb": { "monthly": 30.0, "hourly": 5.0 },
                    "legacy": { "monthly_per_gb": 0.25 }
                }
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_compute_cost() {
        let catalog = fixture();
        let calc = CostCalculator::new(&catalog);
        let line = calc
            .compute_cost(Provider::Aws, "us-east-1", "t2.medium", 3, 100.0)
            .await
            .unwrap();

        assert!((line.hourly_cost.unwrap() - 0.15).abs() < 1e-9);
        assert!((line.monthly_cost - 15.0).abs() < 1e-9);
        assert_eq!(line.specs["vcpu"], json!(2.0));
    }

    #[tokio::test]
    async fn test_compute_cost_missing_instance() {
        let catalog = fixture();
        let calc = CostCalculator::new(&catalog);
        let err = calc
            .compute_cost(Provider::Aws, "us-east-1", "m5.large", 1, 730.0)
            .await
            .unwrap_err();
        assert!(matches!(err, CostError::PricingNotFound { kind: ResourceKind::Compute, .. }));
    }

    #[tokio::test]
    async fn test_empty_region_raises() {
        let catalog = fixture();
        let calc = CostCalculator::new(&catalog);
        let err = calc
            .compute_cost(Provider::Aws, "us-west-2", "t2.medium", 1, 730.0)
            .await
            .unwrap_err();
        assert!(matches!(err, CostError::PricingNotFound { .. }));
    }

    #[tokio::test]
    async fn test_compute_record_without_hourly_raises() {
        let catalog = fixture();
        let calc = CostCalculator::new(&catalog);
        assert!(calc
            .compute_cost(Provider::Aws, "us-east-1", "broken", 1, 730.0)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_storage_cost() {
        let catalog = fixture();
        let calc = CostCalculator::new(&catalog);
        let line = calc.storage_cost(Provider::Aws, "ebs-gp3", 250.0).await.unwrap();
        assert!((line.monthly_cost - 20.0).abs() < 1e-9);
        assert_eq!(line.size_gb, Some(250.0));

        let err = calc.storage_cost(Provider::Aws, "s3-standard", 10.0).await.unwrap_err();
        assert!(matches!(err, CostError::PricingNotFound { kind: ResourceKind::Storage, .. }));
    }

    #[tokio::test]
    async fn test_database_hourly_uses_fixed_month() {
        let catalog = fixture();
        let calc = CostCalculator::new(&catalog);
        let line = calc.database_cost(Provider::Aws, "rds-mysql", 2).await.unwrap();
        assert!((line.monthly_cost - 0.1 * 730.0 * 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_database_flat_monthly_wins() {
        let catalog = fixture();
        let calc = CostCalculator::new(&catalog);
        let line = calc.database_cost(Provider::Aws, "dynamodb", 2).await.unwrap();
        assert!((line.monthly_cost - 60.0).abs() < 1e-9);
        assert!(line.hourly_cost.is_none());
    }

    #[tokio::test]
    async fn test_database_without_rates_is_zero() {
        let catalog = fixture();
        let calc = CostCalculator::new(&catalog);
        let line = calc.database_cost(Provider::Aws, "legacy", 4).await.unwrap();
        assert_eq!(line.monthly_cost, 0.0);

        let err = calc.database_cost(Provider::Aws, "cosmos-db", 1).await.unwrap_err();
        assert!(matches!(err, CostError::PricingNotFound { kind: ResourceKind::Database, .. }));
    }
}
