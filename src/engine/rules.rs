//! Recommendation rules. Each rule is a pure function of the workload and,
//! when available, its priced totals.

use serde_json::json;

use crate::models::{
    CommitmentTrigger, CostReport, DeploymentStrategy, InstanceSize, Provider, Recommendation,
    RecommendationType, SavingPotential, Severity, StorageType, Workload,
    DATABASE_COMMITMENT_THRESHOLD, STORAGE_COMMITMENT_THRESHOLD,
};

const REGION_REVIEW_THRESHOLD: f64 = 500.0;
const PROVIDER_SWITCH_MIN_SAVING: f64 = 0.15;

pub struct RuleContext<'a> {
    pub workload: &'a Workload,
    pub pricing: Option<&'a CostReport>,
}

pub trait RecommendationRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation>;
}

/// The rule set in emission order.
pub fn default_rules() -> Vec<Box<dyn RecommendationRule>> {
    vec![
        Box::new(ComputeOverProvisioning),
        Box::new(StorageOverProvisioning),
        Box::new(DatabaseOverProvisioning),
        Box::new(CommitmentDiscounts),
        Box::new(RegionOptimization),
        Box::new(StorageLifecycle),
        Box::new(ProviderCommitments),
        Box::new(MultiCloudStrategy),
    ]
}

pub fn run_rules(rules: &[Box<dyn RecommendationRule>], ctx: &RuleContext<'_>) -> Vec<Recommendation> {
    rules
        .iter()
        .flat_map(|rule| {
            let recs = rule.evaluate(ctx);
            if !recs.is_empty() {
                tracing::debug!(rule = rule.name(), count = recs.len(), "Rule matched");
            }
            recs
        })
        .collect()
}

struct Draft {
    rec_type: RecommendationType,
    severity: Severity,
    saving: SavingPotential,
    resource: String,
}

impl Draft {
    fn new(rec_type: RecommendationType, severity: Severity, saving: SavingPotential, resource: impl Into<String>) -> Self {
        Self {
            rec_type,
            severity,
            saving,
            resource: resource.into(),
        }
    }

    fn finish(
        self,
        description: impl Into<String>,
        recommendation: impl Into<String>,
        action: impl Into<String>,
        details: serde_json::Value,
    ) -> Recommendation {
        Recommendation {
            rec_type: self.rec_type,
            severity: self.severity,
            description: description.into(),
            saving_potential: self.saving,
            resource: self.resource,
            recommendation: recommendation.into(),
            action: action.into(),
            details,
        }
    }
}

pub struct ComputeOverProvisioning;

impl RecommendationRule for ComputeOverProvisioning {
    fn name(&self) -> &'static str {
        "compute_over_provisioning"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        let mut recs = Vec::new();
        for (i, vm) in ctx.workload.compute.iter().enumerate() {
            let Some(util) = vm.utilization else { continue };
            let resource = format!("Compute instance {}", i + 1);

            if vm.size() == InstanceSize::Large && util < 50.0 {
                recs.push(
                    Draft::new(
                        RecommendationType::ComputeRightsizing,
                        Severity::High,
                        SavingPotential::range(20, 30),
                        resource.clone(),
                    )
                    .finish(
                        format!("Large instance running at {util}% utilization"),
                        "Downsize to a medium instance size",
                        "Resize the instance to the medium tier and monitor utilization",
                        json!({ "current_size": "large", "suggested_size": "medium", "utilization": util }),
                    ),
                );
            }

            if vm.quantity > 3 && util < 30.0 {
                let suggested = (vm.quantity / 2).max(1);
                recs.push(
                    Draft::new(
                        RecommendationType::ComputeScaling,
                        Severity::Medium,
                        SavingPotential::range(15, 25),
                        resource,
                    )
                    .finish(
                        format!("{} instances averaging {util}% utilization", vm.quantity),
                        format!("Reduce the instance count to around {suggested}"),
                        "Consolidate load onto fewer instances or enable autoscaling",
                        json!({ "current_count": vm.quantity, "suggested_count": suggested, "utilization": util }),
                    ),
                );
            }
        }
        recs
    }
}

pub struct StorageOverProvisioning;

impl RecommendationRule for StorageOverProvisioning {
    fn name(&self) -> &'static str {
        "storage_over_provisioning"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        let mut recs = Vec::new();
        for (i, volume) in ctx.workload.storage.iter().enumerate() {
            let resource = format!("Storage volume {}", i + 1);

            if volume.kind == StorageType::Premium && !volume.critical {
                recs.push(
                    Draft::new(
                        RecommendationType::StorageTier,
                        Severity::Medium,
                        SavingPotential::range(40, 60),
                        resource.clone(),
                    )
                    .finish(
                        "Premium storage used for non-critical data",
                        "Switch to standard storage",
                        "Migrate the volume to the standard storage tier",
                        json!({ "current_type": "premium", "suggested_type": "standard", "size_gb": volume.size_gb }),
                    ),
                );
            }

            if let Some(util) = volume.utilization {
                if volume.size_gb > 1000.0 && util < 40.0 {
                    let suggested = (volume.size_gb * util / 100.0 * 1.2).ceil();
                    recs.push(
                        Draft::new(
                            RecommendationType::StorageRightsizing,
                            Severity::Low,
                            SavingPotential::range(10, 20),
                            resource,
                        )
                        .finish(
                            format!("{} GB provisioned at {util}% utilization", volume.size_gb),
                            format!("Shrink the volume to about {suggested} GB"),
                            "Resize the volume and keep 20% headroom",
                            json!({ "current_size_gb": volume.size_gb, "suggested_size_gb": suggested, "utilization": util }),
                        ),
                    );
                }
            }
        }
        recs
    }
}

pub struct DatabaseOverProvisioning;

impl RecommendationRule for DatabaseOverProvisioning {
    fn name(&self) -> &'static str {
        "database_over_provisioning"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        ctx.workload
            .database
            .iter()
            .enumerate()
            .filter_map(|(i, db)| {
                let util = db.utilization?;
                if !db.is_high_tier() || util >= 40.0 {
                    return None;
                }
                Some(
                    Draft::new(
                        RecommendationType::DatabaseRightsizing,
                        Severity::High,
                        SavingPotential::range(30, 50),
                        format!("Database {}", i + 1),
                    )
                    .finish(
                        format!("High-tier database running at {util}% utilization"),
                        "Downgrade to a lower database tier",
                        "Move the database to the medium tier during the next maintenance window",
                        json!({ "current_tier": db.tier, "suggested_tier": "medium", "utilization": util }),
                    ),
                )
            })
            .collect()
    }
}

pub struct CommitmentDiscounts;

impl RecommendationRule for CommitmentDiscounts {
    fn name(&self) -> &'static str {
        "commitment_discounts"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        let mut recs = Vec::new();

        for (i, vm) in ctx.workload.compute.iter().enumerate() {
            let hours = vm.hours_per_month;
            let resource = format!("Compute instance {}", i + 1);
            if hours > 700.0 {
                recs.push(
                    Draft::new(
                        RecommendationType::ReservedInstances,
                        Severity::High,
                        SavingPotential::range(30, 60),
                        resource,
                    )
                    .finish(
                        format!("Instance runs {hours} hours per month"),
                        "Use reserved instances for always-on capacity",
                        "Purchase 1-year or 3-year reserved instances",
                        json!({ "hours_per_month": hours, "quantity": vm.quantity }),
                    ),
                );
            } else if hours > 400.0 {
                recs.push(
                    Draft::new(
                        RecommendationType::SavingsPlan,
                        Severity::Medium,
                        SavingPotential::range(20, 40),
                        resource,
                    )
                    .finish(
                        format!("Instance runs {hours} hours per month"),
                        "Cover steady usage with a savings plan",
                        "Commit to an hourly spend through a savings plan",
                        json!({ "hours_per_month": hours, "quantity": vm.quantity }),
                    ),
                );
            }
        }

        for (i, db) in ctx.workload.database.iter().enumerate() {
            let hours = db.hours_per_month;
            if hours > 700.0 {
                recs.push(
                    Draft::new(
                        RecommendationType::ReservedDatabase,
                        Severity::High,
                        SavingPotential::range(20, 50),
                        format!("Database {}", i + 1),
                    )
                    .finish(
                        format!("Database runs {hours} hours per month"),
                        "Use reserved database capacity",
                        "Purchase reserved database capacity for 1 or 3 years",
                        json!({ "hours_per_month": hours, "quantity": db.quantity }),
                    ),
                );
            }
        }

        recs
    }
}

pub struct RegionOptimization;

impl RecommendationRule for RegionOptimization {
    fn name(&self) -> &'static str {
        "region_optimization"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        let Some(pricing) = ctx.pricing else {
            return Vec::new();
        };
        let mut recs = Vec::new();

        for provider in Provider::ALL {
            let Some(region) = ctx.workload.region.get(&provider) else { continue };
            let default_region = provider.default_region();
            let total = pricing.get(&provider).map_or(0.0, |c| c.total);
            if region == default_region || total <= REGION_REVIEW_THRESHOLD {
                continue;
            }
            recs.push(
                Draft::new(
                    RecommendationType::RegionOptimization,
                    Severity::Medium,
                    SavingPotential::range(5, 15),
                    format!("{provider} region {region}"),
                )
                .finish(
                    format!("{provider} workload runs in {region} at ${total:.2}/month"),
                    format!("Consider moving to {default_region}"),
                    format!("Evaluate latency and data residency, then migrate to {default_region}"),
                    json!({ "provider": provider, "current_region": region, "suggested_region": default_region, "monthly_cost": total }),
                ),
            );
        }

        if let Some(rec) = provider_switch(ctx.workload.preferred_provider, pricing) {
            recs.push(rec);
        }

        recs
    }
}

fn provider_switch(preferred: Provider, pricing: &CostReport) -> Option<Recommendation> {
    let preferred_total = pricing.get(&preferred)?.total;
    if preferred_total <= 0.0 {
        return None;
    }

    let (cheapest, cheapest_total) = pricing
        .iter()
        .filter(|(_, c)| c.total > 0.0)
        .fold(None::<(Provider, f64)>, |best, (p, c)| match best {
            Some((_, t)) if t <= c.total => best,
            _ => Some((*p, c.total)),
        })?;

    if cheapest == preferred {
        return None;
    }

    let saving = 1.0 - cheapest_total / preferred_total;
    if saving <= PROVIDER_SWITCH_MIN_SAVING {
        return None;
    }

    let pct = (saving * 100.0).round() as u32;
    Some(
        Draft::new(
            RecommendationType::ProviderSwitch,
            Severity::High,
            SavingPotential::range(pct, pct),
            format!("{preferred} deployment"),
        )
        .finish(
            format!("{cheapest} is {pct}% cheaper than {preferred} for this workload"),
            format!("Consider running this workload on {cheapest}"),
            format!("Plan a migration from {preferred} to {cheapest}"),
            json!({
                "current_provider": preferred,
                "suggested_provider": cheapest,
                "current_cost": preferred_total,
                "suggested_cost": cheapest_total,
                "savings_percentage": pct,
            }),
        ),
    )
}

pub struct StorageLifecycle;

impl RecommendationRule for StorageLifecycle {
    fn name(&self) -> &'static str {
        "storage_lifecycle"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        let mut recs = Vec::new();
        for (i, volume) in ctx.workload.storage.iter().enumerate() {
            let resource = format!("Storage volume {}", i + 1);
            match volume.kind {
                StorageType::Object if volume.size_gb > 500.0 => recs.push(
                    Draft::new(
                        RecommendationType::StorageLifecycle,
                        Severity::Medium,
                        SavingPotential::range(10, 30),
                        resource,
                    )
                    .finish(
                        format!("{} GB of object storage without lifecycle rules", volume.size_gb),
                        "Add lifecycle policies to move cold objects to archive tiers",
                        "Configure transitions to infrequent-access and archive classes",
                        json!({ "size_gb": volume.size_gb }),
                    ),
                ),
                StorageType::Block if volume.size_gb > 1000.0 => recs.push(
                    Draft::new(
                        RecommendationType::StorageTiering,
                        Severity::Low,
                        SavingPotential::range(15, 25),
                        resource,
                    )
                    .finish(
                        format!("{} GB block volume", volume.size_gb),
                        "Tier infrequently accessed blocks to cheaper volume types",
                        "Split hot and cold data across volume tiers",
                        json!({ "size_gb": volume.size_gb }),
                    ),
                ),
                _ => {}
            }
        }
        recs
    }
}

pub struct ProviderCommitments;

impl RecommendationRule for ProviderCommitments {
    fn name(&self) -> &'static str {
        "provider_commitments"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        let Some(pricing) = ctx.pricing else {
            return Vec::new();
        };
        let provider = ctx.workload.preferred_provider;
        let Some(costs) = pricing.get(&provider) else {
            return Vec::new();
        };
        let profile = provider.profile();

        profile
            .commitments
            .iter()
            .filter(|plan| match plan.trigger {
                CommitmentTrigger::ComputeSpend => costs.compute > profile.compute_commitment_threshold,
                CommitmentTrigger::StorageSpend => costs.storage > STORAGE_COMMITMENT_THRESHOLD,
                CommitmentTrigger::DatabaseSpend => costs.database > DATABASE_COMMITMENT_THRESHOLD,
                CommitmentTrigger::AnyDatabase => !ctx.workload.database.is_empty(),
                CommitmentTrigger::CdnNetworking => ctx.workload.has_cdn(),
                CommitmentTrigger::BigQuery => ctx.workload.has_bigquery(),
            })
            .map(|plan| {
                Draft::new(
                    RecommendationType::ProviderCommitment,
                    Severity::Medium,
                    SavingPotential::range(plan.low, plan.high),
                    format!("{provider} {}", plan.trigger.subject()),
                )
                .finish(
                    format!("{} applies to this {provider} workload", plan.program),
                    plan.recommendation,
                    plan.action,
                    json!({
                        "provider": provider,
                        "program": plan.program,
                        "compute_cost": costs.compute,
                        "storage_cost": costs.storage,
                        "database_cost": costs.database,
                    }),
                )
            })
            .collect()
    }
}

pub struct MultiCloudStrategy;

impl RecommendationRule for MultiCloudStrategy {
    fn name(&self) -> &'static str {
        "multi_cloud_strategy"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        if ctx.workload.deployment_strategy != DeploymentStrategy::MultiCloud {
            return Vec::new();
        }

        let complexity = ctx.workload.compute_units();
        let dev_hours = complexity * 8;

        vec![
            Draft::new(
                RecommendationType::MultiCloudManagement,
                Severity::High,
                SavingPotential::range(10, 20),
                "Multi-cloud deployment",
            )
            .finish(
                "Workload is spread across several providers",
                "Adopt a multi-cloud management platform for unified cost visibility",
                "Centralize billing, tagging and policy enforcement across providers",
                json!({}),
            ),
            Draft::new(
                RecommendationType::MigrationPlanning,
                Severity::Medium,
                SavingPotential::NotApplicable,
                "Multi-cloud migration",
            )
            .finish(
                "Migration effort for the multi-cloud layout",
                format!(
                    "Estimated migration complexity {complexity}, roughly {dev_hours} developer hours"
                ),
                "Plan the migration in phases, starting with stateless services",
                json!({ "complexity": complexity, "devHours": dev_hours }),
            ),
        ]
    }
}
