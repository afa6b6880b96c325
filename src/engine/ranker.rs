use super::round2;
use crate::models::{
    CostReport, ImpactArea, ProviderCostTotal, Recommendation, RecommendationReport,
    RecommendationSummary, ResourceKind, Severity, Workload,
};

const COMPUTE_FALLBACK_SHARE: f64 = 0.4;
const STORAGE_FALLBACK_SHARE: f64 = 0.2;
const DATABASE_FALLBACK_SHARE: f64 = 0.2;
const PROVIDER_PLAN_FALLBACK_SHARE: f64 = 0.5;
const OTHER_SHARE: f64 = 0.2;

/// Stable sort by severity; equal severities keep emission order.
pub fn rank(mut recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    recommendations.sort_by_key(|r| r.severity.rank());
    recommendations
}

/// Fraction of the preferred provider's bill a recommendation acts on.
fn affected_portion(rec: &Recommendation, costs: Option<&ProviderCostTotal>, compute_units: u64) -> f64 {
    let share = |kind: ResourceKind, fallback: f64| costs.map_or(fallback, |c| c.share(kind, fallback));
    let compute_share = share(ResourceKind::Compute, COMPUTE_FALLBACK_SHARE);

    if rec.resource.to_lowercase().contains("instance") && compute_units > 0 {
        return compute_share / compute_units as f64;
    }

    match rec.rec_type.impact_area() {
        ImpactArea::Compute => compute_share,
        ImpactArea::Storage => share(ResourceKind::Storage, STORAGE_FALLBACK_SHARE),
        ImpactArea::Database => share(ResourceKind::Database, DATABASE_FALLBACK_SHARE),
        ImpactArea::WholeBill => 1.0,
        ImpactArea::ProviderSpecific => {
            let action = rec.action.to_lowercase();
            if action.contains("compute") || action.contains("reserved") {
                compute_share
            } else if action.contains("storage") {
                share(ResourceKind::Storage, STORAGE_FALLBACK_SHARE)
            } else if action.contains("database") || action.contains("db") {
                share(ResourceKind::Database, DATABASE_FALLBACK_SHARE)
            } else {
                PROVIDER_PLAN_FALLBACK_SHARE
            }
        }
        ImpactArea::Other => OTHER_SHARE,
    }
}

/// Monthly savings if every recommendation were adopted, against the
/// preferred provider's current bill. Returns `(savings, current_cost)`.
pub fn estimate_savings(recommendations: &[Recommendation], workload: &Workload, pricing: &CostReport) -> (f64, f64) {
    let costs = pricing.get(&workload.preferred_provider);
    let current = costs.map_or(0.0, |c| c.total);
    let units = workload.compute_units();

    let savings = recommendations
        .iter()
        .filter_map(|rec| {
            let avg = rec.saving_potential.average_fraction()?;
            Some(current * affected_portion(rec, costs, units) * avg)
        })
        .sum();

    (savings, current)
}

/// Rank the raw rule output and attach the summary. Without pricing the
/// savings figures are zero.
pub fn build_report(
    recommendations: Vec<Recommendation>,
    workload: &Workload,
    pricing: Option<&CostReport>,
) -> RecommendationReport {
    let recommendations = rank(recommendations);
    let (savings, current) = pricing
        .map(|p| estimate_savings(&recommendations, workload, p))
        .unwrap_or((0.0, 0.0));

    let savings = round2(savings);
    let current = round2(current);
    let savings_percentage = if current > 0.0 {
        (100.0 * savings / current).round() as i64
    } else {
        0
    };

    let count = |severity: Severity| recommendations.iter().filter(|r| r.severity == severity).count();
    let summary = RecommendationSummary {
        total_recommendations: recommendations.len(),
        high_priority: count(Severity::High),
        medium_priority: count(Severity::Medium),
        low_priority: count(Severity::Low),
        estimated_monthly_savings: savings,
        current_monthly_cost: current,
        savings_percentage,
    };

    RecommendationReport {
        recommendations,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostDetails, Provider, RecommendationType, SavingPotential};
    use serde_json::json;

    fn rec(
        rec_type: RecommendationType,
        severity: Severity,
        saving: SavingPotential,
        resource: &str,
        action: &str,
    ) -> Recommendation {
        Recommendation {
            rec_type,
            severity,
            description: String::new(),
            saving_potential: saving,
            resource: resource.into(),
            recommendation: String::new(),
            action: action.into(),
            details: json!({}),
        }
    }

    fn pricing(compute: f64, storage: f64, database: f64) -> CostReport {
        let mut report: CostReport = Provider::ALL
            .into_iter()
            .map(|p| (p, ProviderCostTotal::default()))
            .collect();
        report.insert(
            Provider::Aws,
            ProviderCostTotal {
                compute,
                storage,
                database,
                total: compute + storage + database,
                details: CostDetails::default(),
            },
        );
        report
    }

    #[test]
    fn test_rank_is_stable_by_severity() {
        let recs = vec![
            rec(RecommendationType::StorageRightsizing, Severity::Low, SavingPotential::range(10, 20), "a", ""),
            rec(RecommendationType::StorageTier, Severity::Medium, SavingPotential::range(40, 60), "b", ""),
            rec(RecommendationType::ComputeRightsizing, Severity::High, SavingPotential::range(20, 30), "c", ""),
            rec(RecommendationType::StorageLifecycle, Severity::Medium, SavingPotential::range(10, 30), "d", ""),
            rec(RecommendationType::ReservedInstances, Severity::High, SavingPotential::range(30, 60), "e", ""),
        ];
        let ranked = rank(recs);
        let order: Vec<_> = ranked.iter().map(|r| r.resource.as_str()).collect();
        assert_eq!(order, vec!["c", "e", "b", "d", "a"]);
    }

    #[test]
    fn test_whole_bill_recommendation() {
        let w = Workload::default();
        let p = pricing(80.0, 20.0, 0.0);
        let recs = vec![rec(RecommendationType::ProviderSwitch, Severity::High, SavingPotential::range(40, 40), "aws deployment", "")];
        let (savings, current) = estimate_savings(&recs, &w, &p);

        assert_eq!(current, 100.0);
        assert!((savings - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_storage_share() {
        let w = Workload::default();
        let p = pricing(80.0, 20.0, 0.0);
        let recs = vec![rec(RecommendationType::StorageTier, Severity::Medium, SavingPotential::range(40, 60), "Storage volume 1", "")];
        let (savings, _) = estimate_savings(&recs, &w, &p);

        // 100 * 0.2 * 0.5
        assert!((savings - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_instance_resource_divides_by_units() {
        let w: Workload = serde_json::from_value(json!({ "compute": [{ "quantity": 3 }, { "quantity": 1 }] })).unwrap();
        let p = pricing(80.0, 20.0, 0.0);
        let recs = vec![rec(RecommendationType::ReservedInstances, Severity::High, SavingPotential::range(30, 60), "Compute instance 1", "")];
        let (savings, _) = estimate_savings(&recs, &w, &p);

        // 100 * (0.8 / 4) * 0.45
        assert!((savings - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_provider_specific_reads_action() {
        let w = Workload::default();
        let p = pricing(50.0, 30.0, 20.0);
        let storage = rec(RecommendationType::ProviderCommitment, Severity::Medium, SavingPotential::range(20, 20), "plan", "Buy storage capacity reservations");
        let database = rec(RecommendationType::ProviderCommitment, Severity::Medium, SavingPotential::range(20, 20), "plan", "Apply BYOL pricing to Oracle database services");
        let other = rec(RecommendationType::ProviderCommitment, Severity::Medium, SavingPotential::range(20, 20), "plan", "Purchase slot commitments");

        let (s, _) = estimate_savings(&[storage], &w, &p);
        let (d, _) = estimate_savings(&[database], &w, &p);
        let (o, _) = estimate_savings(&[other], &w, &p);
        assert!((s - 6.0).abs() < 1e-9);
        assert!((d - 4.0).abs() < 1e-9);
        assert!((o - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_not_applicable_is_skipped() {
        let w = Workload::default();
        let p = pricing(100.0, 0.0, 0.0);
        let recs = vec![rec(RecommendationType::MigrationPlanning, Severity::Medium, SavingPotential::NotApplicable, "Multi-cloud migration", "")];
        let (savings, _) = estimate_savings(&recs, &w, &p);
        assert_eq!(savings, 0.0);
    }

    #[test]
    fn test_summary_without_pricing() {
        let recs = vec![rec(RecommendationType::StorageTier, Severity::Medium, SavingPotential::range(40, 60), "Storage volume 1", "")];
        let report = build_report(recs, &Workload::default(), None);

        assert_eq!(report.summary.total_recommendations, 1);
        assert_eq!(report.summary.medium_priority, 1);
        assert_eq!(report.summary.estimated_monthly_savings, 0.0);
        assert_eq!(report.summary.current_monthly_cost, 0.0);
        assert_eq!(report.summary.savings_percentage, 0);
    }

    #[test]
    fn test_summary_percentage_matches_rounded_figures() {
        let w = Workload::default();
        let p = pricing(123.45, 67.89, 10.0);
        let recs = vec![
            rec(RecommendationType::StorageTier, Severity::Medium, SavingPotential::range(40, 60), "Storage volume 1", ""),
            rec(RecommendationType::DatabaseRightsizing, Severity::High, SavingPotential::range(30, 50), "Database 1", ""),
        ];
        let report = build_report(recs, &w, Some(&p));
        let s = &report.summary;

        assert_eq!(s.high_priority, 1);
        assert_eq!(s.current_monthly_cost, 201.34);
        assert_eq!(
            s.savings_percentage,
            (100.0 * s.estimated_monthly_savings / s.current_monthly_cost).round() as i64
        );
        assert_eq!(report.recommendations[0].severity, Severity::High);
    }
}
