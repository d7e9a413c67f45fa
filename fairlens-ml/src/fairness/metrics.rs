//! Group fairness metrics.

use super::contingency::compute_contingency;
use super::round3;
use super::significance::compute_chi_squared;
use crate::scenario::LabeledRecord;
use serde::{Deserialize, Serialize};

/// Fairness metrics for one dataset, or their simulated post-mitigation values.
///
/// The three ratio/difference fields and `chi_squared` carry at most three
/// decimal places. `p_value` is one of the fixed significance buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessMetrics {
    pub disparate_impact: f64,
    pub statistical_parity_difference: f64,
    pub equal_opportunity_difference: f64,
    pub chi_squared: f64,
    pub p_value: f64,
}

impl FairnessMetrics {
    /// Whether the group difference is significant at the 5% level.
    pub fn is_significant(&self) -> bool {
        self.p_value < 0.05
    }

    /// The p-value as shown in reports: `< 0.001` for the top bucket's
    /// strict tail, otherwise three decimals.
    pub fn p_value_display(&self) -> String {
        if self.p_value < 0.001 {
            "< 0.001".to_string()
        } else {
            format!("{:.3}", self.p_value)
        }
    }
}

/// Compute fairness metrics for `records`.
///
/// - `disparate_impact = unprivileged_rate / privileged_rate`, or exactly 0
///   when the privileged rate is 0.
/// - `statistical_parity_difference = unprivileged_rate - privileged_rate`.
/// - `equal_opportunity_difference` equals the statistical parity difference;
///   the synthetic data carries no ground-truth label to compute true-positive
///   rates from.
pub fn compute_fairness_metrics(
    records: &[LabeledRecord],
    protected_key: &str,
    favorable_outcome: &str,
    outcome_key: &str,
    privileged_value: &str,
) -> FairnessMetrics {
    let counts = compute_contingency(
        records,
        protected_key,
        privileged_value,
        outcome_key,
        favorable_outcome,
    );

    let privileged_rate = counts.privileged_rate();
    let unprivileged_rate = counts.unprivileged_rate();

    let disparate_impact = if privileged_rate > 0.0 {
        unprivileged_rate / privileged_rate
    } else {
        0.0
    };
    let statistical_parity_difference = unprivileged_rate - privileged_rate;
    let equal_opportunity_difference = statistical_parity_difference;

    let significance = compute_chi_squared(counts.a, counts.b, counts.c, counts.d);

    tracing::debug!(
        a = counts.a,
        b = counts.b,
        c = counts.c,
        d = counts.d,
        chi_squared = significance.chi_squared,
        "Computed contingency table"
    );

    FairnessMetrics {
        disparate_impact: round3(disparate_impact),
        statistical_parity_difference: round3(statistical_parity_difference),
        equal_opportunity_difference: round3(equal_opportunity_difference),
        chi_squared: significance.chi_squared,
        p_value: significance.p_value,
    }
}
