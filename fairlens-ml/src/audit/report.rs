//! Assembling the audit report request from a run's scenario and metrics.

use crate::analysis::AuditReportRequest;
use crate::fairness::MetricsPair;
use crate::scenario::ScenarioDescriptor;

/// Build the report request for `scenario` under the technique in `metrics`.
pub fn build_report_request(
    scenario: &ScenarioDescriptor,
    metrics: &MetricsPair,
) -> AuditReportRequest {
    AuditReportRequest {
        dataset_name: scenario.dataset_name(),
        protected_attribute: scenario.protected_attribute_label.clone(),
        favorable_outcome: scenario.favorable_outcome_value.clone(),
        metrics: metrics.before,
        mitigation_technique: metrics.technique,
        mitigated_metrics: metrics.after,
    }
}
