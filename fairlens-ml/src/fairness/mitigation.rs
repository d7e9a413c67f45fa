//! Simulated bias mitigation.
//!
//! No data is transformed. Each technique carries a fixed "fraction of bias
//! removed" that scales the before-metrics toward parity. Significance is not
//! re-tested after mitigation: `chi_squared` and `p_value` carry over as-is.

use super::metrics::FairnessMetrics;
use super::round3;
use crate::error::MlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named, fixed-factor mitigation simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationTechnique {
    #[default]
    Reweighing,
    DisparateImpactRemover,
}

impl MitigationTechnique {
    pub const ALL: [MitigationTechnique; 2] = [
        MitigationTechnique::Reweighing,
        MitigationTechnique::DisparateImpactRemover,
    ];

    /// Fraction of the measured bias the technique is assumed to remove.
    pub fn adjustment_factor(self) -> f64 {
        match self {
            MitigationTechnique::Reweighing => 0.7,
            MitigationTechnique::DisparateImpactRemover => 0.85,
        }
    }

    /// Display name used in reports.
    pub fn display_name(self) -> &'static str {
        match self {
            MitigationTechnique::Reweighing => "Reweighing",
            MitigationTechnique::DisparateImpactRemover => "Disparate Impact Remover",
        }
    }

    /// Stable identifier, matching the serde form.
    pub fn as_str(self) -> &'static str {
        match self {
            MitigationTechnique::Reweighing => "reweighing",
            MitigationTechnique::DisparateImpactRemover => "disparate_impact_remover",
        }
    }
}

impl fmt::Display for MitigationTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for MitigationTechnique {
    type Err = MlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "reweighing" => Ok(MitigationTechnique::Reweighing),
            "disparate_impact_remover" | "dir" => Ok(MitigationTechnique::DisparateImpactRemover),
            other => Err(MlError::invalid_input(format!(
                "unknown mitigation technique '{}' (expected 'reweighing' or 'disparate-impact-remover')",
                other
            ))),
        }
    }
}

/// Derive post-mitigation metrics from `before`.
///
/// - `disparate_impact` moves toward 1: `1 - (1 - di) * (1 - f)`
/// - both differences shrink toward 0: `x * (1 - f)`
/// - `chi_squared` and `p_value` are copied unchanged
pub fn simulate_mitigation(
    before: &FairnessMetrics,
    technique: MitigationTechnique,
) -> FairnessMetrics {
    let remaining = 1.0 - technique.adjustment_factor();
    FairnessMetrics {
        disparate_impact: round3(1.0 - (1.0 - before.disparate_impact) * remaining),
        statistical_parity_difference: round3(before.statistical_parity_difference * remaining),
        equal_opportunity_difference: round3(before.equal_opportunity_difference * remaining),
        chi_squared: round3(before.chi_squared),
        p_value: before.p_value,
    }
}

/// Before/after metrics for one run under one technique.
///
/// `before` is fixed at construction. Switching technique always re-derives
/// `after` from `before`, so repeated switches never compound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsPair {
    pub technique: MitigationTechnique,
    pub before: FairnessMetrics,
    pub after: FairnessMetrics,
}

impl MetricsPair {
    pub fn new(before: FairnessMetrics, technique: MitigationTechnique) -> Self {
        Self {
            technique,
            before,
            after: simulate_mitigation(&before, technique),
        }
    }

    /// The same `before` under a different technique.
    pub fn with_technique(&self, technique: MitigationTechnique) -> Self {
        Self::new(self.before, technique)
    }
}
