//! Chi-squared test of independence for a 2x2 table.
//!
//! The p-value is a stepped approximation from a table of 1-degree-of-freedom
//! critical values, not a continuous CDF. Reports and display thresholds are
//! written against these exact bucket values.

use super::round3;
use serde::{Deserialize, Serialize};

/// Critical values for 1 degree of freedom, highest first, with the p-value
/// assigned when the statistic meets or exceeds each one.
pub const P_VALUE_THRESHOLDS: [(f64, f64); 4] =
    [(10.83, 0.001), (6.63, 0.01), (3.84, 0.05), (2.71, 0.10)];

/// p-value when the statistic meets no threshold, or the table is degenerate.
pub const P_VALUE_NOT_SIGNIFICANT: f64 = 1.0;

/// Chi-squared statistic (rounded to 3 decimals) and its bucketed p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquaredResult {
    pub chi_squared: f64,
    pub p_value: f64,
}

impl ChiSquaredResult {
    /// Result for a table with no evidence of association.
    pub const NONE: Self = Self {
        chi_squared: 0.0,
        p_value: P_VALUE_NOT_SIGNIFICANT,
    };
}

/// Compute Pearson's chi-squared statistic for the table `[[a, b], [c, d]]`
/// without continuity correction.
///
/// If N is zero or any row/column marginal is zero the association is
/// undefined and the result is `{0, 1.0}`.
pub fn compute_chi_squared(a: u64, b: u64, c: u64, d: u64) -> ChiSquaredResult {
    // Four u64 counts always fit in u128, so the sums cannot overflow.
    let (a, b, c, d) = (a as u128, b as u128, c as u128, d as u128);
    let n = a + b + c + d;
    let marginals = [a + b, c + d, a + c, b + d];
    if n == 0 || marginals.contains(&0) {
        return ChiSquaredResult::NONE;
    }

    let (af, bf, cf, df) = (a as f64, b as f64, c as f64, d as f64);
    let numerator = n as f64 * (af * df - bf * cf).powi(2);
    let denominator: f64 = marginals.iter().map(|&m| m as f64).product();
    let chi_squared = numerator / denominator;

    ChiSquaredResult {
        chi_squared: round3(chi_squared),
        p_value: p_value_for(chi_squared),
    }
}

/// Map a statistic to its p-value bucket. The first (highest) threshold met wins.
pub fn p_value_for(chi_squared: f64) -> f64 {
    P_VALUE_THRESHOLDS
        .iter()
        .find(|(threshold, _)| chi_squared >= *threshold)
        .map(|(_, p)| *p)
        .unwrap_or(P_VALUE_NOT_SIGNIFICANT)
}
