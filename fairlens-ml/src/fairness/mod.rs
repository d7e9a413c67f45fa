//! Fairness statistics engine.
//!
//! Computes group-level fairness metrics and a chi-squared significance test
//! from a labeled dataset, derives simulated post-mitigation metrics, and
//! exports a standalone script that reproduces the numbers.
//!
//! Everything here is synchronous, pure, and stateless. Degenerate inputs
//! (empty groups, zero marginals, zero privileged rate) produce fixed
//! fallback values rather than errors or NaN.

pub mod contingency;
pub mod metrics;
pub mod mitigation;
pub mod script;
pub mod significance;

pub use contingency::{ContingencyCounts, compute_contingency};
pub use metrics::{FairnessMetrics, compute_fairness_metrics};
pub use mitigation::{MetricsPair, MitigationTechnique, simulate_mitigation};
pub use script::generate_reproducible_script;
pub use significance::{ChiSquaredResult, P_VALUE_THRESHOLDS, compute_chi_squared};

/// Round to 3 decimal places. Negative zero becomes zero.
///
/// Rounding works on the exact binary value of `value`, not on `value * 1000`,
/// so `0.8874999999999999` rounds down to `0.887`. Exact halfway values (odd
/// multiples of 1/16, such as `0.0625`) round away from zero.
pub fn round3(value: f64) -> f64 {
    let magnitude = value.abs();
    let sixteenths = magnitude * 16.0;
    let rounded = if sixteenths.fract() == 0.0 && sixteenths % 2.0 == 1.0 {
        // Exact tie; magnitude * 1000 is exact here.
        (magnitude * 1000.0).round() / 1000.0
    } else {
        // Float formatting rounds the exact value correctly.
        format!("{:.3}", magnitude).parse().unwrap_or(magnitude)
    };
    let signed = rounded.copysign(value);
    if signed == 0.0 { 0.0 } else { signed }
}
