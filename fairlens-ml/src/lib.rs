//! # fairlens-ml: Fairness Statistics and Bias Audits
//!
//! This crate computes group fairness metrics from labeled data and drives the
//! AI-assisted audit flow around them.
//!
//! ## Layers
//!
//! 1. **Engine** (`fairness`): contingency counts, chi-squared significance,
//!    disparate impact and parity differences, simulated mitigation, script export
//! 2. **Data model** (`scenario`): synthetic scenarios inferred from text
//! 3. **Provider contract** (`analysis`): typed, schema-constrained AI calls
//! 4. **Orchestration** (`audit`): concurrent runs, supersession, reports

// Foundation
pub mod config;
pub mod error;

// Engine and data
pub mod fairness;
pub mod scenario;

// AI boundary
pub mod analysis;
pub mod audit;

// Re-exports
pub use analysis::{AnalysisProvider, LlmAnalysisProvider};
pub use audit::{AnalysisRun, AuditOrchestrator, CreativeUpdate};
pub use config::{AuditConfig, CallTemperatures};
pub use error::MlError;
pub use fairness::{
    ChiSquaredResult, ContingencyCounts, FairnessMetrics, MetricsPair, MitigationTechnique,
    compute_chi_squared, compute_contingency, compute_fairness_metrics,
    generate_reproducible_script, simulate_mitigation,
};
pub use scenario::{LabeledRecord, ScenarioDescriptor, load_scenario, save_scenario};
