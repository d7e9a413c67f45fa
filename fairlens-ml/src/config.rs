//! Audit configuration.
//!
//! Lives under the `[audit]` table of the same layered config that
//! `fairlens_core::config` builds for the `[llm]` section.

use crate::fairness::MitigationTechnique;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Behaviour of a full analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Technique used for the initial after-metrics.
    #[serde(default)]
    pub default_technique: MitigationTechnique,
    /// Spawn the creative bias-spectrum analysis after each run.
    #[serde(default = "default_true")]
    pub creative_analysis: bool,
    /// Request the natural-language audit report after each run.
    #[serde(default = "default_true")]
    pub generate_report: bool,
    /// Sampling temperature per provider call.
    #[serde(default)]
    pub temperatures: CallTemperatures,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_technique: MitigationTechnique::default(),
            creative_analysis: true,
            generate_report: true,
            temperatures: CallTemperatures::default(),
        }
    }
}

impl AuditConfig {
    /// Extract the `[audit]` section from the layered configuration.
    ///
    /// A missing section yields the defaults. A malformed one is an error.
    pub fn load(workspace: Option<&Path>) -> Result<Self, Box<figment::Error>> {
        let figment = fairlens_core::config::figment(workspace);
        if !figment.contains("audit") {
            return Ok(Self::default());
        }
        figment.extract_inner("audit").map_err(Box::new)
    }
}

/// Per-call sampling temperatures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallTemperatures {
    #[serde(default = "default_report_temperature")]
    pub report: f32,
    #[serde(default = "default_scenario_temperature")]
    pub scenario: f32,
    #[serde(default = "default_comprehensive_temperature")]
    pub comprehensive: f32,
    #[serde(default = "default_creative_temperature")]
    pub creative: f32,
    #[serde(default = "default_concept_temperature")]
    pub concept: f32,
}

impl Default for CallTemperatures {
    fn default() -> Self {
        Self {
            report: default_report_temperature(),
            scenario: default_scenario_temperature(),
            comprehensive: default_comprehensive_temperature(),
            creative: default_creative_temperature(),
            concept: default_concept_temperature(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_report_temperature() -> f32 {
    0.5
}

fn default_scenario_temperature() -> f32 {
    0.4
}

fn default_comprehensive_temperature() -> f32 {
    0.4
}

fn default_creative_temperature() -> f32 {
    0.6
}

fn default_concept_temperature() -> f32 {
    0.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert_eq!(config.default_technique, MitigationTechnique::Reweighing);
        assert!(config.creative_analysis);
        assert!(config.generate_report);
        assert_eq!(config.temperatures.report, 0.5);
        assert_eq!(config.temperatures.scenario, 0.4);
        assert_eq!(config.temperatures.comprehensive, 0.4);
        assert_eq!(config.temperatures.creative, 0.6);
        assert_eq!(config.temperatures.concept, 0.1);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: AuditConfig = toml::from_str(
            r#"
            default_technique = "disparate_impact_remover"
            [temperatures]
            creative = 0.9
            "#,
        )
        .unwrap();
        assert_eq!(
            config.default_technique,
            MitigationTechnique::DisparateImpactRemover
        );
        assert!(config.creative_analysis);
        assert_eq!(config.temperatures.creative, 0.9);
        assert_eq!(config.temperatures.concept, 0.1);
    }

    #[test]
    fn test_load_from_workspace_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(fairlens_core::config::WORKSPACE_CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join("config.toml"),
            "[audit]\ngenerate_report = false\n",
        )
        .unwrap();

        let config = AuditConfig::load(Some(dir.path())).unwrap();
        assert!(!config.generate_report);
        assert!(config.creative_analysis);
        assert_eq!(config.default_technique, MitigationTechnique::Reweighing);
    }

    #[test]
    fn test_load_without_section() {
        let dir = tempfile::tempdir().unwrap();
        let config = AuditConfig::load(Some(dir.path())).unwrap();
        assert_eq!(config, AuditConfig::default());
    }
}
