//! Synthetic scenario data model.
//!
//! A `ScenarioDescriptor` is what the AI provider infers from the user's text:
//! the protected attribute, the two groups, the favorable outcome, and a small
//! labeled dataset whose outcome distribution mirrors the bias in the text.
//! The wire and file form uses the provider's camelCase field names.

use crate::error::MlError;
use crate::fairness::{FairnessMetrics, compute_fairness_metrics};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Attribute key holding a record's protected-attribute value.
pub const SUBJECT_GROUP_KEY: &str = "subject_group";
/// Attribute key holding a record's outcome value.
pub const OUTCOME_KEY: &str = "outcome";

/// One synthetic observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRecord {
    #[serde(rename = "subject_group")]
    subject_group_value: String,
    #[serde(rename = "outcome")]
    outcome_value: String,
}

impl LabeledRecord {
    pub fn new(subject_group: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self {
            subject_group_value: subject_group.into(),
            outcome_value: outcome.into(),
        }
    }

    pub fn subject_group(&self) -> &str {
        &self.subject_group_value
    }

    pub fn outcome(&self) -> &str {
        &self.outcome_value
    }

    /// Look up an attribute by key. Unknown keys yield `None`.
    pub fn value(&self, key: &str) -> Option<&str> {
        match key {
            SUBJECT_GROUP_KEY => Some(&self.subject_group_value),
            OUTCOME_KEY => Some(&self.outcome_value),
            _ => None,
        }
    }
}

/// A scenario inferred from text, with its synthetic dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDescriptor {
    #[serde(rename = "scenario")]
    pub scenario_text: String,
    #[serde(rename = "protectedAttribute")]
    pub protected_attribute_label: String,
    pub privileged_value: String,
    pub unprivileged_value: String,
    #[serde(rename = "outcomeAttribute")]
    pub outcome_attribute_label: String,
    #[serde(rename = "favorableOutcome")]
    pub favorable_outcome_value: String,
    #[serde(rename = "data")]
    pub records: Vec<LabeledRecord>,
}

impl ScenarioDescriptor {
    /// Check the boundary contract: at least one record, and no empty
    /// group or outcome strings.
    pub fn validate(&self) -> Result<(), MlError> {
        if self.records.is_empty() {
            return Err(MlError::schema(
                "synthetic dataset contains no records",
            ));
        }
        if self.privileged_value.trim().is_empty() {
            return Err(MlError::schema("privilegedValue is empty"));
        }
        if self.favorable_outcome_value.trim().is_empty() {
            return Err(MlError::schema("favorableOutcome is empty"));
        }
        if let Some(idx) = self
            .records
            .iter()
            .position(|r| r.subject_group_value.is_empty() || r.outcome_value.is_empty())
        {
            return Err(MlError::schema(format!(
                "record {} has an empty '{}' or '{}' value",
                idx, SUBJECT_GROUP_KEY, OUTCOME_KEY
            )));
        }
        Ok(())
    }

    /// Fairness metrics for this scenario's records, partitioned on the
    /// privileged value and counted against the favorable outcome.
    pub fn compute_metrics(&self) -> FairnessMetrics {
        compute_fairness_metrics(
            &self.records,
            SUBJECT_GROUP_KEY,
            &self.favorable_outcome_value,
            OUTCOME_KEY,
            &self.privileged_value,
        )
    }

    /// Human-readable dataset name used in audit reports.
    pub fn dataset_name(&self) -> String {
        format!("Synthetic Data for \"{}\"", self.scenario_text)
    }
}

/// Read a scenario file in the provider's JSON form.
pub fn load_scenario(path: &Path) -> Result<ScenarioDescriptor, MlError> {
    let content = std::fs::read_to_string(path)?;
    let scenario: ScenarioDescriptor = serde_json::from_str(&content).map_err(|e| {
        MlError::dataset(format!("{} is not a valid scenario file: {}", path.display(), e))
    })?;
    scenario
        .validate()
        .map_err(|e| MlError::dataset(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(
        path = %path.display(),
        records = scenario.records.len(),
        "Loaded scenario"
    );
    Ok(scenario)
}

/// Write a scenario to disk in the provider's JSON form.
pub fn save_scenario(scenario: &ScenarioDescriptor, path: &Path) -> Result<(), MlError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a scenario with the given counts per cell.
    pub(crate) fn scenario_with_counts(a: usize, b: usize, c: usize, d: usize) -> ScenarioDescriptor {
        let mut records = Vec::new();
        records.extend((0..a).map(|_| LabeledRecord::new("Male", "Hired")));
        records.extend((0..b).map(|_| LabeledRecord::new("Male", "Rejected")));
        records.extend((0..c).map(|_| LabeledRecord::new("Female", "Hired")));
        records.extend((0..d).map(|_| LabeledRecord::new("Female", "Rejected")));
        ScenarioDescriptor {
            scenario_text: "Evaluating candidates for a technical role".into(),
            protected_attribute_label: "gender".into(),
            privileged_value: "Male".into(),
            unprivileged_value: "Female".into(),
            outcome_attribute_label: "hiring_decision".into(),
            favorable_outcome_value: "Hired".into(),
            records,
        }
    }

    #[test]
    fn test_record_value_lookup() {
        let record = LabeledRecord::new("Older", "Approved");
        assert_eq!(record.value(SUBJECT_GROUP_KEY), Some("Older"));
        assert_eq!(record.value(OUTCOME_KEY), Some("Approved"));
        assert_eq!(record.value("age"), None);
    }

    #[test]
    fn test_wire_format_deserialization() {
        let json = r#"{
            "scenario": "Loan approvals",
            "protectedAttribute": "nationality",
            "privilegedValue": "Local",
            "unprivilegedValue": "Foreigner",
            "outcomeAttribute": "loan_status",
            "favorableOutcome": "Approved",
            "data": [
                {"subject_group": "Local", "outcome": "Approved"},
                {"subject_group": "Foreigner", "outcome": "Denied"}
            ]
        }"#;
        let scenario: ScenarioDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.protected_attribute_label, "nationality");
        assert_eq!(scenario.records.len(), 2);
        assert_eq!(scenario.records[1].subject_group(), "Foreigner");
        assert!(scenario.validate().is_ok());

        let back = serde_json::to_value(&scenario).unwrap();
        assert_eq!(back["favorableOutcome"], "Approved");
        assert_eq!(back["data"][0]["subject_group"], "Local");
    }

    #[test]
    fn test_missing_outcome_key_rejected() {
        let json = r#"{
            "scenario": "s", "protectedAttribute": "p", "privilegedValue": "A",
            "unprivilegedValue": "B", "outcomeAttribute": "o", "favorableOutcome": "Yes",
            "data": [{"subject_group": "A"}]
        }"#;
        assert!(serde_json::from_str::<ScenarioDescriptor>(json).is_err());
    }

    #[test]
    fn test_validate_empty_records() {
        let scenario = scenario_with_counts(0, 0, 0, 0);
        assert!(matches!(scenario.validate(), Err(MlError::Schema(_))));
    }

    #[test]
    fn test_validate_empty_strings() {
        let mut scenario = scenario_with_counts(1, 1, 1, 1);
        scenario.records.push(LabeledRecord::new("", "Hired"));
        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("record 4"));
    }

    #[test]
    fn test_dataset_name() {
        let scenario = scenario_with_counts(1, 0, 0, 1);
        assert_eq!(
            scenario.dataset_name(),
            "Synthetic Data for \"Evaluating candidates for a technical role\""
        );
    }

    #[test]
    fn test_save_and_load_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scenario.json");
        let scenario = scenario_with_counts(3, 1, 1, 3);
        save_scenario(&scenario, &path).unwrap();
        let loaded = load_scenario(&path).unwrap();
        assert_eq!(loaded, scenario);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"scenario\": 1}").unwrap();
        assert!(matches!(load_scenario(&path), Err(MlError::Dataset(_))));
    }
}
