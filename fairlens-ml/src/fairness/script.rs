//! Reproducible Python script export.
//!
//! The script embeds the synthetic dataset and the inferred parameters, then
//! recomputes the contingency table, the chi-squared statistic and DI/SPD with
//! pandas and scipy. The statistic is Pearson's without continuity correction
//! and falls back to `chi2 = 0, p = 1.0` on a zero marginal, matching the
//! engine. Only the p-value differs: scipy reports a continuous one.

use crate::error::MlError;
use crate::scenario::{OUTCOME_KEY, SUBJECT_GROUP_KEY, ScenarioDescriptor};
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

const SCRIPT_TEMPLATE_NAME: &str = "reproducible_script";
const SCRIPT_TEMPLATE: &str = include_str!("templates/reproducible_script.py.hbs");

/// Render the reproducible analysis script for `scenario`.
pub fn generate_reproducible_script(scenario: &ScenarioDescriptor) -> Result<String, MlError> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);
    handlebars
        .register_template_string(SCRIPT_TEMPLATE_NAME, SCRIPT_TEMPLATE)
        .map_err(|e| MlError::template(format!("invalid script template: {}", e)))?;

    let variables = json!({
        "scenario_comment": comment_text(&scenario.scenario_text),
        "scenario_fstring": f_string_text(&scenario.scenario_text),
        "data_json": dataset_json(scenario)?,
        "protected_attribute": single_quoted(&scenario.protected_attribute_label),
        "favorable_outcome": single_quoted(&scenario.favorable_outcome_value),
        "outcome_attribute": single_quoted(&scenario.outcome_attribute_label),
        "privileged_value": single_quoted(&scenario.privileged_value),
        "group_key": SUBJECT_GROUP_KEY,
        "outcome_key": OUTCOME_KEY,
    });

    let script = handlebars
        .render(SCRIPT_TEMPLATE_NAME, &variables)
        .map_err(|e| MlError::template(format!("script render failed: {}", e)))?;

    tracing::debug!(
        records = scenario.records.len(),
        bytes = script.len(),
        "Rendered reproducible script"
    );
    Ok(format!("\n{}", script))
}

/// The records as 4-space-indented JSON, safe inside a raw triple-quoted literal.
fn dataset_json(scenario: &ScenarioDescriptor) -> Result<String, MlError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    scenario.records.serialize(&mut serializer)?;
    let text = String::from_utf8(buf)
        .map_err(|e| MlError::template(format!("dataset is not valid UTF-8: {}", e)))?;
    Ok(text.replace("\"\"\"", "\\u0022\\u0022\\u0022"))
}

/// Escape for a Python single-quoted string literal.
fn single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Escape for the body of a double-quoted f-string.
fn f_string_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// Collapse line breaks so the text stays on its comment line.
fn comment_text(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::LabeledRecord;
    use crate::scenario::tests::scenario_with_counts;

    #[test]
    fn test_script_embeds_parameters() {
        let scenario = scenario_with_counts(2, 1, 1, 2);
        let script = generate_reproducible_script(&scenario).unwrap();

        assert!(script.starts_with("\n#\n# Reproducible Bias Analysis Script"));
        assert!(script.contains("protected_attribute = 'gender'"));
        assert!(script.contains("favorable_outcome = 'Hired'"));
        assert!(script.contains("outcome_attribute = 'hiring_decision'"));
        assert!(script.contains("privileged_value = 'Male'"));
        assert!(script.contains(
            "# 1. Synthetic Dataset for Scenario: \"Evaluating candidates for a technical role\""
        ));
        assert!(script.contains("df[df['subject_group'] == privileged_value]"));
        assert!(script.contains("from scipy.stats import chi2_contingency"));
        assert!(script.contains("print(f\"Privileged      | {a:<9} | {b:<9}\")"));
    }

    #[test]
    fn test_chi_squared_matches_engine_statistic() {
        let script = generate_reproducible_script(&scenario_with_counts(15, 5, 5, 15)).unwrap();
        assert!(script.contains("chi2_contingency(contingency_table, correction=False)"));
        assert!(!script.contains("chi2_contingency(contingency_table)"));
    }

    #[test]
    fn test_zero_marginal_falls_back_like_engine() {
        // Nobody received the favorable outcome.
        let scenario = scenario_with_counts(0, 7, 0, 3);
        let engine = scenario.compute_metrics();
        assert_eq!((engine.chi_squared, engine.p_value), (0.0, 1.0));

        let script = generate_reproducible_script(&scenario).unwrap();
        assert!(script.contains("if a + b > 0 and c + d > 0 and a + c > 0 and b + d > 0:"));
        assert!(script.contains("    chi2, p = 0.0, 1.0"));
        assert!(!script.contains("if a + b + c + d > 0:"));
    }

    #[test]
    fn test_dataset_uses_four_space_indent() {
        let mut scenario = scenario_with_counts(0, 0, 0, 0);
        scenario.records = vec![LabeledRecord::new("Male", "Hired")];
        let script = generate_reproducible_script(&scenario).unwrap();
        let expected = "data_json = r\"\"\"[\n    {\n        \"subject_group\": \"Male\",\n        \"outcome\": \"Hired\"\n    }\n]\"\"\"";
        assert!(script.contains(expected), "script was:\n{}", script);
    }

    #[test]
    fn test_dataset_json_parses_back() {
        let scenario = scenario_with_counts(3, 2, 1, 4);
        let json = dataset_json(&scenario).unwrap();
        let records: Vec<LabeledRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(records, scenario.records);
    }

    #[test]
    fn test_quotes_are_escaped() {
        let mut scenario = scenario_with_counts(1, 1, 1, 1);
        scenario.privileged_value = "O'Brien".into();
        scenario.protected_attribute_label = "back\\slash".into();
        let script = generate_reproducible_script(&scenario).unwrap();
        assert!(script.contains("privileged_value = 'O\\'Brien'"));
        assert!(script.contains("protected_attribute = 'back\\\\slash'"));
    }

    #[test]
    fn test_scenario_text_is_safe_in_fstring_and_comment() {
        let mut scenario = scenario_with_counts(1, 1, 1, 1);
        scenario.scenario_text = "Say \"{hi}\"\nnow".into();
        let script = generate_reproducible_script(&scenario).unwrap();
        assert!(script.contains("# 1. Synthetic Dataset for Scenario: \"Say \"{hi}\" now\""));
        assert!(script.contains("Scenario: Say \\\"{{hi}}\\\"\\nnow ---"));
    }

    #[test]
    fn test_triple_quotes_in_values_cannot_close_literal() {
        let mut scenario = scenario_with_counts(0, 0, 0, 0);
        scenario.records = vec![LabeledRecord::new("a\"\"\"b", "Hired")];
        let json = dataset_json(&scenario).unwrap();
        assert!(!json.contains("\"\"\""));
        let records: Vec<LabeledRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(records[0].subject_group(), "a\"\"\"b");
    }
}
