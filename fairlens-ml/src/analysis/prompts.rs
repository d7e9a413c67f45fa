//! Prompt builders for each analysis call.

use super::contracts::AuditReportRequest;

pub fn comprehensive_analysis_prompt(text: &str) -> String {
    format!(
        r#"You are a highly advanced AI Ethics auditor. Analyze the following text comprehensively from multiple perspectives.

**Text to Analyze:**
---
{text}
---

Please provide a complete analysis in the specified JSON format, covering the following five areas:

1.  **textAnalysis:** Identify any phrases that exhibit bias (e.g., stereotypes, loaded language). For each, explain the bias and suggest a neutral alternative. The "biasedPhrase" MUST be an exact substring from the original text. If no bias is found, return an empty array for "findings".

2.  **toneAnalysis:**
    - Determine the overall linguistic dimensions: sentiment, formality, objectivity, and confidence.
    - Identify 2-4 key emotional tones (e.g., Dismissive, Arrogant) and explain their potential impact in reinforcing bias.
    - Provide a one-sentence summary of how the tone could influence a reader's perception.

3.  **unspokenAssumptions:** Identify hidden beliefs or premises that must be true for the biased statements to make sense. For each, explain how it supports the bias. If none, return an empty array.

4.  **biasedInterpretations:** Identify likely biased interpretations a reader might form from the text's implications. For each, explain why the interpretation is biased or based on flawed logic. If none, return an empty array.

5.  **constructiveReframing:** Provide alternative, ethically-sound ways to frame the core message. For each reframing, explain the ethical principle it upholds. If no reframing is needed, return an empty array.
"#
    )
}

pub fn scenario_prompt(text: &str) -> String {
    format!(
        r#"You are a Data Scientist and AI Ethicist. Your task is to analyze a user-provided text for bias and then construct a synthetic dataset that mathematically represents that bias.

**Instructions:**
1.  Read the user's text and understand the core bias being expressed.
2.  Define the scenario, the protected attribute concept, the specific groups being compared (privileged vs. unprivileged), and the favorable outcome.
3.  Generate a synthetic JSON dataset of 20-30 records. The distribution of outcomes in your dataset MUST reflect the bias from the text. For example, if the text says men are better programmers, the 'Hired' outcome should be significantly more frequent for the 'Male' group in your data.
4.  For each record in the 'data' array, you MUST use the key "subject_group" for the protected attribute's value and the key "outcome" for the decision's value.
5.  Return a single JSON object matching the provided schema.

**User Text to Analyze:**
---
{text}
---

Now, generate the full JSON response based on this text.
"#
    )
}

pub fn concept_prompt(text: &str) -> String {
    format!(
        r#"Analyze the following text and identify the single central subject, role, or character concept being discussed.
The concept should be a concise noun or short noun phrase suitable for a creative bias analysis.
For example, from "We only hire programmers under 30 because they learn faster," the ideal concept is "programmer".
From "The new CEO must be a man to command respect," the concept is "CEO".
From "She was too emotional to be a good surgeon," the concept is "surgeon".

Return the concept in the specified JSON format.

**Text to Analyze:**
---
{text}
---
"#
    )
}

pub fn creative_bias_prompt(concept: &str) -> String {
    format!(
        r#"You are an expert in creative writing and AI ethics, specializing in identifying and deconstructing subtle stereotypes in media.
A user has provided a creative concept. Your task is to analyze this concept across a spectrum of potential biases and provide creative alternatives.

Analyze the concept: "{concept}"

Generate a response in the specified JSON format. For each dimension, identify a common stereotype associated with the concept and then provide a concrete, creative, and inspiring alternative that subverts that stereotype.

Dimensions to consider must include (but are not limited to):
- Gender
- Age
- Ethnicity / Race
- Socioeconomic Status
- Physical Ability / Disability
- Body Type
- Nationality / Cultural Background

Provide at least 5 distinct dimensions in your analysis.
"#
    )
}

pub fn report_prompt(request: &AuditReportRequest) -> String {
    let before = &request.metrics;
    let after = &request.mitigated_metrics;
    format!(
        r#"You are an expert AI Ethics auditor providing a formal bias audit report.
Analyze the following information and generate a comprehensive report in the specified JSON format.

**Audit Context:**
- **Dataset:** {dataset}
- **Analyzed for Bias Across:** {attribute}
- **Favorable Outcome:** "{favorable}"

**Initial Fairness Analysis (Before Mitigation):**
- **Disparate Impact:** {di:.3} (A value close to 1.0 is ideal. Lower values indicate the unprivileged group receives the favorable outcome at a lower rate than the privileged group.)
- **Statistical Parity Difference:** {spd:.3} (A value close to 0.0 is ideal. Negative values indicate the unprivileged group has a lower selection rate.)

**Statistical Validation:**
- **Chi-Squared Test Statistic:** {chi:.3}
- **P-value:** {p}
- **Interpretation:** A p-value less than 0.05 indicates the observed difference in outcomes between groups is statistically significant.

**Mitigation Strategy Applied (Simulated):**
- **Technique:** {technique}

**Post-Mitigation Fairness Analysis:**
- **Disparate Impact:** {after_di:.3}
- **Statistical Parity Difference:** {after_spd:.3}

Based on this data, please generate the report. Be clear, concise, and professional. The recommendations should be practical and relevant.
"#,
        dataset = request.dataset_name,
        attribute = request.protected_attribute,
        favorable = request.favorable_outcome,
        di = before.disparate_impact,
        spd = before.statistical_parity_difference,
        chi = before.chi_squared,
        p = before.p_value_display(),
        technique = request.mitigation_technique.display_name(),
        after_di = after.disparate_impact,
        after_spd = after.statistical_parity_difference,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fairness::{FairnessMetrics, MitigationTechnique, simulate_mitigation};

    fn request(p_value: f64) -> AuditReportRequest {
        let metrics = FairnessMetrics {
            disparate_impact: 0.333,
            statistical_parity_difference: -0.5,
            equal_opportunity_difference: -0.5,
            chi_squared: 10.0,
            p_value,
        };
        AuditReportRequest {
            dataset_name: "Synthetic Data for \"Hiring\"".into(),
            protected_attribute: "gender".into(),
            favorable_outcome: "Hired".into(),
            metrics,
            mitigation_technique: MitigationTechnique::Reweighing,
            mitigated_metrics: simulate_mitigation(&metrics, MitigationTechnique::Reweighing),
        }
    }

    #[test]
    fn test_report_prompt_numbers() {
        let prompt = report_prompt(&request(0.01));
        assert!(prompt.contains("- **Dataset:** Synthetic Data for \"Hiring\""));
        assert!(prompt.contains("- **Favorable Outcome:** \"Hired\""));
        assert!(prompt.contains("**Disparate Impact:** 0.333 (A value"));
        assert!(prompt.contains("**Statistical Parity Difference:** -0.500 (A value"));
        assert!(prompt.contains("**Chi-Squared Test Statistic:** 10.000"));
        assert!(prompt.contains("**P-value:** 0.010"));
        assert!(prompt.contains("**Technique:** Reweighing"));
        assert!(prompt.contains("- **Disparate Impact:** 0.800\n"));
        assert!(prompt.contains("- **Statistical Parity Difference:** -0.150\n"));
    }

    #[test]
    fn test_report_prompt_small_p_value() {
        let prompt = report_prompt(&request(0.0005));
        assert!(prompt.contains("**P-value:** < 0.001"));
        // The top bucket itself is not below 0.001.
        let prompt = report_prompt(&request(0.001));
        assert!(prompt.contains("**P-value:** 0.001"));
    }

    #[test]
    fn test_text_is_embedded() {
        let text = "Older applicants cannot keep up.";
        assert!(comprehensive_analysis_prompt(text).contains("---\nOlder applicants cannot keep up.\n---"));
        assert!(scenario_prompt(text).contains(text));
        assert!(concept_prompt(text).contains(text));
        assert!(creative_bias_prompt("nurse").contains("Analyze the concept: \"nurse\""));
    }
}
