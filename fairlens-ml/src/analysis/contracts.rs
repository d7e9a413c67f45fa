//! Typed contracts for every structured response the analysis provider returns.
//!
//! Field names on the wire are camelCase, matching the JSON schemas sent with
//! each request.

use crate::fairness::{FairnessMetrics, MitigationTechnique};
use serde::{Deserialize, Serialize};

/// A phrase from the input text flagged as potentially biased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasFinding {
    /// Exact substring of the analyzed text.
    pub biased_phrase: String,
    pub explanation: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnalysisResult {
    #[serde(default)]
    pub findings: Vec<BiasFinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formality {
    Formal,
    Informal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objectivity {
    Objective,
    Subjective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Confident,
    Tentative,
    Neutral,
}

macro_rules! impl_display_as_debug {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:?}", self)
            }
        })*
    };
}

impl_display_as_debug!(Sentiment, Formality, Objectivity, Confidence);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionalTone {
    pub tone: String,
    pub impact: String,
}

/// Linguistic dimensions of the text and how they may reinforce bias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageToneAnalysis {
    pub sentiment: Sentiment,
    pub formality: Formality,
    pub objectivity: Objectivity,
    pub confidence: Confidence,
    #[serde(default)]
    pub emotional_tones: Vec<EmotionalTone>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspokenAssumption {
    pub assumption: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspokenAssumptionsAnalysis {
    #[serde(default)]
    pub assumptions: Vec<UnspokenAssumption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasedInterpretation {
    pub interpretation: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasedInterpretationsAnalysis {
    #[serde(default)]
    pub interpretations: Vec<BiasedInterpretation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructiveReframing {
    pub reframing: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructiveReframingAnalysis {
    #[serde(default)]
    pub reframings: Vec<ConstructiveReframing>,
}

/// The five text analyses returned by a single consolidated call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveTextAnalysis {
    pub text_analysis: TextAnalysisResult,
    pub tone_analysis: LanguageToneAnalysis,
    pub unspoken_assumptions: UnspokenAssumptionsAnalysis,
    pub biased_interpretations: BiasedInterpretationsAnalysis,
    pub constructive_reframing: ConstructiveReframingAnalysis,
}

impl ComprehensiveTextAnalysis {
    /// Drop findings whose phrase does not occur verbatim in `text`.
    ///
    /// Returns the number of findings removed.
    pub fn retain_anchored_findings(&mut self, text: &str) -> usize {
        let before = self.text_analysis.findings.len();
        self.text_analysis
            .findings
            .retain(|finding| text.contains(&finding.biased_phrase));
        before - self.text_analysis.findings.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasDimension {
    pub dimension: String,
    pub stereotype: String,
    pub debiased_alternative: String,
}

/// Stereotypes associated with a creative concept, with subverting alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasSpectrumAnalysis {
    pub concept: String,
    pub summary: String,
    #[serde(rename = "spectrum", default)]
    pub dimensions: Vec<BiasDimension>,
}

/// The central role or character concept of a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedConcept {
    pub concept: String,
}

/// Natural-language audit report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub summary: String,
    pub ethical_implications: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub ethics_statement: String,
}

/// Everything the report prompt needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReportRequest {
    pub dataset_name: String,
    pub protected_attribute: String,
    pub favorable_outcome: String,
    pub metrics: FairnessMetrics,
    pub mitigation_technique: MitigationTechnique,
    pub mitigated_metrics: FairnessMetrics,
}
