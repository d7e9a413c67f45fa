//! The AI analysis provider boundary.
//!
//! [`AnalysisProvider`] is what the audit orchestrator talks to. The production
//! implementation, [`LlmAnalysisProvider`], sends schema-constrained prompts
//! through any [`LlmProvider`] and parses the replies into typed contracts.

use super::contracts::{
    AuditReport, AuditReportRequest, BiasSpectrumAnalysis, ComprehensiveTextAnalysis,
    ExtractedConcept,
};
use super::{prompts, schemas};
use crate::config::CallTemperatures;
use crate::error::MlError;
use crate::scenario::ScenarioDescriptor;
use async_trait::async_trait;
use fairlens_core::brain::LlmProvider;
use fairlens_core::types::{CompletionRequest, ResponseFormat};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The five structured operations the audit flow needs from an AI service.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Findings, tone, assumptions, interpretations and reframings for `text`.
    ///
    /// Findings whose phrase is not a substring of `text` are dropped.
    async fn analyze_text(&self, text: &str) -> Result<ComprehensiveTextAnalysis, MlError>;

    /// Infer a scenario from `text` and synthesize a dataset reflecting its bias.
    async fn generate_scenario(&self, text: &str) -> Result<ScenarioDescriptor, MlError>;

    /// The central role or character concept of `text`. Never empty.
    async fn extract_concept(&self, text: &str) -> Result<String, MlError>;

    /// Stereotypes and debiased alternatives for a creative concept.
    async fn analyze_creative_bias(&self, concept: &str) -> Result<BiasSpectrumAnalysis, MlError>;

    /// Natural-language audit report for a metrics pair.
    async fn generate_report(&self, request: &AuditReportRequest) -> Result<AuditReport, MlError>;
}

/// [`AnalysisProvider`] backed by an LLM with JSON-schema output.
pub struct LlmAnalysisProvider {
    llm: Arc<dyn LlmProvider>,
    temperatures: CallTemperatures,
}

impl LlmAnalysisProvider {
    pub fn new(llm: Arc<dyn LlmProvider>, temperatures: CallTemperatures) -> Self {
        Self { llm, temperatures }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Send one schema-constrained prompt and parse the reply as `T`.
    async fn structured_call<T: DeserializeOwned>(
        &self,
        call: &'static str,
        prompt: String,
        schema: Value,
        temperature: f32,
    ) -> Result<T, MlError> {
        let request = CompletionRequest::from_prompt(prompt, temperature)
            .with_response_format(ResponseFormat::json(schema));

        debug!(call, model = self.llm.model_name(), temperature, "Sending analysis request");
        let response = self.llm.complete(request).await?;
        debug!(
            call,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Received analysis response"
        );

        parse_json_reply(response.text())
            .map_err(|e| MlError::schema(format!("{} response: {}", call, e)))
    }
}

/// Parse a model reply, tolerating a surrounding Markdown code fence.
fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_code_fence(text))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_prefix("json").unwrap_or(rest);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[async_trait]
impl AnalysisProvider for LlmAnalysisProvider {
    async fn analyze_text(&self, text: &str) -> Result<ComprehensiveTextAnalysis, MlError> {
        let mut analysis: ComprehensiveTextAnalysis = self
            .structured_call(
                "comprehensive_analysis",
                prompts::comprehensive_analysis_prompt(text),
                schemas::comprehensive_analysis_schema(),
                self.temperatures.comprehensive,
            )
            .await?;

        let dropped = analysis.retain_anchored_findings(text);
        if dropped > 0 {
            warn!(dropped, "Dropped findings not anchored in the input text");
        }
        info!(
            findings = analysis.text_analysis.findings.len(),
            assumptions = analysis.unspoken_assumptions.assumptions.len(),
            "Text analysis complete"
        );
        Ok(analysis)
    }

    async fn generate_scenario(&self, text: &str) -> Result<ScenarioDescriptor, MlError> {
        let scenario: ScenarioDescriptor = self
            .structured_call(
                "synthetic_data",
                prompts::scenario_prompt(text),
                schemas::scenario_schema(),
                self.temperatures.scenario,
            )
            .await?;
        scenario.validate()?;
        info!(
            records = scenario.records.len(),
            protected_attribute = %scenario.protected_attribute_label,
            "Synthetic scenario generated"
        );
        Ok(scenario)
    }

    async fn extract_concept(&self, text: &str) -> Result<String, MlError> {
        let extracted: ExtractedConcept = self
            .structured_call(
                "concept_extraction",
                prompts::concept_prompt(text),
                schemas::concept_schema(),
                self.temperatures.concept,
            )
            .await?;
        let concept = extracted.concept.trim();
        if concept.is_empty() {
            return Err(MlError::schema("model returned an empty concept"));
        }
        Ok(concept.to_string())
    }

    async fn analyze_creative_bias(&self, concept: &str) -> Result<BiasSpectrumAnalysis, MlError> {
        let spectrum: BiasSpectrumAnalysis = self
            .structured_call(
                "creative_bias",
                prompts::creative_bias_prompt(concept),
                schemas::bias_spectrum_schema(),
                self.temperatures.creative,
            )
            .await?;
        info!(concept, dimensions = spectrum.dimensions.len(), "Bias spectrum analyzed");
        Ok(spectrum)
    }

    async fn generate_report(&self, request: &AuditReportRequest) -> Result<AuditReport, MlError> {
        self.structured_call(
            "audit_report",
            prompts::report_prompt(request),
            schemas::report_schema(),
            self.temperatures.report,
        )
        .await
    }
}
