//! AI analysis provider: typed contracts, response schemas, prompts, and the
//! LLM-backed implementation.

pub mod contracts;
pub mod prompts;
pub mod provider;
pub mod schemas;

pub use contracts::{
    AuditReport, AuditReportRequest, BiasDimension, BiasFinding, BiasSpectrumAnalysis,
    BiasedInterpretation, BiasedInterpretationsAnalysis, ComprehensiveTextAnalysis, Confidence,
    ConstructiveReframing, ConstructiveReframingAnalysis, EmotionalTone, ExtractedConcept,
    Formality, LanguageToneAnalysis, Objectivity, Sentiment, TextAnalysisResult,
    UnspokenAssumption, UnspokenAssumptionsAnalysis,
};
pub use provider::{AnalysisProvider, LlmAnalysisProvider};
