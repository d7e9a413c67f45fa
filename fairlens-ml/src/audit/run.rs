//! Analysis runs and their orchestration.
//!
//! A run issues the three independent provider calls concurrently, computes
//! before/after metrics and the reproducible script from the synthetic
//! scenario, and returns an immutable [`AnalysisRun`]. The creative bias
//! analysis depends on the extracted concept and is delivered later, on a
//! separate channel, as a [`CreativeUpdate`].
//!
//! Starting a run supersedes the previous one. The previous run's
//! cancellation token is cancelled: an in-flight run returns
//! [`MlError::Superseded`] and its creative task exits without sending.

use super::report::build_report_request;
use crate::analysis::{
    AnalysisProvider, AuditReport, AuditReportRequest, BiasSpectrumAnalysis,
    ComprehensiveTextAnalysis,
};
use crate::config::AuditConfig;
use crate::error::MlError;
use crate::fairness::{MetricsPair, MitigationTechnique, generate_reproducible_script};
use crate::scenario::ScenarioDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Buffered creative updates before the background task waits on the consumer.
const CREATIVE_CHANNEL_CAPACITY: usize = 16;

/// Everything one analysis of one input text produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub input_text: String,
    pub text_analysis: ComprehensiveTextAnalysis,
    pub scenario: ScenarioDescriptor,
    pub concept: String,
    pub metrics: MetricsPair,
    pub script: String,
}

impl AnalysisRun {
    /// This run with after-metrics re-derived for `technique`.
    ///
    /// The run id is kept: it is the same analysis viewed under another
    /// mitigation.
    pub fn with_technique(&self, technique: MitigationTechnique) -> Self {
        Self {
            metrics: self.metrics.with_technique(technique),
            ..self.clone()
        }
    }

    pub fn report_request(&self) -> AuditReportRequest {
        build_report_request(&self.scenario, &self.metrics)
    }
}

/// The creative bias-spectrum result for a run, delivered after the run returned.
#[derive(Debug, Clone, PartialEq)]
pub struct CreativeUpdate {
    pub run_id: Uuid,
    pub result: BiasSpectrumAnalysis,
}

struct ActiveRun {
    id: Uuid,
    token: CancellationToken,
}

/// Drives analysis runs against an [`AnalysisProvider`].
pub struct AuditOrchestrator {
    provider: Arc<dyn AnalysisProvider>,
    config: AuditConfig,
    active: Mutex<Option<ActiveRun>>,
    creative_tx: mpsc::Sender<CreativeUpdate>,
}

impl AuditOrchestrator {
    /// Create an orchestrator and the receiver for its creative updates.
    pub fn new(
        provider: Arc<dyn AnalysisProvider>,
        config: AuditConfig,
    ) -> (Self, mpsc::Receiver<CreativeUpdate>) {
        let (creative_tx, creative_rx) = mpsc::channel(CREATIVE_CHANNEL_CAPACITY);
        let orchestrator = Self {
            provider,
            config,
            active: Mutex::new(None),
            creative_tx,
        };
        (orchestrator, creative_rx)
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run the full analysis of `text`.
    ///
    /// `technique` defaults to the configured one. Fails if any of the three
    /// concurrent provider calls fails, or if a newer run starts first.
    pub async fn run(
        &self,
        text: &str,
        technique: Option<MitigationTechnique>,
    ) -> Result<Arc<AnalysisRun>, MlError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MlError::EmptyInput);
        }
        let technique = technique.unwrap_or(self.config.default_technique);
        let (run_id, token) = self.begin_run();
        info!(%run_id, chars = text.len(), %technique, "Starting analysis run");

        let provider = &self.provider;
        let calls = async {
            tokio::try_join!(
                provider.analyze_text(text),
                provider.generate_scenario(text),
                provider.extract_concept(text),
            )
        };
        let (text_analysis, scenario, concept) = tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!(%run_id, "Analysis run superseded");
                return Err(MlError::Superseded);
            }
            result = calls => result.inspect_err(|e| {
                warn!(%run_id, error = %e, "Analysis run failed");
            })?,
        };

        let metrics = MetricsPair::new(scenario.compute_metrics(), technique);
        let script = generate_reproducible_script(&scenario)?;
        let run = Arc::new(AnalysisRun {
            id: run_id,
            created_at: Utc::now(),
            input_text: text.to_string(),
            text_analysis,
            scenario,
            concept,
            metrics,
            script,
        });

        info!(
            %run_id,
            records = run.scenario.records.len(),
            disparate_impact = run.metrics.before.disparate_impact,
            p_value = run.metrics.before.p_value,
            "Analysis run complete"
        );

        if self.config.creative_analysis && !run.concept.trim().is_empty() {
            self.spawn_creative_analysis(run_id, run.concept.clone(), token);
        } else {
            debug!(%run_id, "Skipping creative analysis");
        }

        Ok(run)
    }

    /// Whether `run_id` is the most recently started run.
    pub fn is_current(&self, run_id: Uuid) -> bool {
        self.lock_active()
            .as_ref()
            .is_some_and(|active| active.id == run_id)
    }

    /// Cancel the current run and its creative task, if any.
    pub fn cancel(&self) {
        if let Some(active) = self.lock_active().as_ref() {
            active.token.cancel();
        }
    }

    /// Request the audit report for `run` under its current technique.
    pub async fn report(&self, run: &AnalysisRun) -> Result<AuditReport, MlError> {
        let report = self.provider.generate_report(&run.report_request()).await?;
        info!(
            run_id = %run.id,
            technique = %run.metrics.technique,
            recommendations = report.recommendations.len(),
            "Audit report generated"
        );
        Ok(report)
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new run, cancelling the one it replaces.
    fn begin_run(&self) -> (Uuid, CancellationToken) {
        let id = Uuid::new_v4();
        let token = CancellationToken::new();
        let previous = self.lock_active().replace(ActiveRun {
            id,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            previous.token.cancel();
            debug!(superseded = %previous.id, by = %id, "Cancelled previous run");
        }
        (id, token)
    }

    fn spawn_creative_analysis(&self, run_id: Uuid, concept: String, token: CancellationToken) {
        let provider = Arc::clone(&self.provider);
        let tx = self.creative_tx.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(%run_id, "Creative analysis cancelled");
                    return;
                }
                result = provider.analyze_creative_bias(&concept) => result,
            };

            match result {
                Ok(result) if !token.is_cancelled() => {
                    if tx.send(CreativeUpdate { run_id, result }).await.is_err() {
                        debug!(%run_id, "Creative update receiver dropped");
                    }
                }
                Ok(_) => debug!(%run_id, "Discarding creative result of superseded run"),
                Err(e) => warn!(%run_id, concept = %concept, error = %e, "Creative analysis failed"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        Confidence, Formality, LanguageToneAnalysis, Objectivity, Sentiment, TextAnalysisResult,
    };
    use crate::scenario::tests::scenario_with_counts;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    /// Provider with scripted behavior keyed on the input text.
    ///
    /// - text containing "fail-scenario" fails scenario generation
    /// - text containing "hang" blocks analysis until cancelled
    /// - concept "broken" fails the creative analysis
    /// - concept "slow" blocks the creative analysis
    #[derive(Default)]
    struct StubProvider {
        started: Notify,
        creative_started: Notify,
    }

    fn empty_analysis() -> ComprehensiveTextAnalysis {
        ComprehensiveTextAnalysis {
            text_analysis: TextAnalysisResult::default(),
            tone_analysis: LanguageToneAnalysis {
                sentiment: Sentiment::Neutral,
                formality: Formality::Formal,
                objectivity: Objectivity::Objective,
                confidence: Confidence::Neutral,
                emotional_tones: vec![],
                summary: "neutral".into(),
            },
            unspoken_assumptions: Default::default(),
            biased_interpretations: Default::default(),
            constructive_reframing: Default::default(),
        }
    }

    #[async_trait]
    impl AnalysisProvider for StubProvider {
        async fn analyze_text(&self, text: &str) -> Result<ComprehensiveTextAnalysis, MlError> {
            self.started.notify_one();
            if text.contains("hang") {
                std::future::pending::<()>().await;
            }
            Ok(empty_analysis())
        }

        async fn generate_scenario(&self, text: &str) -> Result<ScenarioDescriptor, MlError> {
            if text.contains("fail-scenario") {
                return Err(MlError::schema("synthetic dataset contains no records"));
            }
            Ok(scenario_with_counts(15, 5, 5, 15))
        }

        async fn extract_concept(&self, text: &str) -> Result<String, MlError> {
            Ok(text.split_whitespace().last().unwrap_or("person").to_string())
        }

        async fn analyze_creative_bias(
            &self,
            concept: &str,
        ) -> Result<BiasSpectrumAnalysis, MlError> {
            self.creative_started.notify_one();
            match concept {
                "broken" => Err(MlError::schema("bad spectrum")),
                "slow" => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
                _ => Ok(BiasSpectrumAnalysis {
                    concept: concept.to_string(),
                    summary: "summary".into(),
                    dimensions: vec![],
                }),
            }
        }

        async fn generate_report(
            &self,
            request: &AuditReportRequest,
        ) -> Result<AuditReport, MlError> {
            Ok(AuditReport {
                summary: format!("{} via {}", request.dataset_name, request.mitigation_technique),
                ethical_implications: String::new(),
                recommendations: vec!["collect more data".into()],
                ethics_statement: String::new(),
            })
        }
    }

    fn orchestrator() -> (
        Arc<AuditOrchestrator>,
        Arc<StubProvider>,
        mpsc::Receiver<CreativeUpdate>,
    ) {
        let stub = Arc::new(StubProvider::default());
        let (orchestrator, rx) = AuditOrchestrator::new(stub.clone(), AuditConfig::default());
        (Arc::new(orchestrator), stub, rx)
    }

    #[tokio::test]
    async fn test_run_computes_metrics_and_script() {
        let (orchestrator, _stub, mut rx) = orchestrator();
        let run = orchestrator
            .run("Only men make good engineer", None)
            .await
            .unwrap();

        assert_eq!(run.concept, "engineer");
        assert_eq!(run.metrics.technique, MitigationTechnique::Reweighing);
        assert_eq!(run.metrics.before.disparate_impact, 0.333);
        assert_eq!(run.metrics.after.disparate_impact, 0.8);
        assert_eq!(run.metrics.after.statistical_parity_difference, -0.15);
        assert!(run.script.contains("privileged_value = 'Male'"));
        assert!(orchestrator.is_current(run.id));

        let update = rx.recv().await.unwrap();
        assert_eq!(update.run_id, run.id);
        assert_eq!(update.result.concept, "engineer");
    }

    #[tokio::test]
    async fn test_empty_input() {
        let (orchestrator, _stub, _rx) = orchestrator();
        assert!(matches!(
            orchestrator.run("   \n", None).await,
            Err(MlError::EmptyInput)
        ));
    }

    #[tokio::test]
    async fn test_one_failed_call_fails_the_run() {
        let (orchestrator, _stub, _rx) = orchestrator();
        let err = orchestrator.run("fail-scenario please", None).await.unwrap_err();
        assert!(matches!(err, MlError::Schema(_)));
    }

    #[tokio::test]
    async fn test_creative_failure_does_not_fail_run() {
        let (orchestrator, _stub, mut rx) = orchestrator();
        let run = orchestrator.run("this is broken", None).await.unwrap();
        assert_eq!(run.concept, "broken");

        // The only remaining sender is the orchestrator's; once it is gone the
        // channel closes without an update.
        drop(orchestrator);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_newer_run_supersedes_in_flight_run() {
        let (orchestrator, stub, _rx) = orchestrator();

        let first = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.run("please hang", None).await })
        };
        stub.started.notified().await;

        let second = orchestrator.run("quick engineer", None).await.unwrap();
        let first = first.await.unwrap();

        assert!(matches!(first, Err(MlError::Superseded)));
        assert!(orchestrator.is_current(second.id));
    }

    #[tokio::test]
    async fn test_superseded_creative_task_sends_nothing() {
        let (orchestrator, stub, mut rx) = orchestrator();

        let first = orchestrator.run("very slow", None).await.unwrap();
        stub.creative_started.notified().await;
        let second = orchestrator.run("calm nurse", None).await.unwrap();

        assert!(!orchestrator.is_current(first.id));
        let update = rx.recv().await.unwrap();
        assert_eq!(update.run_id, second.id);
        assert_eq!(update.result.concept, "nurse");
    }

    #[tokio::test]
    async fn test_creative_analysis_can_be_disabled() {
        let stub = Arc::new(StubProvider::default());
        let config = AuditConfig {
            creative_analysis: false,
            ..AuditConfig::default()
        };
        let (orchestrator, mut rx) = AuditOrchestrator::new(stub, config);
        orchestrator.run("a nurse", None).await.unwrap();
        drop(orchestrator);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_technique_switch_and_report() {
        let (orchestrator, _stub, _rx) = orchestrator();
        let run = orchestrator
            .run("engineer", Some(MitigationTechnique::DisparateImpactRemover))
            .await
            .unwrap();
        assert_eq!(run.metrics.after.disparate_impact, 0.9);

        let switched = run.with_technique(MitigationTechnique::Reweighing);
        assert_eq!(switched.id, run.id);
        assert_eq!(switched.metrics.before, run.metrics.before);
        assert_eq!(switched.metrics.after.disparate_impact, 0.8);

        let report = orchestrator.report(&switched).await.unwrap();
        assert!(report.summary.ends_with("via Reweighing"));
    }

    #[tokio::test]
    async fn test_cancel_current_run() {
        let (orchestrator, stub, _rx) = orchestrator();
        let pending = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.run("hang here", None).await })
        };
        stub.started.notified().await;
        orchestrator.cancel();
        assert!(matches!(pending.await.unwrap(), Err(MlError::Superseded)));
    }
}
