//! Plain-text rendering of analysis results for the terminal.
//!
//! Every function returns a `String`; callers decide where it goes. Sections
//! without entries are left out.

use fairlens_ml::analysis::{AuditReport, BiasSpectrumAnalysis, ComprehensiveTextAnalysis};
use fairlens_ml::{AnalysisRun, FairnessMetrics, MetricsPair, ScenarioDescriptor};
use std::fmt::Write;

const WIDTH: usize = 88;

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}\n{}", title, "=".repeat(title.chars().count()));
}

/// Wrap `text` to the terminal width with a hanging indent.
fn paragraph(out: &mut String, indent: &str, text: &str) {
    let options = textwrap::Options::new(WIDTH)
        .initial_indent(indent)
        .subsequent_indent(indent);
    let _ = writeln!(out, "{}", textwrap::fill(text, options));
}

fn bullet(out: &mut String, text: &str) {
    let options = textwrap::Options::new(WIDTH)
        .initial_indent("  - ")
        .subsequent_indent("    ");
    let _ = writeln!(out, "{}", textwrap::fill(text, options));
}

/// Full run: text analysis, scenario, and metrics.
pub fn render_run(run: &AnalysisRun) -> String {
    let mut out = render_text_analysis(&run.text_analysis);
    out.push_str(&render_scenario(&run.scenario));
    out.push_str(&render_metrics(&run.metrics));
    out
}

pub fn render_text_analysis(analysis: &ComprehensiveTextAnalysis) -> String {
    let mut out = String::new();

    let findings = &analysis.text_analysis.findings;
    if !findings.is_empty() {
        heading(&mut out, "Bias Findings");
        for finding in findings {
            let _ = writeln!(out, "  \"{}\"", finding.biased_phrase);
            paragraph(&mut out, "      why: ", &finding.explanation);
            paragraph(&mut out, "      try: ", &finding.suggestion);
        }
    }

    let tone = &analysis.tone_analysis;
    heading(&mut out, "Language & Tone");
    let _ = writeln!(
        out,
        "  Sentiment: {}  Formality: {}  Objectivity: {}  Confidence: {}",
        tone.sentiment, tone.formality, tone.objectivity, tone.confidence
    );
    for emotional in &tone.emotional_tones {
        bullet(&mut out, &format!("{}: {}", emotional.tone, emotional.impact));
    }
    if !tone.summary.is_empty() {
        paragraph(&mut out, "  ", &tone.summary);
    }

    let assumptions = &analysis.unspoken_assumptions.assumptions;
    if !assumptions.is_empty() {
        heading(&mut out, "Unspoken Assumptions");
        for a in assumptions {
            bullet(&mut out, &format!("{} ({})", a.assumption, a.explanation));
        }
    }

    let interpretations = &analysis.biased_interpretations.interpretations;
    if !interpretations.is_empty() {
        heading(&mut out, "Key Biased Interpretations");
        for i in interpretations {
            bullet(&mut out, &format!("{} ({})", i.interpretation, i.explanation));
        }
    }

    let reframings = &analysis.constructive_reframing.reframings;
    if !reframings.is_empty() {
        heading(&mut out, "Constructive Reframing");
        for r in reframings {
            bullet(&mut out, &format!("{} ({})", r.reframing, r.explanation));
        }
    }

    out
}

pub fn render_scenario(scenario: &ScenarioDescriptor) -> String {
    let mut out = String::new();
    heading(&mut out, "Inferred Scenario");
    paragraph(&mut out, "  ", &scenario.scenario_text);
    let _ = writeln!(
        out,
        "  Protected attribute: {} (privileged: {}, unprivileged: {})",
        scenario.protected_attribute_label, scenario.privileged_value, scenario.unprivileged_value
    );
    let _ = writeln!(
        out,
        "  Outcome: {} (favorable: {})",
        scenario.outcome_attribute_label, scenario.favorable_outcome_value
    );
    let _ = writeln!(out, "  Synthetic records: {}", scenario.records.len());
    out
}

fn significance_line(metrics: &FairnessMetrics) -> String {
    if metrics.is_significant() {
        format!(
            "The difference between groups is statistically significant (p {}).",
            p_relation(metrics)
        )
    } else {
        format!(
            "The difference between groups is not statistically significant (p {}).",
            p_relation(metrics)
        )
    }
}

fn p_relation(metrics: &FairnessMetrics) -> String {
    let display = metrics.p_value_display();
    if display.starts_with('<') {
        display
    } else {
        format!("= {}", display)
    }
}

/// Before/after table for one technique.
pub fn render_metrics(pair: &MetricsPair) -> String {
    let mut out = String::new();
    let (before, after) = (&pair.before, &pair.after);
    heading(&mut out, "Fairness Metrics");
    let _ = writeln!(
        out,
        "  {:<32} {:>10} {:>10}",
        "Metric",
        "Before",
        "After"
    );
    for (name, b, a) in [
        ("Disparate Impact", before.disparate_impact, after.disparate_impact),
        (
            "Statistical Parity Difference",
            before.statistical_parity_difference,
            after.statistical_parity_difference,
        ),
        (
            "Equal Opportunity Difference",
            before.equal_opportunity_difference,
            after.equal_opportunity_difference,
        ),
    ] {
        let _ = writeln!(out, "  {:<32} {:>10.3} {:>10.3}", name, b, a);
    }
    let _ = writeln!(out, "  {:<32} {:>10.3}", "Chi-Squared", before.chi_squared);
    let _ = writeln!(out, "  {:<32} {:>10}", "p-value", before.p_value_display());
    let _ = writeln!(out, "  Mitigation (simulated): {}", pair.technique);
    paragraph(&mut out, "  ", &significance_line(before));
    out
}

/// After-metrics of several techniques side by side, all from the same before.
pub fn render_comparison(pairs: &[MetricsPair]) -> String {
    let mut out = String::new();
    let Some(first) = pairs.first() else {
        return out;
    };
    heading(&mut out, "Mitigation Comparison");
    let _ = write!(out, "  {:<32} {:>10}", "Metric", "Before");
    for pair in pairs {
        let _ = write!(out, " {:>26}", pair.technique.display_name());
    }
    out.push('\n');

    type Field = fn(&FairnessMetrics) -> f64;
    let rows: [(&str, Field); 3] = [
        ("Disparate Impact", |m| m.disparate_impact),
        ("Statistical Parity Difference", |m| m.statistical_parity_difference),
        ("Equal Opportunity Difference", |m| m.equal_opportunity_difference),
    ];
    for (name, field) in rows {
        let _ = write!(out, "  {:<32} {:>10.3}", name, field(&first.before));
        for pair in pairs {
            let _ = write!(out, " {:>26.3}", field(&pair.after));
        }
        out.push('\n');
    }
    paragraph(&mut out, "  ", &significance_line(&first.before));
    out
}

pub fn render_report(report: &AuditReport) -> String {
    let mut out = String::new();
    heading(&mut out, "Audit Report");
    paragraph(&mut out, "  ", &report.summary);
    if !report.ethical_implications.is_empty() {
        let _ = writeln!(out, "\n  Ethical implications");
        paragraph(&mut out, "  ", &report.ethical_implications);
    }
    if !report.recommendations.is_empty() {
        let _ = writeln!(out, "\n  Recommendations");
        for rec in &report.recommendations {
            bullet(&mut out, rec);
        }
    }
    if !report.ethics_statement.is_empty() {
        let _ = writeln!(out, "\n  Ethics statement");
        paragraph(&mut out, "  ", &report.ethics_statement);
    }
    out
}

pub fn render_spectrum(spectrum: &BiasSpectrumAnalysis) -> String {
    let mut out = String::new();
    heading(&mut out, &format!("Creative Bias Spectrum: {}", spectrum.concept));
    paragraph(&mut out, "  ", &spectrum.summary);
    for dimension in &spectrum.dimensions {
        let _ = writeln!(out, "\n  {}", dimension.dimension);
        paragraph(&mut out, "    stereotype:  ", &dimension.stereotype);
        paragraph(&mut out, "    alternative: ", &dimension.debiased_alternative);
    }
    out
}
