use crate::Result;
use authlens_core::trace::AuthTrace;

use super::flow::FlowState;
use super::report::{Report, ReportBuilder};
use super::rules::{EventRules, FlowRules};

/// Options threaded through one analysis run
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    /// Scrub sensitive parameter values from URL evidence in findings
    pub redact_evidence: bool,
}

pub struct TraceAnalyzer;

impl TraceAnalyzer {
    /// Analyze a trace with default options
    pub fn analyze(trace: &AuthTrace) -> Result<Report> {
        Self::analyze_with(trace, &AnalyzeOptions::default())
    }

    /// Run the full rule engine over a trace: one forward scan in strict
    /// event order (per-event findings plus flow-state accumulation), then
    /// the aggregate rules, then the report tally. All state lives in this
    /// call; independent traces can be analyzed concurrently.
    pub fn analyze_with(trace: &AuthTrace, options: &AnalyzeOptions) -> Result<Report> {
        tracing::debug!("Starting analysis of {} trace events", trace.events.len());

        let mut findings = Vec::new();
        let mut state = FlowState::new();

        for event in &trace.events {
            if event.url().is_none() {
                continue;
            }
            findings.extend(EventRules::evaluate(event, options.redact_evidence));
            state.observe(event);
        }
        tracing::debug!("Per-event rules produced {} findings", findings.len());

        findings.extend(FlowRules::evaluate(&state));
        tracing::debug!("{} findings after aggregate rules", findings.len());

        Ok(ReportBuilder::build(trace, findings))
    }
}
