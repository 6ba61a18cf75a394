use authlens_core::trace::AuthTrace;
use serde::{Deserialize, Serialize};

use super::findings::{Finding, Severity};

pub const REPORT_VERSION: u32 = 1;

/// Final analysis report handed to the serializer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub version: u32,
    #[serde(rename = "tabId")]
    pub tab_id: i64,
    #[serde(rename = "startedAtMs")]
    pub started_at_ms: i64,
    pub summary: ReportSummary,
    pub findings: Vec<Finding>,
}

/// Finding counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(rename = "HIGH")]
    pub high: usize,
    #[serde(rename = "MED")]
    pub med: usize,
    #[serde(rename = "LOW")]
    pub low: usize,
}

pub struct ReportBuilder;

impl ReportBuilder {
    /// Tally findings by severity and assemble the report. Finding order is
    /// preserved exactly as detected; an empty findings list is a valid,
    /// successful result.
    pub fn build(trace: &AuthTrace, findings: Vec<Finding>) -> Report {
        let mut summary = ReportSummary::default();
        for finding in &findings {
            match finding.severity {
                Severity::High => summary.high += 1,
                Severity::Med => summary.med += 1,
                Severity::Low => summary.low += 1,
            }
        }

        Report {
            version: REPORT_VERSION,
            tab_id: trace.tab_id,
            started_at_ms: trace.started_at_ms,
            summary,
            findings,
        }
    }
}
