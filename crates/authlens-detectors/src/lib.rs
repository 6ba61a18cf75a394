pub mod error;
pub mod oauth;

pub use error::{Error, Result};
pub use oauth::{
    AnalyzeOptions, Confidence, EventRules, Finding, FlowRules, FlowState, Report, ReportBuilder,
    ReportSummary, Severity, TraceAnalyzer,
};
