pub mod analyzer;
pub mod findings;
pub mod flow;
pub mod report;
pub mod rules;

// Re-export main types for convenience
pub use analyzer::{AnalyzeOptions, TraceAnalyzer};
pub use findings::{Confidence, Finding, Severity};
pub use flow::FlowState;
pub use report::{Report, ReportBuilder, ReportSummary};
pub use rules::{EventRules, FlowRules};
