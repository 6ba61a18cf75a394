use super::types::AuthTrace;
use crate::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct TraceReader;

impl TraceReader {
    /// Read and parse an auth trace from the given path
    pub fn from_file(path: &Path) -> Result<AuthTrace> {
        tracing::debug!("Reading trace file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let trace: AuthTrace = serde_json::from_reader(reader)?;

        tracing::info!(
            "Successfully parsed trace with {} events",
            trace.events.len()
        );
        Self::check(&trace);

        Ok(trace)
    }

    /// Parse an auth trace from a JSON string
    pub fn from_str(content: &str) -> Result<AuthTrace> {
        tracing::debug!("Parsing trace from string");

        let trace: AuthTrace = serde_json::from_str(content)?;
        Self::check(&trace);

        Ok(trace)
    }

    fn check(trace: &AuthTrace) {
        if trace.events.is_empty() {
            tracing::warn!("Trace contains no events");
        }
        if trace.truncated {
            tracing::warn!(
                "Trace was truncated at capture; {} events dropped",
                trace.dropped_events
            );
        }
    }
}
