mod host_matcher;

pub use host_matcher::HostPattern;

use crate::trace::{AuthTrace, TraceEvent};
use url::Url;

/// Host scoping for a trace
///
/// With no patterns every event passes. With patterns, an event passes when
/// its URL hostname matches ANY pattern; events with unparseable or
/// host-less URLs are excluded while the scope is active.
#[derive(Debug, Default)]
pub struct TraceFilter {
    hosts: Vec<HostPattern>,
}

impl TraceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add host patterns from a list of pattern strings
    pub fn with_hosts(mut self, patterns: Vec<String>) -> crate::Result<Self> {
        for pattern in patterns {
            self.hosts.push(HostPattern::parse(&pattern)?);
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Check whether an event falls inside the host scope
    pub fn matches(&self, event: &TraceEvent) -> bool {
        if self.hosts.is_empty() {
            return true;
        }

        let Some(raw_url) = event.url() else {
            return false;
        };

        let url = match Url::parse(raw_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Failed to parse URL {}: {}", raw_url, e);
                return false;
            }
        };

        let Some(hostname) = url.host_str() else {
            tracing::debug!("No host in URL: {}", raw_url);
            return false;
        };

        self.hosts.iter().any(|pattern| pattern.matches(hostname))
    }
}

/// Return a copy of the trace containing only events inside the host scope.
/// An empty result is not an error: a trace whose events all fall outside
/// the scope still analyzes to a clean report.
pub fn filter_trace(trace: &AuthTrace, filter: &TraceFilter) -> AuthTrace {
    let events: Vec<TraceEvent> = trace
        .events
        .iter()
        .filter(|event| filter.matches(event))
        .cloned()
        .collect();

    tracing::debug!(
        "Host scope kept {} of {} events",
        events.len(),
        trace.events.len()
    );

    AuthTrace {
        tab_id: trace.tab_id,
        started_at_ms: trace.started_at_ms,
        events,
        truncated: trace.truncated,
        dropped_events: trace.dropped_events,
    }
}
