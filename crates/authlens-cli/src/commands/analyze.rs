use anyhow::{Context, Result};
use authlens_core::filter::{self, TraceFilter};
use authlens_core::trace::{AuthTrace, TraceReader};
use authlens_core::url::is_auth_url;
use authlens_detectors::{AnalyzeOptions, Report, Severity, TraceAnalyzer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Read a trace file, apply the host scope, and run the rule engine.
/// Split out from `execute` so tests can drive the library path directly.
pub fn analyze_trace(file: &Path, hosts: Vec<String>, redact: bool) -> Result<Report> {
    tracing::debug!("Reading trace file: {}", file.display());
    let trace = TraceReader::from_file(file)?;

    let scope = TraceFilter::new().with_hosts(hosts)?;
    let trace = if scope.is_empty() {
        trace
    } else {
        filter::filter_trace(&trace, &scope)
    };

    warn_if_no_auth_signals(&trace);

    let options = AnalyzeOptions {
        redact_evidence: redact,
    };
    let report = TraceAnalyzer::analyze_with(&trace, &options)?;
    Ok(report)
}

pub fn execute(
    file: &Path,
    out: &Path,
    redact: bool,
    hosts: Vec<String>,
    details: bool,
) -> Result<()> {
    tracing::info!("Analyzing trace: {}", file.display());

    let report = analyze_trace(file, hosts, redact)?;
    write_report(&report, out)?;

    println!(
        "Findings: HIGH={} MED={} LOW={}",
        report.summary.high, report.summary.med, report.summary.low
    );
    println!("Wrote: {}", out.display());

    if details {
        print_findings(&report);
    }

    Ok(())
}

fn write_report(report: &Report, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to open output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;

    tracing::debug!(
        "Wrote report with {} findings to {}",
        report.findings.len(),
        path.display()
    );
    Ok(())
}

fn warn_if_no_auth_signals(trace: &AuthTrace) {
    let has_signals = trace
        .events
        .iter()
        .filter_map(|event| event.url())
        .any(is_auth_url);
    if !has_signals {
        tracing::warn!("Trace carries no OAuth/OIDC signals; nothing to correlate");
    }
}

fn print_findings(report: &Report) {
    use console::style;

    if report.findings.is_empty() {
        println!("\n{} No issues detected", style("[OK]").green());
        return;
    }

    for finding in &report.findings {
        let tag = match finding.severity {
            Severity::High => style("[HIGH]").red().bold(),
            Severity::Med => style("[MED]").yellow(),
            Severity::Low => style("[LOW]").dim(),
        };
        println!("\n{} {} ({})", tag, style(&finding.title).bold(), finding.id);
        if let Some(why) = &finding.why {
            println!("  {}", style(why).dim());
        }
        println!("  Fix: {}", finding.fix);
        for evidence in &finding.evidence {
            println!("  Evidence: {}", evidence);
        }
    }

    println!();
}
