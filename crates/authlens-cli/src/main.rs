use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use authlens_cli::commands;

#[derive(Parser)]
#[command(name = "authlens")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A static analyzer for recorded browser auth traffic",
    long_about = "Authlens lints recorded browser network traces for common OAuth 2.0 / OpenID \
                  Connect implementation flaws: tokens leaking into URLs, missing or mismatched \
                  CSRF state, missing PKCE, missing OIDC nonce, and insecure session cookies."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a recorded auth trace and write a findings report
    Analyze {
        /// Path to the trace JSON file
        #[arg(value_name = "TRACE")]
        trace: PathBuf,

        /// Output path for the report
        #[arg(long, default_value = "report.json")]
        out: PathBuf,

        /// Scrub sensitive parameter values from URL evidence in the report
        #[arg(long)]
        redact: bool,

        /// Only analyze events whose URL host matches (domain or glob
        /// pattern; repeatable)
        #[arg(long, value_name = "PATTERN")]
        host: Vec<String>,

        /// Print each finding after the summary line
        #[arg(long)]
        details: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = parse_cli();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    match cli.command {
        Commands::Analyze {
            trace,
            out,
            redact,
            host,
            details,
        } => commands::analyze::execute(&trace, &out, redact, host, details),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

/// Parse arguments, keeping exit codes on the analyzer's contract: help and
/// version exit 0, any unrecognized invocation exits 1.
fn parse_cli() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        let code = match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
            _ => 1,
        };
        let _ = e.print();
        std::process::exit(code);
    })
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("authlens_cli=debug,authlens_core=debug,authlens_detectors=debug")
    } else {
        EnvFilter::new("authlens_cli=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
