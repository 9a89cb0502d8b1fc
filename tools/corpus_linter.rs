/// Corpus Linter: checks a written corpus directory against the
/// Monster/Action consistency contract.
///
/// Usage: corpus_linter <out_dir> [-v]

use clap::Parser;
use srd_corpus::core::lint::lint_corpus;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Check a corpus output directory
#[derive(Parser)]
#[command(name = "corpus_linter", version)]
struct Args {
    /// Directory written by build_corpus
    #[arg(value_name = "OUT_DIR")]
    out_dir: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let report = match lint_corpus(&args.out_dir) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("=== Corpus Lint Report ===\n");
    println!(
        "Checked {} monsters, {} actions, {} samples",
        report.monsters, report.actions, report.samples
    );

    if report.is_clean() {
        println!("All checks passed!");
        return ExitCode::SUCCESS;
    }

    for finding in &report.findings {
        println!("ERROR: {}", finding);
    }
    println!("\nSummary: {} errors", report.findings.len());
    ExitCode::FAILURE
}
