/// Build Corpus: normalizes SRD monster data into training artifacts.
///
/// Usage: build_corpus [--config <file.ron>] [--data-dir <dir>] [--out-dir <dir>]
///                     [--entity <name>] [--rules-version <v>] [--seed <n>] [-v]
///
/// Exits 0 when the corpus is written, even if some records were skipped.

use clap::Parser;
use srd_corpus::core::pipeline::CorpusPipeline;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Normalize SRD monster data into a training corpus
#[derive(Parser)]
#[command(name = "build_corpus", version)]
struct Args {
    /// RON config file; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding SRD_<Entity>.json or SRD_<Entity>.txt
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Directory the corpus files are written into
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Entity class to load (selects the source file name)
    #[arg(long, value_name = "NAME")]
    entity: Option<String>,

    /// Version string recorded in the rules snapshot
    #[arg(long, value_name = "VERSION")]
    rules_version: Option<String>,

    /// Seed for the attack-resolution sample
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Log at debug level (RUST_LOG still wins when set)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    let mut builder = CorpusPipeline::builder();
    if let Some(path) = args.config {
        builder = builder.config_file(path);
    }
    if let Some(dir) = args.data_dir {
        builder = builder.data_dir(dir);
    }
    if let Some(dir) = args.out_dir {
        builder = builder.out_dir(dir);
    }
    if let Some(ref entity) = args.entity {
        builder = builder.entity(entity);
    }
    if let Some(ref version) = args.rules_version {
        builder = builder.rules_version(version);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    let mut pipeline = match builder.build() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match pipeline.run() {
        Ok(summary) => {
            println!("=== Corpus Build Summary ===\n");
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
