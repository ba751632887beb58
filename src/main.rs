//! Paste-Trawler main entry point
//!
//! This is the command-line interface for the Paste-Trawler link prober.

use anyhow::Context;
use clap::{Parser, Subcommand};
use paste_trawler::config::{load_config_with_hash, Config};
use paste_trawler::discovery::{interrupt_signals, Coordinator, ShutdownCoordinator};
use paste_trawler::output::{
    clean_json_lines, print_statistics, with_extension, ConsoleSink, CsvSink, JsonLinesSink,
    ResultSink,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const INTERRUPT_HELP: &str = "\
Press Ctrl+C once to stop probing and wait for in-flight requests to finish.
Press Ctrl+C again while waiting to exit immediately with code 2; results still
in flight are lost and the last line of an output file may be truncated.";

/// Paste-Trawler: link discovery over a paste site's random-ID space
///
/// Paste-Trawler probes randomly generated paste URLs and records live
/// file-hosting links (Mega, GoFile, Sendvid, Cyberdrop, Bunkr, Google Drive,
/// DoodStream, Cloud Mail.ru) found in the pastes that exist.
#[derive(Parser, Debug)]
#[command(name = "paste-trawler")]
#[command(version)]
#[command(about = "Discovers file-hosting links on a paste site", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print discovered links to the terminal
    #[command(after_help = INTERRUPT_HELP)]
    Console,

    /// Append discovered entries to a JSON-lines file
    #[command(after_help = INTERRUPT_HELP)]
    Json {
        /// Output file (.json is appended if missing)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Append discovered entries to a CSV file
    #[command(after_help = INTERRUPT_HELP)]
    Csv {
        /// Output file (.csv is appended if missing)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Convert a JSON-lines file into a deduplicated JSON array
    Clean {
        /// JSON-lines file written by the `json` command
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("paste_trawler=info,warn"),
            1 => EnvFilter::new("paste_trawler=debug,info"),
            2 => EnvFilter::new("paste_trawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Command::Clean { file } = &cli.command {
        return handle_clean(file);
    }

    // Config errors must not leave an output file behind
    let config = load_configuration(cli.config.as_deref())?;
    let sink = open_sink(&cli.command)?;
    handle_discovery(config, sink).await
}

/// Opens the result sink for a run command
fn open_sink(command: &Command) -> anyhow::Result<Arc<dyn ResultSink>> {
    let sink: Arc<dyn ResultSink> = match command {
        Command::Clean { .. } => anyhow::bail!("clean does not write discovery output"),
        Command::Console => Arc::new(ConsoleSink::stdout()),
        Command::Json { file } => {
            let path = with_extension(file, "json");
            Arc::new(
                JsonLinesSink::open(&path)
                    .with_context(|| format!("cannot open output {}", path.display()))?,
            )
        }
        Command::Csv { file } => {
            let path = with_extension(file, "csv");
            Arc::new(
                CsvSink::open(&path)
                    .with_context(|| format!("cannot open output {}", path.display()))?,
            )
        }
    };
    Ok(sink)
}

/// Loads the config file if one was given, otherwise the defaults
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given; using defaults");
            Ok(Config::default())
        }
    }
}

/// Handles the `clean` command
fn handle_clean(file: &Path) -> anyhow::Result<ExitCode> {
    let report =
        clean_json_lines(file).with_context(|| format!("failed to clean {}", file.display()))?;

    println!(
        "✓ Wrote {} entries to {} ({} duplicates removed, {} unreadable lines skipped)",
        report.kept,
        report.output.display(),
        report.duplicates,
        report.skipped
    );
    Ok(ExitCode::SUCCESS)
}

/// Handles the discovery run for every output mode
async fn handle_discovery(config: Config, sink: Arc<dyn ResultSink>) -> anyhow::Result<ExitCode> {
    let shutdown = Arc::new(ShutdownCoordinator::with_process_exit());
    let coordinator = Coordinator::new(&config, sink, Arc::clone(&shutdown))
        .context("failed to set up discovery")?;

    Arc::clone(&shutdown).listen(interrupt_signals());
    tracing::info!("Press Ctrl+C to stop; press it twice to exit immediately (results may be lost)");

    let report = coordinator.run().await.context("discovery failed")?;
    print_statistics(&report.stats, report.reason.as_str());

    Ok(ExitCode::from(report.exit_code() as u8))
}
