use clap::Parser;
use colored::Colorize;
use sigscout::{
    classify_directory, Algorithm, CliOverrides, ClassificationReport, ReadMode, ScanConfig,
    SigError,
};
use std::{num::NonZeroUsize, path::PathBuf, process, str::FromStr};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, SigError>;

/// Labels every file in a directory by the byte patterns it contains
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory whose entries are classified
    directory: Option<PathBuf>,

    /// Rule file, one `id;"pattern";"label"` rule per line
    rules: Option<PathBuf>,

    /// Search algorithm (naive|kmp|rabin-karp)
    #[arg(short = 'a', long, allow_hyphen_values = true)]
    algorithm: Option<String>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Search each file as a whole instead of line by line
    #[arg(long, conflicts_with = "read_mode")]
    whole_file: bool,

    /// How file content is searched (lines|whole-file)
    #[arg(long)]
    read_mode: Option<String>,

    /// Directory entries to skip (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Print a summary to stderr after the results
    #[arg(short, long)]
    stats: bool,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = SigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(SigError::unknown_format(s)),
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(2);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Selector and format are checked before anything is read.
    let algorithm = cli
        .algorithm
        .as_deref()
        .map(Algorithm::from_str)
        .transpose()?;
    let format: OutputFormat = cli.format.parse()?;
    let read_mode = match cli.read_mode.as_deref() {
        Some(mode) => Some(mode.parse::<ReadMode>()?),
        None => cli.whole_file.then_some(ReadMode::WholeFile),
    };

    let overrides = CliOverrides {
        root_path: cli.directory,
        rules_path: cli.rules,
        algorithm,
        thread_count: cli.threads,
        read_mode,
        ignore_patterns: cli.ignore,
        log_level: cli.log_level,
    };
    let config = ScanConfig::load_from(cli.config.as_deref())?.merge_with_cli(overrides);

    init_logging(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    let report = classify_directory(&config)?;
    match format {
        OutputFormat::Text => {
            for line in report.lines() {
                println!("{}", line);
            }
        }
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if cli.stats {
        print_summary(&report);
    }
    Ok(())
}

/// Logs go to stderr; `RUST_LOG` takes precedence over the configured level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(report: &ClassificationReport) {
    eprintln!(
        "\nClassified {} files: {} matched, {} unknown, {} unreadable",
        report.files_classified.to_string().bold(),
        report.files_matched.to_string().green(),
        report.files_unknown.to_string().yellow(),
        report.files_unreadable.to_string().red()
    );
}
