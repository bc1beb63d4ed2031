use clap::Parser;
use recphylo::{ConvertError, ConvertOptions, convert_report};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Convert a RANGER-DTL reconciliation report into recPhyloXML.
#[derive(Debug, Parser)]
#[command(name = "recphylo", version, about)]
struct Cli {
    /// RANGER-DTL output file.
    #[arg(value_name = "INPUT", required_unless_present = "input")]
    input_path: Option<PathBuf>,

    /// RANGER-DTL output file (alternative to the positional argument).
    #[arg(short, long, value_name = "FILE", conflicts_with = "input_path")]
    input: Option<PathBuf>,

    /// Where to write the recPhyloXML document.
    #[arg(short, long, value_name = "FILE", default_value = "output.xml")]
    output: PathBuf,
}

impl Cli {
    fn input(&self) -> Result<&Path, CliError> {
        self.input
            .as_deref()
            .or(self.input_path.as_deref())
            .ok_or(CliError::MissingInput)
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("no input file given")]
    MissingInput,
    #[error("reading {} failed: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("writing {} failed: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let input = cli.input()?;
    let content = fs::read_to_string(input).map_err(|source| {
        CliError::Read { path: input.to_path_buf(), source }
    })?;

    let conversion = convert_report(&content, &ConvertOptions::default())?;

    fs::write(&cli.output, &conversion.document).map_err(|source| {
        CliError::Write { path: cli.output.clone(), source }
    })?;

    if !conversion.summary.issues.is_empty() {
        eprintln!(
            "warning: {} annotation issue(s) across {} records; see warnings above",
            conversion.summary.issues.len(),
            conversion.summary.records()
        );
    }

    tracing::info!(output = %cli.output.display(), "recPhyloXML written");
    Ok(())
}
