mod progress;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;

use sherpa_sync::{UpdateOutcome, Updater, UpdaterConfig};

use crate::progress::ConsoleReporter;

#[derive(Parser, Debug)]
#[command(name = "sherpa-sync")]
#[command(about = "Replace a local directory with the latest CI build artifact")]
#[command(version)]
struct Args {
    /// GitHub repository in owner/name form
    #[arg(short = 'r', long, default_value = "pjotrsavitski/sherpa-helper")]
    repository: String,

    /// Authentication token
    #[arg(short = 't', long, env = "GITHUB_TOKEN", hide_env_values = true, default_value = "")]
    token: String,

    /// Asset directory, relative or fully qualified
    #[arg(short = 'd', long, default_value = "sherpa4selfie")]
    directory: PathBuf,

    /// Where to store the downloaded archive until it is extracted
    #[arg(long, value_name = "PATH", default_value = "dist.zip")]
    archive: PathBuf,

    /// Disable progress output
    #[arg(long)]
    no_progress: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "warn,sherpa_sync=info",
        _ => "warn,sherpa_sync=debug",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}

fn run() -> Result<i32> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.repository.is_empty() || args.token.is_empty() || args.directory.as_os_str().is_empty() {
        eprintln!("{}", style("At least one of the parameters is missing!").red());
        return Ok(1);
    }

    let config = UpdaterConfig::new(args.repository, args.token, args.directory)
        .with_archive_path(args.archive);
    let mut updater = Updater::from_config(config).context("Failed to set up the updater")?;

    let reporter = ConsoleReporter::new(!args.no_progress, updater.config().target_dir().to_path_buf());
    let outcome = updater.run_with_listener(&reporter);
    reporter.finish();

    match outcome {
        Ok(UpdateOutcome::NothingToDo) => {
            println!("{}", style("No artifacts found!").blue());
        }
        Ok(UpdateOutcome::Updated(report)) => {
            log::info!(
                "Downloaded {} bytes, extracted {} entries",
                report.downloaded_bytes,
                report.extracted.len()
            );
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Update failed while {}", updater.stage().description())
            });
        }
    }

    println!("{}", style("All done").green());
    Ok(0)
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}
