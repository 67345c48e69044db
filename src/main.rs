use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use trim_reports::{Config, ErrorPolicy, Error, DEFAULT_OUTPUT_FILE};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const EXAMPLE_USAGE: &str = "trim-reports -r *trimming_report.txt";

#[derive(Parser, Debug)]
#[command(
    name = "trim-reports",
    version,
    author,
    about = "Parse trim_galore! trimming reports into one CSV table",
    long_about = "Parse the output reports from trim_galore! into table format.\n\n\
    Each report becomes one row of the output table. When no report files are \
    given, files ending in 'trimming_report.txt' in the current directory are used.\n\n\
    USAGE EXAMPLES:\n  \
      # Parse every report in the current directory\n  \
      trim-reports\n\n  \
      # Parse selected reports into cohort.csv\n  \
      trim-reports -r *trimming_report.txt -o cohort"
)]
struct Cli {
    /// Trimming report files to parse (usually ending in '_trimming_report.txt')
    ///
    /// When omitted, the current directory is searched for them.
    #[arg(
        short,
        long,
        alias = "report_files",
        num_args = 1..,
        value_name = "FILE"
    )]
    report_files: Vec<PathBuf>,

    /// Output CSV file; '.csv' is appended if missing
    #[arg(
        short,
        long,
        alias = "output_file",
        default_value = DEFAULT_OUTPUT_FILE,
        value_name = "FILE"
    )]
    output_file: PathBuf,

    /// Leave out reports that cannot be parsed instead of stopping
    #[arg(long)]
    skip_invalid: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(cli.verbose) {
        eprintln!("Error: {e:#}");
        return ExitCode::from(EXIT_FAILURE);
    }

    ExitCode::from(run_cli(cli))
}

/// Runs the tool and returns the process exit status.
fn run_cli(cli: Cli) -> u8 {
    match execute(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            if e.downcast_ref::<Error>().is_some_and(Error::is_no_reports) {
                print_no_reports();
            } else {
                eprintln!("Error: {e:#}");
            }
            EXIT_FAILURE
        }
    }
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let policy = if cli.skip_invalid {
        ErrorPolicy::Skip
    } else {
        ErrorPolicy::Abort
    };

    let config = Config::builder()
        .report_files(cli.report_files)
        .output_file(cli.output_file)
        .error_policy(policy)
        .build()
        .context("Failed to build configuration")?;

    let stats = trim_reports::run(config)?;
    stats.print_summary();

    Ok(())
}

fn print_no_reports() {
    println!();
    println!("\tWelcome to trim-reports. This program parses the output reports");
    println!("\tfrom trim_galore! into table format.");
    println!();
    println!("\tExample usage: {EXAMPLE_USAGE}");
    println!();
    println!("\tNo trimming report files were specified or found in your current working directory.");
    println!();
    println!("\tPlease specify input files using the -r option or run trim-reports");
    println!("\tfrom a directory containing report files.");
    println!();
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("trim_reports=info"),
        1 => EnvFilter::new("trim_reports=debug"),
        _ => EnvFilter::new("trim_reports=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
