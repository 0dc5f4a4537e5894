use std::path::PathBuf;

use clap::{Parser, Subcommand};
use greenfuture_report::model::DatasetKind;
use greenfuture_report::{ReportError, Result, report};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    match cli.command {
        Command::Generate(args) => execute_generate(args),
    }
}

fn execute_generate(args: GenerateArgs) -> Result<()> {
    for kind in DatasetKind::ALL {
        let path = report::input_path(&args.data_dir, kind);
        if !path.exists() {
            return Err(ReportError::MissingInput(path));
        }
    }

    report::generate(&args.data_dir, &args.out_root)
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .try_init()
        .map_err(|error| ReportError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Render the GreenFuture analytics report from the five source workbooks."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full report sequence once.
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Directory containing the five source workbooks.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Root directory that receives the rendered report sections.
    #[arg(long, default_value = "GreenFuture_Project_All")]
    out_root: PathBuf,
}
