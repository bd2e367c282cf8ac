use anyhow::Result;
use clap::Parser;
use runtime_condenser::config::Config;
use runtime_condenser::logging::init_logging;
use runtime_condenser::{CondenseOptions, Condenser, InputSource, OutputSink, ReportFormat};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "runtime-condenser")]
#[command(about = "Condenses game server runtime logs into a deduplicated, count-sorted summary")]
#[command(version)]
struct Cli {
    /// Read the log from standard input and write the report to standard output
    #[arg(short = 's', long = "std")]
    std_streams: bool,

    /// Input file (defaults to Input.txt)
    #[arg(short, long, conflicts_with = "std_streams")]
    input: Option<PathBuf>,

    /// Output file (defaults to Output.txt)
    #[arg(short, long, conflicts_with = "std_streams")]
    output: Option<PathBuf>,

    /// Output the report in JSON format
    #[arg(long)]
    json: bool,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let _guard = init_logging(&config.logging, &config.paths);

    let options = build_options(&cli, &config);
    let condenser = Condenser::new(&config.processing);
    let summary = condenser.run(&options)?;

    if !cli.std_streams {
        condenser
            .report_builder()
            .print_console_summary(&summary, &options.output.to_string());
    }

    Ok(())
}

fn build_options(cli: &Cli, config: &Config) -> CondenseOptions {
    let format = if cli.json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };

    if cli.std_streams {
        return CondenseOptions {
            input: InputSource::Stdin,
            output: OutputSink::Stdout,
            format,
        };
    }

    CondenseOptions {
        input: InputSource::File(cli.input.clone().unwrap_or_else(|| config.paths.input.clone())),
        output: OutputSink::File(cli.output.clone().unwrap_or_else(|| config.paths.output.clone())),
        format,
    }
}
