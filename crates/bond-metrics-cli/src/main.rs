mod chart;
mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::cash_flows::CashFlowsArgs;
use commands::metrics::MetricsArgs;
use commands::simulate::SimulateArgs;

/// Bond present value, cash-flow duration and duration charts
#[derive(Parser)]
#[command(
    name = "bond-metrics",
    version,
    about = "Bond present value, cash-flow duration and duration charts",
    long_about = "Prices a bullet (treasury-style) bond and an amortized (mortgage-style) \
                  bond from the same parameters, reports each bond's present value and \
                  duration, and draws the discounted cash flows with their centre of mass \
                  into svb_duration_analysis.png.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    simulate: SimulateArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "report", global = true)]
    format: OutputFormat,

    /// Log at debug level (otherwise RUST_LOG, defaulting to warn)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Price the treasury and mortgage bonds and save the chart (default)
    Simulate(SimulateArgs),
    /// Print the generated cash flows for one repayment policy
    CashFlows(CashFlowsArgs),
    /// Present value and duration of explicit cash flows
    Metrics(MetricsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Report,
    Json,
    Table,
    Csv,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        None => commands::simulate::run_simulate(cli.simulate),
        Some(Commands::Simulate(args)) => commands::simulate::run_simulate(args),
        Some(Commands::CashFlows(args)) => commands::cash_flows::run_cash_flows(args),
        Some(Commands::Metrics(args)) => commands::metrics::run_metrics(args),
        Some(Commands::Version) => {
            println!("bond-metrics {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result.and_then(|value| output::format_output(&cli.format, &value)) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
