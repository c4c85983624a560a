use clap::Args;
use colored::Colorize;
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::PathBuf;

use bond_metrics_core::config::{BondParameters, MAX_MATURITY};
use bond_metrics_core::simulation;

use crate::chart;
use crate::input;

/// Scenario parameters. Flags given explicitly override values read from
/// `--input`; anything left unset keeps its default.
#[derive(Args, Debug, Clone, Default)]
pub struct ScenarioArgs {
    /// Path to a JSON scenario file (maturity, yield_rate, face_value, coupon_rate, mortgage_rate)
    #[arg(long)]
    pub input: Option<String>,

    /// Maturity in whole periods, at most 10000 [default: 20]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_MATURITY as i64))]
    pub maturity: Option<u32>,

    /// Yield (discount) rate per period as a decimal [default: 0.05]
    #[arg(long, allow_hyphen_values = true)]
    pub yield_rate: Option<Decimal>,

    /// Face value [default: 1000000]
    #[arg(long)]
    pub face_value: Option<Decimal>,

    /// Coupon rate per period for the bullet bond [default: 0.04]
    #[arg(long, allow_hyphen_values = true)]
    pub coupon_rate: Option<Decimal>,

    /// Loan rate for the amortized bond [default: coupon rate]
    #[arg(long, allow_hyphen_values = true)]
    pub mortgage_rate: Option<Decimal>,
}

impl ScenarioArgs {
    /// Defaults, then the scenario file, then explicit flags.
    pub fn resolve(&self) -> Result<BondParameters, Box<dyn std::error::Error>> {
        let mut params: BondParameters = match self.input {
            Some(ref path) => input::file::read_json(path)?,
            None => BondParameters::default(),
        };

        if let Some(maturity) = self.maturity {
            params.maturity = maturity;
        }
        if let Some(yield_rate) = self.yield_rate {
            params.yield_rate = yield_rate;
        }
        if let Some(face_value) = self.face_value {
            params.face_value = face_value;
        }
        if let Some(coupon_rate) = self.coupon_rate {
            params.coupon_rate = coupon_rate;
        }
        if self.mortgage_rate.is_some() {
            params.mortgage_rate = self.mortgage_rate;
        }

        params.validate()?;
        Ok(params)
    }
}

/// Arguments for the treasury-vs-mortgage simulation
#[derive(Args, Debug, Clone, Default)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Directory that receives svb_duration_analysis.png
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Skip writing the chart image
    #[arg(long)]
    pub no_chart: bool,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.scenario.resolve()?;
    let result = simulation::run_simulation(&params)?;
    let mut value = serde_json::to_value(&result)?;

    if !args.no_chart {
        match chart::save_chart(&args.output_dir, &result.result.bonds()) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "chart saved");
                if let Value::Object(ref mut map) = value {
                    map.insert("chart".into(), Value::String(path.display().to_string()));
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "chart not saved");
                eprintln!("{}: could not save chart: {}", "error".red().bold(), e);
            }
        }
    }

    Ok(value)
}
