//! # Field Optimizer Application Entry Point
//!
//! This binary loads a field configuration, computes the cost-minimizing
//! working speed (plus an optional custom-speed analysis) and presents the
//! result as a text report, JSON, ASCII charts or a PBM bitmap chart.
//! With `--advise` it also asks a chat-completions endpoint for suggestions.
//!
//! When no speed in range meets the budget the report and charts are still
//! written (the custom-speed analysis stays valid) and the process exits
//! with the error.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use field_cost_lib::config::{Config, DEFAULT_CONFIG_PATH};
use field_cost_lib::plan::PlanCache;
use field_cost_lib::report::{self, Report};
use field_cost_lib::{advisor, chart, renderer};

/// Tractor field-operation cost calculator
#[derive(Parser, Debug)]
#[command(name = "field-optimizer", version, about)]
struct CliArgs {
    /// Configuration file (missing file means built-in defaults)
    #[arg(short, long, env = "FIELD_OPTIMIZER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Also analyse this working speed (km/h): tractors needed, time and cost
    #[arg(short, long)]
    speed: Option<f64>,

    /// Override the number of speed samples searched and plotted
    #[arg(long)]
    samples: Option<usize>,

    /// Print speed-vs-coverage and speed-vs-cost charts to the terminal
    #[arg(long)]
    ascii: bool,

    /// Write both charts to a PBM image
    #[arg(long, value_name = "FILE")]
    plot: Option<PathBuf>,

    /// Print the full plan as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Ask the configured chat-completions endpoint for an operational plan
    #[arg(long)]
    advise: bool,

    /// Write the effective configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    write_config: Option<PathBuf>,

    /// Print reference fuel figures for every operation preset and exit
    #[arg(long)]
    operations: bool,
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for reports and JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    if args.operations {
        print!("{}", report::operations_table());
        return Ok(());
    }

    let mut config = Config::load_from_path(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(samples) = args.samples {
        config.speed.sample_count = samples;
    }

    if let Some(path) = &args.write_config {
        config
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        return Ok(());
    }

    let params = config.to_parameters().context("invalid parameters")?;
    let sample_count = config.speed.sample_count;

    let mut cache = PlanCache::new();
    let plan = cache
        .plan(&params, sample_count, args.speed)
        .context("no plan could be computed")?;
    match &plan.optimum {
        Ok(found) => info!(
            speed = found.result.speed,
            total_cost = found.result.total_cost,
            "optimal speed found"
        ),
        Err(error) => warn!(%error, "no feasible speed in range"),
    }

    let operation = config.fuel_curve.operation();
    let report = Report::new(&params, sample_count, plan).with_operation(operation);
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    let optimum_speed = plan.optimum_speed();
    if args.ascii {
        println!();
        renderer::draw_ascii(&plan.curves, optimum_speed);
    }

    if let Some(path) = &args.plot {
        let bitmap = chart::render_curves(&plan.curves, optimum_speed);
        fs::write(path, bitmap.to_pbm())
            .with_context(|| format!("writing chart {}", path.display()))?;
        info!(path = %path.display(), "chart written");
    }

    if args.advise {
        // Advice is optional: failures are reported but do not fail the run
        match advisor::api_key_from_env(&config.advisor) {
            Ok(api_key) => {
                let prompt = advisor::build_prompt(&params, plan, operation);
                let rt = tokio::runtime::Runtime::new()?;
                let client = reqwest::Client::new();
                let advice = rt.block_on(advisor::request_advice(
                    &client,
                    &config.advisor,
                    &api_key,
                    &prompt,
                ));
                match advice {
                    Ok(text) => {
                        println!("\nAdvisor suggestions:\n{text}");
                    }
                    Err(error) => warn!(%error, "advice request failed"),
                }
            }
            Err(error) => warn!(%error, "skipping advice"),
        }
    }

    if let Err(error) = &plan.optimum {
        return Err(error.clone()).context("no optimal speed");
    }
    Ok(())
}
