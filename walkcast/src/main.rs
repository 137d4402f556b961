use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use series_math::BoundaryPolicy;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walk_forecast::data::{synthetic_daily_series, DEFAULT_TARGET_COLUMN};
use walk_forecast::{ForecastConfig, MissingObservationPolicy, ModelKind};
use walkcast::app::DEFAULT_CHART_PATH;
use walkcast::{App, AppConfig, Result};

#[derive(Parser)]
#[command(name = "walkcast")]
#[command(about = "Walk-forward forecasting of daily gross postings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast the last 30 days of a series one day at a time
    Process {
        /// Workbook (.xlsx, .xls, .ods) or CSV file with `date` and `gross_posted` columns
        #[arg(short, long)]
        input: PathBuf,

        /// Last date of the initial training set (default: last date minus 30 days)
        #[arg(long)]
        cutoff: Option<NaiveDate>,

        /// Where to write the chart
        #[arg(long, default_value = DEFAULT_CHART_PATH)]
        chart: PathBuf,

        #[arg(short, long, value_enum, default_value_t = ModelArg::GradientBoosting)]
        model: ModelArg,

        /// Seed for the boosting model
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// How to fill the trend at the series edges
        #[arg(long, value_enum, default_value_t = BoundaryArg::Extrapolate)]
        boundary: BoundaryArg,

        /// What to do with horizon dates that have no observation
        #[arg(long, value_enum, default_value_t = MissingArg::Fail)]
        on_missing: MissingArg,

        /// Write the projected amounts report to this file (no clipboard)
        #[arg(long, value_name = "FILE")]
        copy_to: Option<PathBuf>,

        /// Write date, forecast and actual rows to this CSV file
        #[arg(long)]
        export_csv: Option<PathBuf>,

        /// Print the whole run as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Write a synthetic daily series to try the pipeline on
    Demo {
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value_t = 400)]
        days: usize,

        #[arg(long, default_value_t = 7)]
        seed: u64,

        /// First date of the series
        #[arg(long, default_value = "2022-01-01")]
        start: NaiveDate,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    GradientBoosting,
    Linear,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::GradientBoosting => ModelKind::GradientBoosting,
            ModelArg::Linear => ModelKind::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BoundaryArg {
    Extrapolate,
    Propagate,
}

impl From<BoundaryArg> for BoundaryPolicy {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::Extrapolate => BoundaryPolicy::Extrapolate,
            BoundaryArg::Propagate => BoundaryPolicy::Propagate,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MissingArg {
    Fail,
    Skip,
}

impl From<MissingArg> for MissingObservationPolicy {
    fn from(arg: MissingArg) -> Self {
        match arg {
            MissingArg::Fail => MissingObservationPolicy::Fail,
            MissingArg::Skip => MissingObservationPolicy::Skip,
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walkcast=info,walk_forecast=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Process {
            input,
            cutoff,
            chart,
            model,
            seed,
            boundary,
            on_missing,
            copy_to,
            export_csv,
            json,
        } => {
            let mut forecast = ForecastConfig::default()
                .with_model(model.into())
                .with_seed(seed)
                .with_boundary(boundary.into())
                .with_missing_policy(on_missing.into());
            if let Some(cutoff) = cutoff {
                forecast = forecast.with_cutoff(cutoff);
            }

            let mut app = App::new(AppConfig::new(forecast).with_chart_path(chart));
            let outcome = app.process(&input)?;

            if json {
                println!("{}", outcome.run.to_json()?);
            } else {
                print!("{}", outcome.report);
                if let Some(accuracy) = &outcome.run.accuracy {
                    println!();
                    print!("{}", accuracy);
                }
            }

            match &outcome.chart {
                Ok(path) => eprintln!("Chart saved to {}.", path.display()),
                Err(e) => eprintln!("warning: {}", e),
            }

            if let Some(path) = copy_to {
                app.copy_report(&outcome.report, &path)?;
                eprintln!("Projected amounts copied to {}.", path.display());
            }
            if let Some(path) = export_csv {
                outcome.run.records.write_csv(&path)?;
                eprintln!("Forecast records written to {}.", path.display());
            }
            Ok(())
        }
        Commands::Demo {
            output,
            days,
            seed,
            start,
        } => {
            let series = synthetic_daily_series(DEFAULT_TARGET_COLUMN, start, days, seed)?;
            series.write_csv(&output)?;
            info!(days, seed, path = %output.display(), "wrote synthetic series");
            eprintln!("Wrote {} days to {}.", series.len(), output.display());
            Ok(())
        }
    }
}
