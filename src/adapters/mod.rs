pub mod branding;
#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
use clap::Parser;

/// Initialise the tracing subscriber. `RUST_LOG` wins over `level`.
#[cfg(feature = "cli")]
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

#[cfg(feature = "cli")]
pub fn run() -> Result<(), crate::error::AppError> {
    use crate::adapters::branding::load_branding;
    use crate::adapters::cli::{Args, CliOutput, parse_inputs};
    use crate::decay::chart::chart_series;
    use crate::decay::predictor::predict;

    let args = Args::parse();
    init_logging(&args.log_level);

    let (inputs, settings) = parse_inputs(&args)?;
    tracing::debug!(?inputs, ?settings, "resolved run configuration");

    let branding = load_branding(&settings.logo_path);
    let report = predict(&inputs, &settings);
    let chart = chart_series(&report);

    crate::adapters::cli::print_output(
        &CliOutput {
            branding: &branding,
            report: &report,
            chart: &chart,
        },
        &args,
    )?;

    Ok(())
}
