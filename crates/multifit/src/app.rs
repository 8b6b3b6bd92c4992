//! Application entry point and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use multifit_cli::output::write_predictions;
use multifit_cli::presenter::SummaryPresenter;
use multifit_cli::table::TableReporter;
use multifit_cli::ui;
use multifit_core::constants::DEFAULT_MEAN_WINDOW;
use multifit_core::error::ForecastError;
use multifit_core::registry::{DefaultFactory, ModelerFactory};
use multifit_orchestration::interfaces::BarrierReporter;
use multifit_orchestration::orchestrator::run_with_watchdog;

use crate::config::AppConfig;
use crate::input::{read_series_file, InputFormat};

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        multifit_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    run_forecast(config)
}

fn run_forecast(config: &AppConfig) -> Result<()> {
    let opts = config.run_options()?;
    let layout = config.prediction_layout()?;
    let input = config
        .input
        .as_ref()
        .ok_or_else(|| ForecastError::Config("no input file given".into()))?;

    let factory = DefaultFactory::with_params(config.season, DEFAULT_MEAN_WINDOW);
    let modeler = factory.get(&config.model)?;

    let format = InputFormat {
        id_column: config.id_column.clone(),
        value_prefix: config.value_prefix.clone(),
    };
    let series = read_series_file(input, &format)?;
    info!(path = %input.display(), groups = series.len(), "loaded input");

    if !config.quiet {
        ui::print_begin(&format!(
            "Fitting {} groups with {} on {} worker(s)",
            series.len(),
            modeler.name(),
            opts.workers
        ));
    }

    let reporter: Arc<dyn BarrierReporter> = Arc::new(TableReporter::stdout(config.status));
    let output = run_with_watchdog(series, modeler, &opts, reporter)?;

    if let Some(path) = &config.output {
        write_predictions(path, &output.results, opts.horizon, layout)
            .with_context(|| format!("failed to write predictions to {}", path.display()))?;
        if !config.quiet {
            ui::print_notification(&format!("Predictions written to {}", path.display()));
        }
    }

    SummaryPresenter::new(config.quiet).present_summary(&output.summary);
    Ok(())
}
