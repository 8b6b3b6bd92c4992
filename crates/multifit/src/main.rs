//! multifit: parallel per-group time-series forecasting.

use std::process::ExitCode;

use multifit_lib::{app, config, errors, logging};

fn main() -> ExitCode {
    logging::init();

    let config = config::AppConfig::parse();
    match app::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            multifit_cli::ui::print_error(&format!("{err:#}"));
            ExitCode::from(errors::exit_code(&err))
        }
    }
}
