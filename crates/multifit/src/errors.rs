//! Error handling and exit codes.

use multifit_core::constants::exit_codes;
use multifit_core::error::ForecastError;

use crate::input::InputError;

/// Exit code for a run error.
pub fn handle_error(err: &ForecastError) -> i32 {
    match err {
        ForecastError::FitFailure { .. } => exit_codes::ERROR_GENERIC,
        ForecastError::StalledBarrier { .. } => exit_codes::ERROR_TIMEOUT,
        ForecastError::InvalidPartitionCount { .. }
        | ForecastError::DuplicateGroup(_)
        | ForecastError::DuplicateGroupResult(_)
        | ForecastError::InvalidCompletion { .. } => exit_codes::ERROR_INVARIANT,
        ForecastError::Config(_) => exit_codes::ERROR_CONFIG,
        ForecastError::Cancelled => exit_codes::ERROR_CANCELED,
    }
}

/// Process exit code for any application error.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let code = if let Some(e) = err.downcast_ref::<ForecastError>() {
        handle_error(e)
    } else if err.downcast_ref::<InputError>().is_some() {
        exit_codes::ERROR_CONFIG
    } else {
        exit_codes::ERROR_GENERIC
    };
    u8::try_from(code).unwrap_or(1)
}
