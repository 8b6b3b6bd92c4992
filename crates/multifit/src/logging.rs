//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset, empty or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "warn";

/// Filter from `RUST_LOG`-style directives, falling back to `warn`.
#[must_use]
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber. Logs go to stderr; stdout carries the
/// progress table.
pub fn init() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::{Layer, Registry};

    fn max_level(filter: &EnvFilter) -> Option<LevelFilter> {
        Layer::<Registry>::max_level_hint(filter)
    }

    #[test]
    fn rust_log_level_is_honoured() {
        assert_eq!(max_level(&env_filter(Some("debug"))), Some(LevelFilter::DEBUG));
        assert_eq!(max_level(&env_filter(Some("trace"))), Some(LevelFilter::TRACE));
        assert_eq!(max_level(&env_filter(Some("error"))), Some(LevelFilter::ERROR));
    }

    #[test]
    fn target_directives_are_kept() {
        let filter = env_filter(Some("multifit_orchestration=debug"));
        assert_eq!(max_level(&filter), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn falls_back_to_warn() {
        assert_eq!(max_level(&env_filter(None)), Some(LevelFilter::WARN));
        assert_eq!(max_level(&env_filter(Some(""))), Some(LevelFilter::WARN));
        assert_eq!(max_level(&env_filter(Some("multifit=loud"))), Some(LevelFilter::WARN));
    }
}
