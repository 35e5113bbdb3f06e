//! Reporter Resolver (spec §4.H): picks which concrete `Reporter` runs a
//! plan, validating that every strategy in the plan agrees on a preference.

use crate::config::RuntimeConfig;
use crate::error::ScanError;
use crate::reporter::backend::BackendReporter;
use crate::reporter::cli::CliReporter;
use crate::reporter::help::HelpReporter;
use crate::reporter::Reporter;
use crate::strategy::ReporterPreference;

pub fn resolve(strategies: &[&'static dyn crate::strategy::Strategy], config: &RuntimeConfig) -> Result<Box<dyn Reporter>, ScanError> {
    let mut preferences = strategies.iter().map(|s| s.preferred_reporter());
    let first = preferences
        .next()
        .ok_or_else(|| ScanError::non_retryable(100, "cannot resolve a reporter for an empty strategy list", "resolver"))?;

    if preferences.any(|p| p != first) {
        return Err(ScanError::non_retryable(100, "strategies disagree on preferred reporter type", "resolver"));
    }

    match first {
        ReporterPreference::Help => Ok(Box::new(HelpReporter)),
        ReporterPreference::Cli | ReporterPreference::Backend => {
            if let Some(sink_url) = &config.result_sink_url {
                Ok(Box::new(BackendReporter::new(sink_url.clone(), config.clone())))
            } else {
                Ok(Box::new(CliReporter))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::header_scan::HeaderScanStrategy;
    use crate::strategy::help::HelpStrategy;

    #[test]
    fn rejects_empty_strategy_list() {
        let config = RuntimeConfig::default();
        let err = resolve(&[], &config).unwrap_err();
        assert_eq!(err.code, 100);
    }

    #[test]
    fn mixed_help_and_scan_strategies_disagree() {
        let scan: &'static HeaderScanStrategy = Box::leak(Box::new(HeaderScanStrategy::default()));
        let help: &'static HelpStrategy = Box::leak(Box::new(HelpStrategy));
        let strategies: Vec<&'static dyn crate::strategy::Strategy> = vec![scan, help];
        let config = RuntimeConfig::default();
        let err = resolve(&strategies, &config).unwrap_err();
        assert_eq!(err.code, 100);
    }
}
