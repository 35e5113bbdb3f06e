//! The common-case strategy: fetch the target once and fan a list of
//! response analyzers out over the shared result (spec §4.F).
//!
//! Grounded on the teacher's `runner.rs` probe fan-out (spawn one task per
//! unit of work, `buffer_unordered`/wait-group style draining, forward
//! results over an mpsc channel) — generalized here from "one task per
//! candidate URL" to "one task per analyzer over one shared response".

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::analyzer;
use crate::config::RuntimeConfig;
use crate::error::ScanError;
use crate::fetch::{FetchOptions, Fetcher};
use crate::model::ResultEnvelope;
use crate::sync::{Sleeper, WaitGroup};

use super::{ReporterPreference, Strategy, StrategyContext};

/// Analyzer ids that need to observe the unencrypted protocol behavior
/// (redirect-to-https, HSTS header presence) rather than the steady-state
/// https:// response (spec §4.F.1).
const FORCES_HTTP: &[&str] = &["https", "hsts"];

pub struct HeaderScanStrategy {
    fetcher: Fetcher,
    sleeper: Box<dyn Sleeper>,
}

impl HeaderScanStrategy {
    pub fn new(fetcher: Fetcher, sleeper: Box<dyn Sleeper>) -> Self {
        Self { fetcher, sleeper }
    }
}

impl Default for HeaderScanStrategy {
    fn default() -> Self {
        Self::new(Fetcher::default(), Box::new(crate::sync::TokioSleeper))
    }
}

/// Formats the effective URL from a bare host (spec §4.F.1): an explicit
/// scheme on the raw target is a non-retryable input error, and the scheme
/// actually used is forced to `http://` when any requested analyzer needs to
/// observe the unencrypted protocol behavior, `https://` otherwise.
fn with_scheme(target: &str, args: &[String]) -> Result<String, ScanError> {
    if target.starts_with("http://") || target.starts_with("https://") {
        return Err(ScanError::non_retryable(100, "target must not include an explicit scheme", "strategy"));
    }
    let scheme = if args.iter().any(|a| FORCES_HTTP.contains(&a.as_str())) { "http" } else { "https" };
    Ok(format!("{scheme}://{target}"))
}

#[async_trait]
impl Strategy for HeaderScanStrategy {
    fn name(&self) -> &'static str {
        "tests"
    }

    fn preferred_reporter(&self) -> ReporterPreference {
        ReporterPreference::Cli
    }

    async fn execute(
        &self,
        context: StrategyContext,
        config: &RuntimeConfig,
        out: Sender<ResultEnvelope>,
        wg: WaitGroup,
    ) -> Result<(), ScanError> {
        // Resolve every requested analyzer up front so an unknown id is a
        // fatal error before any network access happens (spec §8 S4: no
        // end-flag POST emitted for an unknown analyzer id).
        let mut analyzers = Vec::with_capacity(context.args.len());
        for analyzer_id in &context.args {
            let analyzer = analyzer::lookup(analyzer_id)
                .ok_or_else(|| ScanError::non_retryable(100, format!("unknown analyzer id: {analyzer_id}"), "strategy"))?;
            analyzers.push(analyzer);
        }

        let url = with_scheme(&context.target, &context.args)?;
        let options = FetchOptions::new().with_anti_bot(context.anti_bot);

        let response = match self.fetcher.get(&url, &options, config).await {
            Ok(r) => r,
            Err(e) if e.retryable => {
                self.sleeper.sleep(config.fetch_retry_delay).await;
                self.fetcher.get(&url, &options, config).await?
            }
            Err(e) => return Err(e),
        };

        for analyzer in analyzers {
            let guard = wg.guard();
            let out = out.clone();
            let response = response.clone();
            tokio::spawn(async move {
                let finding = analyzer.analyze(&response);
                let _ = out.send(ResultEnvelope::Finding(finding)).await;
                drop(guard);
            });
        }

        Ok(())
    }
}
