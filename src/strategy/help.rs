//! Help-mode strategies: emit a single `HelpPayload` with no network access
//! (spec §4.D "distinct Help formatter", §4.F help strategies).

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::config::RuntimeConfig;
use crate::error::ScanError;
use crate::model::{HelpPayload, ResultEnvelope};
use crate::sync::WaitGroup;

use super::{ReporterPreference, Strategy, StrategyContext};

pub struct HelpStrategy;

#[async_trait]
impl Strategy for HelpStrategy {
    fn name(&self) -> &'static str {
        "help"
    }

    fn preferred_reporter(&self) -> ReporterPreference {
        ReporterPreference::Help
    }

    async fn execute(
        &self,
        _context: StrategyContext,
        _config: &RuntimeConfig,
        out: Sender<ResultEnvelope>,
        wg: WaitGroup,
    ) -> Result<(), ScanError> {
        let guard = wg.guard();
        let payload = HelpPayload {
            header: "api-hunter — web API security scanner".to_string(),
            sections: vec![
                (
                    "test".to_string(),
                    "--target <host> --tests <id...> [--userAgent <ua>] [--antiBotDetection] [--taskId <id>]".to_string(),
                ),
                ("json".to_string(), "accepts a ParameterDocument on stdin".to_string()),
                ("rawjson".to_string(), "accepts a raw parameter array on stdin".to_string()),
                ("help".to_string(), "prints this message".to_string()),
            ],
        };
        let _ = out.send(ResultEnvelope::Help(payload)).await;
        drop(guard);
        Ok(())
    }
}
