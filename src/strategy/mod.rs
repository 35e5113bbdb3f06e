//! Strategy contract (spec §4.F): one unit of scan work, selected by name
//! from the Execution Plan and driven by the Job Orchestrator.
//!
//! Grounded on the teacher's `runner.rs` fan-out shape (spawn one task per
//! unit of work, report back over a channel, release a wait-group entry per
//! task) generalized from "fan out HTTP probes across hosts" to "fan out
//! analyzers across one shared response".

pub mod header_scan;
pub mod help;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::config::RuntimeConfig;
use crate::error::ScanError;
use crate::model::ResultEnvelope;
use crate::sync::WaitGroup;

/// Which reporter family a strategy expects to publish through. Scan
/// strategies return `Cli` or `Backend` interchangeably — the actual choice
/// between the two is made by the Reporter Resolver based on whether a
/// result-sink URL is configured (spec §4.H); only `Help` is special-cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterPreference {
    Cli,
    Backend,
    Help,
}

/// One named unit of scan work (spec §3 `StrategyContext`: target, args,
/// antiBotDetection).
#[derive(Debug, Clone, Default)]
pub struct StrategyContext {
    pub target: String,
    pub args: Vec<String>,
    pub anti_bot: bool,
}

#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn preferred_reporter(&self) -> ReporterPreference;

    async fn execute(
        &self,
        context: StrategyContext,
        config: &RuntimeConfig,
        out: Sender<ResultEnvelope>,
        wg: WaitGroup,
    ) -> Result<(), ScanError>;
}
