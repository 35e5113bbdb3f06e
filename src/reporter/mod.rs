//! Reporter contract and the three concrete reporters (spec §4.H/I/J/K).

pub mod backend;
pub mod cli;
pub mod help;
pub mod resolver;

use async_trait::async_trait;
use tokio::sync::mpsc::Receiver;

use crate::error::ScanError;
use crate::model::ResultEnvelope;

/// Drains the result channel to completion. The Job Orchestrator's only job
/// once every strategy's wait-group has drained is to close the channel
/// (drop its sender) — whatever end-of-stream marker a reporter's own wire
/// format needs (the Backend reporter's end-flag POST; the Help reporter's
/// presence check) is the reporter's own responsibility to emit after the
/// channel closes (spec §4.L).
#[async_trait]
pub trait Reporter: Send + Sync {
    async fn run(&self, target: &str, task_id: &str, rx: Receiver<ResultEnvelope>) -> Result<usize, ScanError>;
}
