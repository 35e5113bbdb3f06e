//! Job Orchestrator (spec §4.L): wires a resolved plan into a running scan.
//!
//! Grounded on the teacher's `runner.rs::run_scan` top-level wiring (spawn
//! workers, wait on completion, report counts) generalized to plan →
//! reporter → strategies → wait-group → printed failure count.

use crate::config::RuntimeConfig;
use crate::error::ScanError;
use crate::plan::ExecutionPlan;
use crate::reporter::resolver;
use crate::sync::WaitGroup;

const RESULT_CHANNEL_CAPACITY: usize = 100;

pub async fn run(plan: ExecutionPlan, config: &RuntimeConfig) -> Result<(), ScanError> {
    if plan.strategies.is_empty() {
        return Err(ScanError::non_retryable(100, "empty strategy list", "runner"));
    }

    let (tx, rx) = tokio::sync::mpsc::channel(RESULT_CHANNEL_CAPACITY);
    let wg = WaitGroup::new();

    let reporter = resolver::resolve(&plan.strategies, config)?;
    let target = plan.target.clone();
    let task_id = plan.task_id.clone();
    let reporter_handle = tokio::spawn(async move { reporter.run(&target, &task_id, rx).await });

    for strategy in &plan.strategies {
        let context = plan.contexts.get(strategy.name()).cloned().unwrap_or_default();
        strategy.execute(context, config, tx.clone(), wg.clone()).await?;
    }

    wg.wait().await;
    drop(tx);

    let failures = reporter_handle
        .await
        .map_err(|e| ScanError::non_retryable(100, format!("reporter task panicked: {e}"), "runner"))??;

    if failures > 0 {
        eprintln!("{failures} permanent upload failures");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::build_help_plan;

    #[tokio::test]
    async fn runs_help_plan_end_to_end() {
        let plan = build_help_plan(&[], false).unwrap();
        let config = RuntimeConfig::default();
        run(plan, &config).await.unwrap();
    }
}
