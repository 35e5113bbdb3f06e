//! Execution Plan Formatter (spec §4.D): turns a validated parameter list
//! into the ordered list of strategies the Job Orchestrator will run, plus
//! the per-strategy context each needs.
//!
//! New, grounded on the teacher's `analyze/mod.rs` re-export style for how
//! a flat name resolves to a concrete implementation — here via
//! `registry::lookup_scan_strategy` instead of a static `match`.

use std::collections::HashMap;

use crate::error::ScanError;
use crate::param::{CommandParameter, PARAM_ANTI_BOT, PARAM_TARGET, PARAM_TASK_ID};
use crate::registry;
use crate::strategy::{Strategy, StrategyContext};

#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    pub target: String,
    pub anti_bot_flag: bool,
    pub strategies: Vec<&'static dyn Strategy>,
    pub contexts: HashMap<&'static str, StrategyContext>,
    pub task_id: String,
    pub is_help: bool,
}

/// Builds a scan plan: one `(strategy, context)` pair per parameter whose
/// name is a registered scan-strategy name, appended in input order (spec
/// §4.D step 4). Repeated names push a second `Execute` invocation but share
/// the same, last-written context (spec.md §9 Open Question #1 decision).
pub fn build_scan_plan(params: &[CommandParameter], sink_configured: bool) -> Result<ExecutionPlan, ScanError> {
    let target = params
        .iter()
        .find(|p| p.bare_name() == PARAM_TARGET)
        .and_then(|p| p.args.first())
        .cloned()
        .ok_or_else(|| ScanError::non_retryable(100, "missing target parameter", "formatter"))?;

    let anti_bot_flag = params.iter().any(|p| p.bare_name() == PARAM_ANTI_BOT);

    let task_id = params
        .iter()
        .find(|p| p.bare_name() == PARAM_TASK_ID)
        .and_then(|p| p.args.first())
        .cloned()
        .unwrap_or_default();

    if sink_configured && task_id.trim().is_empty() {
        return Err(ScanError::non_retryable(100, "taskId must be non-empty when a result sink is configured", "formatter"));
    }

    let mut strategies: Vec<&'static dyn Strategy> = Vec::new();
    let mut contexts: HashMap<&'static str, StrategyContext> = HashMap::new();

    for p in params {
        let Some(strategy) = registry::lookup_scan_strategy(p.bare_name()) else {
            continue;
        };
        strategies.push(strategy);
        contexts.insert(strategy.name(), StrategyContext {
            target: target.clone(),
            args: p.args.clone(),
            anti_bot: anti_bot_flag,
        });
    }

    if strategies.is_empty() {
        return Err(ScanError::non_retryable(100, "execution plan has no strategies", "formatter"));
    }

    Ok(ExecutionPlan {
        target,
        anti_bot_flag,
        strategies,
        contexts,
        task_id,
        is_help: false,
    })
}

/// Builds a help-mode plan. Help mode is fatal-rejected when a result sink
/// is configured (spec §4.D invariant) since help output has nowhere
/// meaningful to be routed on the backend sink.
pub fn build_help_plan(names: &[String], sink_configured: bool) -> Result<ExecutionPlan, ScanError> {
    if sink_configured {
        return Err(ScanError::non_retryable(100, "help mode is incompatible with a configured result sink", "formatter"));
    }

    let mut strategies: Vec<&'static dyn Strategy> = Vec::new();
    if names.is_empty() {
        if let Some(s) = registry::lookup_help_strategy("help") {
            strategies.push(s);
        }
    } else {
        for name in names {
            let Some(s) = registry::lookup_help_strategy(name) else {
                return Err(ScanError::non_retryable(304, format!("unknown help topic: {name}"), "formatter"));
            };
            strategies.push(s);
        }
    }

    if strategies.is_empty() {
        return Err(ScanError::non_retryable(100, "execution plan has no strategies", "formatter"));
    }

    Ok(ExecutionPlan {
        target: String::new(),
        anti_bot_flag: false,
        strategies,
        contexts: HashMap::new(),
        task_id: String::new(),
        is_help: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::CommandParameter;

    #[test]
    fn builds_plan_with_one_tests_strategy() {
        let params = vec![
            CommandParameter::new("--target", vec!["example.com".into()]),
            CommandParameter::new("--tests", vec!["https".into()]),
        ];
        let plan = build_scan_plan(&params, false).unwrap();
        assert_eq!(plan.target, "example.com");
        assert_eq!(plan.strategies.len(), 1);
        assert!(!plan.is_help);
    }

    #[test]
    fn rejects_missing_task_id_when_sink_configured() {
        let params = vec![
            CommandParameter::new("--target", vec!["example.com".into()]),
            CommandParameter::new("--tests", vec!["https".into()]),
        ];
        let err = build_scan_plan(&params, true).unwrap_err();
        assert_eq!(err.code, 100);
    }

    #[test]
    fn rejects_empty_strategy_list() {
        let params = vec![CommandParameter::new("--target", vec!["example.com".into()])];
        let err = build_scan_plan(&params, false).unwrap_err();
        assert_eq!(err.code, 100);
    }

    #[test]
    fn help_plan_rejects_configured_sink() {
        let err = build_help_plan(&[], true).unwrap_err();
        assert_eq!(err.code, 100);
    }

    #[test]
    fn help_plan_defaults_to_help_strategy() {
        let plan = build_help_plan(&[], false).unwrap();
        assert!(plan.is_help);
        assert_eq!(plan.strategies.len(), 1);
    }
}
