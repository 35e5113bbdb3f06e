use api_hunter::config::RuntimeConfig;
use api_hunter::{orchestrator, plan};

#[tokio::test]
async fn default_help_plan_runs_end_to_end_with_no_sink() {
    let config = RuntimeConfig::default();
    let execution_plan = plan::build_help_plan(&[], false).unwrap();
    orchestrator::run(execution_plan, &config).await.unwrap();
}

#[tokio::test]
async fn help_plan_rejects_unknown_topic() {
    let err = plan::build_help_plan(&["bogus-topic".to_string()], false).unwrap_err();
    assert_eq!(err.code, 304);
}

#[test]
fn help_plan_is_rejected_once_a_result_sink_is_configured() {
    let err = plan::build_help_plan(&[], true).unwrap_err();
    assert_eq!(err.code, 100);
}
