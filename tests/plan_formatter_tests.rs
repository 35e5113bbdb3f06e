use api_hunter::param::{validate, CommandParameter};
use api_hunter::plan::build_scan_plan;
use api_hunter::{analyzer, registry};

#[test]
fn validated_tests_parameter_resolves_to_the_registered_tests_strategy() {
    let ids = analyzer::analyzer_ids();
    let params = vec![
        CommandParameter::new("--target", vec!["example.com".into()]),
        CommandParameter::new("--tests", vec!["https".into(), "cors".into()]),
    ];

    validate(&params, false, &ids).unwrap();

    let execution_plan = build_scan_plan(&params, false).unwrap();
    assert_eq!(execution_plan.strategies.len(), 1);
    assert_eq!(execution_plan.strategies[0].name(), "tests");
    assert!(registry::lookup_scan_strategy("tests").is_some());

    let context = execution_plan.contexts.get("tests").unwrap();
    assert_eq!(context.target, "example.com");
    assert_eq!(context.args, vec!["https".to_string(), "cors".to_string()]);
}

#[test]
fn anti_bot_flag_propagates_into_every_strategy_context() {
    let ids = analyzer::analyzer_ids();
    let params = vec![
        CommandParameter::new("--target", vec!["example.com".into()]),
        CommandParameter::new("--tests", vec!["https".into()]),
        CommandParameter::new("--antiBotDetection", vec![]),
    ];

    validate(&params, false, &ids).unwrap();
    let execution_plan = build_scan_plan(&params, false).unwrap();

    assert!(execution_plan.anti_bot_flag);
    assert!(execution_plan.contexts.get("tests").unwrap().anti_bot);
}
