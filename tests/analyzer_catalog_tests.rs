use std::collections::HashMap;

use api_hunter::analyzer;
use api_hunter::fetch::FetchedResponse;
use api_hunter::model::ThreatLevel;

fn response(status: u16, headers: &[(&str, &str)], body: &str, url: &str) -> FetchedResponse {
    let mut map = HashMap::new();
    for (k, v) in headers {
        map.insert(k.to_ascii_lowercase(), v.to_string());
    }
    FetchedResponse {
        status,
        headers: map,
        body: body.as_bytes().to_vec().into(),
        effective_url: url.to_string(),
    }
}

#[test]
fn https_analyzer_flags_plain_http() {
    let r = response(200, &[], "", "http://example.com/");
    let finding = analyzer::lookup("https").unwrap().analyze(&r);
    assert_eq!(finding.threat_level, ThreatLevel::High);
}

#[test]
fn hsts_analyzer_accepts_long_max_age() {
    let r = response(200, &[("strict-transport-security", "max-age=31536000")], "", "https://example.com/");
    let finding = analyzer::lookup("hsts").unwrap().analyze(&r);
    assert_eq!(finding.threat_level, ThreatLevel::None);
}

#[test]
fn cors_analyzer_flags_wildcard_with_credentials_as_critical() {
    let r = response(
        200,
        &[
            ("access-control-allow-origin", "*"),
            ("access-control-allow-credentials", "true"),
        ],
        "",
        "https://example.com/",
    );
    let finding = analyzer::lookup("cors").unwrap().analyze(&r);
    assert_eq!(finding.threat_level, ThreatLevel::Critical);
}

#[test]
fn every_registered_analyzer_id_resolves_through_lookup() {
    for id in analyzer::analyzer_ids() {
        assert!(analyzer::lookup(&id).is_some(), "analyzer {id} missing from catalog lookup");
    }
}
