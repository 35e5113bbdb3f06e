//! `hsts` analyzer: is Strict-Transport-Security present with a sane max-age.
//!
//! Grounded on the HSTS check inside the teacher's
//! `analyze/security_headers.rs::analyze` (missing-HSTS scoring penalty),
//! pulled out into its own analyzer since spec.md's catalog treats it as a
//! distinct registered id from the rest of the header bundle.

use crate::fetch::FetchedResponse;
use crate::model::{Finding, ThreatLevel};

use super::Analyzer;

pub struct HstsAnalyzer;

impl Analyzer for HstsAnalyzer {
    fn id(&self) -> &'static str {
        "hsts"
    }

    fn analyze(&self, response: &FetchedResponse) -> Finding {
        match response.header("strict-transport-security") {
            None => Finding::new("hsts", 95, ThreatLevel::Medium, "missing Strict-Transport-Security header"),
            Some(value) => {
                let max_age = parse_max_age(value);
                match max_age {
                    Some(age) if age < 15_552_000 => Finding::new(
                        "hsts",
                        80,
                        ThreatLevel::Low,
                        format!("HSTS max-age is too short ({age}s, recommended >= 15552000s)"),
                    )
                    .with_metadata(serde_json::json!({"max_age": age})),
                    Some(age) => Finding::new("hsts", 100, ThreatLevel::None, "HSTS present with adequate max-age")
                        .with_metadata(serde_json::json!({"max_age": age})),
                    None => Finding::new("hsts", 60, ThreatLevel::Low, "HSTS header present but max-age is unparseable")
                        .with_metadata(serde_json::json!({"raw": value})),
                }
            }
        }
    }
}

fn parse_max_age(header_value: &str) -> Option<u64> {
    header_value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("max-age="))
        .and_then(|v| v.parse().ok())
}
