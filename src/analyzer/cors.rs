//! `cors` analyzer: CORS header misconfiguration checks.
//!
//! Ported from the teacher's `analyze/cors_checker.rs`
//! (`CorsAnalysis::analyze`) — same wildcard/credentials/null-origin and
//! dangerous-method checks, re-expressed as a `Finding`.

use std::collections::HashMap;

use crate::fetch::FetchedResponse;
use crate::model::{Finding, ThreatLevel};

use super::Analyzer;

pub struct CorsAnalyzer;

impl Analyzer for CorsAnalyzer {
    fn id(&self) -> &'static str {
        "cors"
    }

    fn analyze(&self, response: &FetchedResponse) -> Finding {
        let analysis = analyze_cors(&response.headers);

        if !analysis.has_cors {
            return Finding::new("cors", 90, ThreatLevel::None, "no CORS headers present");
        }

        let threat_level = if analysis
            .vulnerabilities
            .iter()
            .any(|v| v.starts_with("CRITICAL"))
        {
            ThreatLevel::Critical
        } else if analysis.is_misconfigured {
            ThreatLevel::Medium
        } else {
            ThreatLevel::None
        };

        let description = if analysis.vulnerabilities.is_empty() {
            "CORS configuration looks reasonable".to_string()
        } else {
            analysis.vulnerabilities.join("; ")
        };

        Finding::new("cors", 85, threat_level, description).with_metadata(serde_json::json!({
            "allow_origin": analysis.allow_origin,
            "allow_credentials": analysis.allow_credentials,
            "allow_methods": analysis.allow_methods,
            "vulnerabilities": analysis.vulnerabilities,
        }))
    }
}

struct CorsAnalysis {
    has_cors: bool,
    allow_origin: Option<String>,
    allow_credentials: bool,
    allow_methods: Vec<String>,
    is_misconfigured: bool,
    vulnerabilities: Vec<String>,
}

fn analyze_cors(headers: &HashMap<String, String>) -> CorsAnalysis {
    let mut vulnerabilities = Vec::new();

    let allow_origin = headers.get("access-control-allow-origin").cloned();
    let has_cors = allow_origin.is_some();

    let allow_credentials = headers
        .get("access-control-allow-credentials")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);

    let allow_methods: Vec<String> = headers
        .get("access-control-allow-methods")
        .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default();

    let mut is_misconfigured = false;

    if let Some(ref origin) = allow_origin {
        if origin == "*" && allow_credentials {
            vulnerabilities.push("CRITICAL: wildcard origin (*) with credentials enabled".to_string());
            is_misconfigured = true;
        }
        if origin == "*" {
            vulnerabilities.push("WARNING: wildcard origin (*) allows any domain".to_string());
            is_misconfigured = true;
        }
        if origin == "null" {
            vulnerabilities.push("WARNING: null origin accepted - exploitable".to_string());
            is_misconfigured = true;
        }
    }

    for method in &allow_methods {
        if method == "DELETE" || method == "PUT" || method == "PATCH" {
            vulnerabilities.push(format!("INFO: dangerous method allowed: {method}"));
        }
    }

    CorsAnalysis { has_cors, allow_origin, allow_credentials, allow_methods, is_misconfigured, vulnerabilities }
}
