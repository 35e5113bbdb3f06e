//! `security-headers` analyzer: aggregate security-header posture.
//!
//! Ported from the teacher's `analyze/security_headers.rs`
//! (`SecurityHeaderAnalysis::analyze`) — same header checks and scoring
//! penalties, re-expressed as a single `Finding` instead of a bespoke struct.

use std::collections::HashMap;

use crate::fetch::FetchedResponse;
use crate::model::{Finding, ThreatLevel};

use super::Analyzer;

pub struct SecurityHeadersAnalyzer;

impl Analyzer for SecurityHeadersAnalyzer {
    fn id(&self) -> &'static str {
        "security-headers"
    }

    fn analyze(&self, response: &FetchedResponse) -> Finding {
        let analysis = analyze_headers(&response.headers);
        let threat_level = if analysis.security_score >= 85 {
            ThreatLevel::None
        } else if analysis.security_score >= 60 {
            ThreatLevel::Low
        } else if analysis.security_score >= 35 {
            ThreatLevel::Medium
        } else {
            ThreatLevel::High
        };

        let description = if analysis.missing_headers.is_empty() {
            "all baseline security headers present".to_string()
        } else {
            format!("missing headers: {}", analysis.missing_headers.join(", "))
        };

        Finding::new("security-headers", 90, threat_level, description).with_metadata(serde_json::json!({
            "security_score": analysis.security_score,
            "missing_headers": analysis.missing_headers,
            "findings": analysis.findings,
        }))
    }
}

struct HeaderAnalysis {
    missing_headers: Vec<String>,
    security_score: u8,
    findings: Vec<String>,
}

fn analyze_headers(headers: &HashMap<String, String>) -> HeaderAnalysis {
    let mut missing = Vec::new();
    let mut findings = Vec::new();
    let mut score: u8 = 100;

    if !headers.contains_key("strict-transport-security") {
        missing.push("Strict-Transport-Security".to_string());
        findings.push("Missing HSTS - not enforcing HTTPS".to_string());
        score = score.saturating_sub(15);
    }
    if !headers.contains_key("content-security-policy") {
        missing.push("Content-Security-Policy".to_string());
        findings.push("Missing CSP - vulnerable to XSS".to_string());
        score = score.saturating_sub(20);
    }
    if !headers.contains_key("x-frame-options") {
        missing.push("X-Frame-Options".to_string());
        findings.push("Missing X-Frame-Options - vulnerable to clickjacking".to_string());
        score = score.saturating_sub(15);
    }
    if !headers.contains_key("x-content-type-options") {
        missing.push("X-Content-Type-Options".to_string());
        findings.push("Missing X-Content-Type-Options - MIME sniffing possible".to_string());
        score = score.saturating_sub(10);
    }
    if !headers.contains_key("referrer-policy") {
        missing.push("Referrer-Policy".to_string());
        findings.push("Missing Referrer-Policy - information leakage possible".to_string());
        score = score.saturating_sub(10);
    }
    if !headers.contains_key("permissions-policy") && !headers.contains_key("feature-policy") {
        missing.push("Permissions-Policy".to_string());
        findings.push("Missing Permissions-Policy - no feature restriction".to_string());
        score = score.saturating_sub(10);
    }

    if let Some(server) = headers.get("server") {
        if server.to_lowercase().contains("version") || server.contains('/') {
            findings.push(format!("Server header leaks version: {server}"));
            score = score.saturating_sub(5);
        }
    }
    if let Some(x_powered) = headers.get("x-powered-by") {
        findings.push(format!("X-Powered-By leaks technology: {x_powered}"));
        score = score.saturating_sub(5);
    }

    HeaderAnalysis { missing_headers: missing, security_score: score, findings }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(headers: &[(&str, &str)]) -> FetchedResponse {
        FetchedResponse {
            status: 200,
            headers: headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            body: bytes::Bytes::new(),
            effective_url: "https://example.com/".to_string(),
        }
    }

    #[test]
    fn no_headers_scores_low_and_high_threat() {
        let f = SecurityHeadersAnalyzer.analyze(&response(&[]));
        assert_eq!(f.threat_level, ThreatLevel::High);
    }

    #[test]
    fn full_header_set_scores_no_threat() {
        let f = SecurityHeadersAnalyzer.analyze(&response(&[
            ("strict-transport-security", "max-age=31536000"),
            ("content-security-policy", "default-src 'self'"),
            ("x-frame-options", "DENY"),
            ("x-content-type-options", "nosniff"),
            ("referrer-policy", "no-referrer"),
            ("permissions-policy", "geolocation=()"),
        ]));
        assert_eq!(f.threat_level, ThreatLevel::None);
    }

    #[test]
    fn server_header_with_version_is_flagged() {
        let f = SecurityHeadersAnalyzer.analyze(&response(&[("server", "nginx/1.18.0")]));
        let findings = f.metadata["findings"].as_array().unwrap();
        assert!(findings.iter().any(|v| v.as_str().unwrap().contains("leaks version")));
    }
}
