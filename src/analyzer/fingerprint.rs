//! `fingerprint` analyzer: technology/CDN detection from headers and body.
//!
//! Ported from the teacher's `analyze/fingerprint.rs`
//! (`TechnologyFingerprint::analyze`/`detect_cdn`/`detect_language`) — same
//! signature matching, re-expressed as an informational `Finding`.

use std::collections::HashMap;

use crate::fetch::FetchedResponse;
use crate::model::{Finding, ThreatLevel};

use super::Analyzer;

pub struct FingerprintAnalyzer;

impl Analyzer for FingerprintAnalyzer {
    fn id(&self) -> &'static str {
        "fingerprint"
    }

    fn analyze(&self, response: &FetchedResponse) -> Finding {
        let body = response.body_text();
        let fp = fingerprint(&response.headers, &body);

        let description = if fp.technologies.is_empty() && fp.framework.is_empty() {
            "no identifiable technology signatures".to_string()
        } else {
            format!(
                "detected: {}",
                fp.framework.iter().chain(fp.technologies.iter()).cloned().collect::<Vec<_>>().join(", ")
            )
        };

        Finding::new("fingerprint", 70, ThreatLevel::Info, description).with_metadata(serde_json::json!({
            "server": fp.server,
            "framework": fp.framework,
            "cdn": fp.cdn,
            "language": fp.language,
            "database_hints": fp.database_hints,
            "technologies": fp.technologies,
        }))
    }
}

struct Fingerprint {
    server: Option<String>,
    framework: Vec<String>,
    cdn: Option<String>,
    language: Option<String>,
    database_hints: Vec<String>,
    technologies: Vec<String>,
}

fn fingerprint(headers: &HashMap<String, String>, body: &str) -> Fingerprint {
    let mut framework = Vec::new();
    let mut technologies = Vec::new();
    let mut database_hints = Vec::new();

    let server = headers.get("server").cloned();
    let cdn = detect_cdn(headers);

    if let Some(powered) = headers.get("x-powered-by") {
        technologies.push(format!("X-Powered-By: {powered}"));
        if powered.contains("Express") {
            framework.push("Express.js".to_string());
        } else if powered.contains("ASP.NET") {
            framework.push("ASP.NET".to_string());
        } else if powered.contains("PHP") {
            framework.push("PHP".to_string());
        }
    }

    if headers.contains_key("x-nextjs-cache") || headers.contains_key("x-nextjs-page") {
        framework.push("Next.js".to_string());
    }
    if headers.contains_key("x-vercel-id") || headers.contains_key("x-vercel-cache") {
        technologies.push("Vercel".to_string());
    }

    if body.contains("__NEXT_DATA__") {
        framework.push("Next.js".to_string());
    }
    if body.contains("wp-content") || body.contains("wp-includes") {
        framework.push("WordPress".to_string());
    }
    if body.contains("drupal") || body.contains("Drupal") {
        framework.push("Drupal".to_string());
    }
    if body.contains("_nuxt") {
        framework.push("Nuxt.js".to_string());
    }
    if body.contains("ng-version") {
        framework.push("Angular".to_string());
    }
    if body.contains("react") || body.contains("React") {
        framework.push("React".to_string());
    }
    if body.contains("Vue") || body.contains("vue") {
        framework.push("Vue.js".to_string());
    }

    let language = detect_language(headers, body);

    if body.contains("MySQL") || body.contains("mysql") {
        database_hints.push("MySQL".to_string());
    }
    if body.contains("PostgreSQL") || body.contains("postgres") {
        database_hints.push("PostgreSQL".to_string());
    }
    if body.contains("MongoDB") || body.contains("mongodb") {
        database_hints.push("MongoDB".to_string());
    }
    if body.contains("Redis") || body.contains("redis") {
        database_hints.push("Redis".to_string());
    }
    if body.contains("Oracle") {
        database_hints.push("Oracle".to_string());
    }

    if body.contains("graphql") || body.contains("GraphQL") {
        technologies.push("GraphQL".to_string());
    }
    if body.contains("swagger") || body.contains("openapi") {
        technologies.push("OpenAPI/Swagger".to_string());
    }

    Fingerprint { server, framework, cdn, language, database_hints, technologies }
}

fn detect_cdn(headers: &HashMap<String, String>) -> Option<String> {
    if headers.contains_key("cf-ray") || headers.contains_key("cf-cache-status") {
        return Some("Cloudflare".to_string());
    }
    if headers.contains_key("fastly-debug-digest") || headers.contains_key("x-fastly-request-id") {
        return Some("Fastly".to_string());
    }
    if headers.contains_key("x-akamai-transformed") || headers.contains_key("x-cache-key") {
        return Some("Akamai".to_string());
    }
    if headers.contains_key("x-amz-cf-id") || headers.contains_key("x-amz-cf-pop") {
        return Some("Amazon CloudFront".to_string());
    }
    if headers.contains_key("x-azure-ref") {
        return Some("Azure CDN".to_string());
    }
    None
}

fn detect_language(headers: &HashMap<String, String>, body: &str) -> Option<String> {
    if let Some(powered) = headers.get("x-powered-by") {
        if powered.contains("PHP") {
            return Some("PHP".to_string());
        }
        if powered.contains("ASP.NET") {
            return Some("C#/.NET".to_string());
        }
    }
    if body.contains(".php") {
        return Some("PHP".to_string());
    }
    if body.contains(".jsp") {
        return Some("Java".to_string());
    }
    None
}
