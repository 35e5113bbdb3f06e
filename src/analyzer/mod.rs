//! Analyzer contract and catalog (spec §4.G, §3 supplemented catalog).
//!
//! Grounded on the teacher's `analyze/mod.rs` re-export style: each analyzer
//! is a small pure function wrapped in a uniform trait so strategies can fan
//! out over a list without knowing each analyzer's concrete type.

pub mod cors;
pub mod fingerprint;
pub mod hsts;
pub mod https;
pub mod security_headers;

use once_cell::sync::Lazy;

use crate::fetch::FetchedResponse;
use crate::model::Finding;

/// Pure: takes the one shared, already-materialized response and returns a
/// single Finding. No network access, no shared mutable state (spec §4.G).
pub trait Analyzer: Send + Sync {
    fn id(&self) -> &'static str;
    fn analyze(&self, response: &FetchedResponse) -> Finding;
}

pub static ANALYZER_CATALOG: Lazy<Vec<Box<dyn Analyzer>>> = Lazy::new(|| {
    vec![
        Box::new(https::HttpsAnalyzer),
        Box::new(hsts::HstsAnalyzer),
        Box::new(security_headers::SecurityHeadersAnalyzer),
        Box::new(cors::CorsAnalyzer),
        Box::new(fingerprint::FingerprintAnalyzer),
    ]
});

pub fn analyzer_ids() -> Vec<String> {
    ANALYZER_CATALOG.iter().map(|a| a.id().to_string()).collect()
}

pub fn lookup(id: &str) -> Option<&'static dyn Analyzer> {
    ANALYZER_CATALOG.iter().find(|a| a.id() == id).map(|a| a.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_no_duplicate_ids() {
        let ids = analyzer_ids();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids.len(), sorted.len());
    }

    #[test]
    fn lookup_finds_registered_analyzer() {
        assert!(lookup("https").is_some());
        assert!(lookup("nonexistent-analyzer").is_none());
    }
}
