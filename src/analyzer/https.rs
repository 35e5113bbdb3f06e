//! `https` analyzer: does the effective response URL use HTTPS.
//!
//! New, small, grounded on the header-inspection style of the teacher's
//! `analyze/` modules rather than ported from one directly (the teacher has
//! no standalone protocol-scheme check).

use crate::fetch::FetchedResponse;
use crate::model::{Finding, ThreatLevel};

use super::Analyzer;

pub struct HttpsAnalyzer;

impl Analyzer for HttpsAnalyzer {
    fn id(&self) -> &'static str {
        "https"
    }

    fn analyze(&self, response: &FetchedResponse) -> Finding {
        let is_https = response.effective_url.starts_with("https://");
        if is_https {
            Finding::new("https", 100, ThreatLevel::None, "target served over HTTPS")
        } else {
            Finding::new(
                "https",
                100,
                ThreatLevel::High,
                format!("target did not serve over HTTPS (effective URL: {})", response.effective_url),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(url: &str) -> FetchedResponse {
        FetchedResponse {
            status: 200,
            headers: HashMap::new(),
            body: bytes::Bytes::new(),
            effective_url: url.to_string(),
        }
    }

    #[test]
    fn flags_http_as_high_threat() {
        let f = HttpsAnalyzer.analyze(&response("http://example.com/"));
        assert_eq!(f.threat_level, ThreatLevel::High);
    }

    #[test]
    fn accepts_https_as_no_threat() {
        let f = HttpsAnalyzer.analyze(&response("https://example.com/"));
        assert_eq!(f.threat_level, ThreatLevel::None);
    }
}
