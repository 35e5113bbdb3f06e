//! HTTP Fetcher (spec §4.B): one-shot GET with optional stealth profile,
//! classifying failures into the spec's fixed taxonomy.
//!
//! Grounded on the teacher's `http_client.rs` (`create_optimized_client`/
//! `create_stealth_client`: pool tuning, compression, rustls, UA strings)
//! and `probe/http_probe.rs` (server-header WAF sniff, generalized here into
//! the full bot-protection indicator set).

mod stealth;

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use once_cell::sync::OnceCell;
use rand::Rng;
use reqwest::Client;

use crate::config::RuntimeConfig;
use crate::error::ScanError;
use crate::sync::Sleeper;

/// Body substrings checked case-insensitively (spec §4.B fixed phrase set).
const BOT_PHRASES: &[&str] = &[
    "cloudflare",
    "captcha",
    "attention required",
    "challenge",
    "verify you are human",
    "security check",
    "ddos protection",
    "access denied",
    "bot detected",
    "automated traffic",
    "rate limited",
    "javascript is required",
    "browser check",
];

/// Service-indicator substrings checked in the body, case-insensitively.
const SERVICE_INDICATORS: &[&str] = &[
    "incapsula",
    "distil",
    "perimeterx",
    "datadome",
    "reblaze",
    "radware",
    "__cf_bm",
    "cf-browser-verification",
];

/// Response header markers (name, expected-value-substring or None for
/// "header merely present").
const HEADER_MARKERS: &[(&str, Option<&str>)] = &[
    ("server", Some("cloudflare")),
    ("cf-ray", None),
    ("cf-cache-status", None),
    ("cf-chl-bcode", None),
];

static DEFAULT_CLIENT: OnceCell<Client> = OnceCell::new();
static STEALTH_CLIENT: OnceCell<Client> = OnceCell::new();

/// Built once, from whichever `RuntimeConfig` is seen first — `fetch_timeout`
/// is read once at startup and immutable thereafter (spec §2.3), so the
/// pooled client only ever needs one timeout value for the process lifetime.
fn default_client(timeout: Duration) -> &'static Client {
    DEFAULT_CLIENT.get_or_init(|| {
        Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .tcp_nodelay(true)
            .gzip(true)
            .brotli(true)
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent("api-hunter/1.0 (+https://github.com/mmadersbacher/API_Hunter)")
            .build()
            .expect("failed to build default HTTP client")
    })
}

fn stealth_client(timeout: Duration) -> &'static Client {
    STEALTH_CLIENT.get_or_init(|| {
        stealth::stealth_client_builder()
            .timeout(timeout)
            .build()
            .expect("failed to build stealth HTTP client")
    })
}

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Custom header map; merged with defaults, last-write-wins.
    pub headers: HashMap<String, String>,
    pub anti_bot: bool,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anti_bot(mut self, on: bool) -> Self {
        self.anti_bot = on;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// Response materialized into an immutable byte buffer before fan-out, so
/// every analyzer reads the same owned bytes instead of racing a response
/// body stream (spec §5/§9).
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
    /// The URL actually served the response, post-redirects — lets
    /// analyzers like `https`/`hsts` tell which scheme answered.
    pub effective_url: String,
}

impl FetchedResponse {
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }
}

pub struct Fetcher {
    sleeper: Box<dyn Sleeper>,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(Box::new(crate::sync::TokioSleeper))
    }
}

impl Fetcher {
    pub fn new(sleeper: Box<dyn Sleeper>) -> Self {
        Self { sleeper }
    }

    pub async fn get(&self, url: &str, options: &FetchOptions, config: &RuntimeConfig) -> Result<FetchedResponse, ScanError> {
        if options.anti_bot {
            let min_ms = config.stealth_delay_min.as_millis() as u64;
            let max_ms = config.stealth_delay_max.as_millis() as u64;
            let delay_ms = rand::thread_rng().gen_range(min_ms..=max_ms);
            self.sleeper.sleep(Duration::from_millis(delay_ms)).await;
        }

        let client: &Client = if options.anti_bot { stealth_client(config.fetch_timeout) } else { default_client(config.fetch_timeout) };

        let mut builder = client.get(url);
        if options.anti_bot {
            builder = stealth::apply_stealth_headers(builder);
        } else {
            builder = builder.header("User-Agent", "api-hunter/1.0");
        }

        // `.header()` appends rather than overrides, so request-level
        // overrides are applied through `.headers()` instead, which replaces
        // any existing value for the same name (spec §4.B "merged, last-write
        // wins").
        if !options.headers.is_empty() {
            let mut overrides = reqwest::header::HeaderMap::new();
            for (k, v) in &options.headers {
                let (Ok(name), Ok(value)) = (
                    reqwest::header::HeaderName::from_bytes(k.as_bytes()),
                    reqwest::header::HeaderValue::from_str(v),
                ) else {
                    continue;
                };
                overrides.insert(name, value);
            }
            builder = builder.headers(overrides);
        }

        let response = builder.send().await.map_err(|e| classify_transport_error(&e))?;

        let status = response.status().as_u16();
        let effective_url = response.url().to_string();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_ascii_lowercase(), v.to_string())))
            .collect();

        if !(200..300).contains(&status) {
            return Err(ScanError::non_retryable(
                102,
                format!("non-2xx status: {status}"),
                "fetcher",
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ScanError::non_retryable(200, format!("body read error: {e}"), "fetcher"))?;

        if !options.anti_bot {
            if let Some(indicators) = detect_bot_protection(&headers, &body) {
                return Err(ScanError::non_retryable(
                    300,
                    format!("bot protection detected: {}", indicators.join(", ")),
                    "fetcher",
                ));
            }
        }

        Ok(FetchedResponse { status, headers, body, effective_url })
    }
}

fn classify_transport_error(e: &reqwest::Error) -> ScanError {
    if e.is_builder() {
        ScanError::non_retryable(100, format!("request construction error: {e}"), "fetcher")
    } else {
        ScanError::retryable(101, format!("transport error: {e}"), "fetcher")
    }
}

/// Returns the matched indicator names if any bot-protection signal fires.
fn detect_bot_protection(headers: &HashMap<String, String>, body: &Bytes) -> Option<Vec<String>> {
    let body_text = String::from_utf8_lossy(body).to_ascii_lowercase();
    let mut hits = Vec::new();

    for phrase in BOT_PHRASES {
        if body_text.contains(phrase) {
            hits.push(format!("phrase:{phrase}"));
        }
    }
    for indicator in SERVICE_INDICATORS {
        if body_text.contains(indicator) {
            hits.push(format!("service:{indicator}"));
        }
    }
    for (name, expect) in HEADER_MARKERS {
        if let Some(value) = headers.get(*name) {
            match expect {
                Some(substr) if value.to_ascii_lowercase().contains(substr) => {
                    hits.push(format!("header:{name}={value}"));
                }
                None => hits.push(format!("header:{name}")),
                _ => {}
            }
        }
    }

    if hits.is_empty() {
        None
    } else {
        Some(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn detects_bot_phrase_in_body_case_insensitively() {
        let body = Bytes::from_static(b"Please complete the CAPTCHA to continue");
        let hit = detect_bot_protection(&HashMap::new(), &body);
        assert!(hit.is_some());
    }

    #[test]
    fn detects_cloudflare_server_header() {
        let h = headers(&[("server", "cloudflare")]);
        let body = Bytes::from_static(b"ok");
        let hit = detect_bot_protection(&h, &body);
        assert!(hit.unwrap().iter().any(|s| s.contains("server")));
    }

    #[test]
    fn detects_cf_ray_presence_regardless_of_value() {
        let h = headers(&[("cf-ray", "abcd-1234")]);
        let body = Bytes::from_static(b"ok");
        assert!(detect_bot_protection(&h, &body).is_some());
    }

    #[test]
    fn clean_response_has_no_bot_protection_hits() {
        let body = Bytes::from_static(b"<html>hello world</html>");
        assert!(detect_bot_protection(&HashMap::new(), &body).is_none());
    }

    #[test]
    fn detects_service_indicator_in_body() {
        let body = Bytes::from_static(b"window.__cf_bm = 'token'");
        assert!(detect_bot_protection(&HashMap::new(), &body).is_some());
    }
}
