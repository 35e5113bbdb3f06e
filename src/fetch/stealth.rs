//! Stealth-profile header/UA/TLS posture (spec §4.B "With stealth profile ON").
//!
//! Grounded on the teacher's `discover/browser.rs` (anti-automation browser
//! args) and `http_client.rs` (`create_stealth_client`'s HTTP/1-only, Firefox
//! UA posture) — generalized from "look like a real browser to a headless
//! Chrome detector" to "look like a real browser at the HTTP layer".

use rand::seq::SliceRandom;
use reqwest::Client;

/// Fixed pool of realistic desktop-browser UA strings. A real profile would
/// rotate a much larger, continuously-updated pool; five is enough to
/// demonstrate randomized selection per spec §4.B without vendoring a large
/// static table.
const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
];

pub fn random_user_agent() -> &'static str {
    USER_AGENT_POOL
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENT_POOL[0])
}

pub fn browser_like_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"),
        ("Accept-Encoding", "gzip, deflate, br"),
        ("Accept-Language", "en-US,en;q=0.9"),
        ("Sec-Fetch-Dest", "document"),
        ("Sec-Fetch-Mode", "navigate"),
        ("Sec-Fetch-Site", "none"),
        ("Upgrade-Insecure-Requests", "1"),
    ]
}

pub fn apply_stealth_headers(mut builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    for (k, v) in browser_like_headers() {
        builder = builder.header(k, v);
    }
    builder
}

/// Builds the stealth-profile client. `use_rustls_tls` already negotiates a
/// modern, browser-plausible cipher suite and curve order by default;
/// pinning an exact Chrome-identical ordering would require vendoring
/// reqwest's internal rustls version directly rather than going through its
/// public builder, which is a fragile coupling this crate declines to take
/// on (see DESIGN.md).
pub fn stealth_client_builder() -> reqwest::ClientBuilder {
    Client::builder()
        .user_agent(random_user_agent())
        .cookie_store(true)
        .use_rustls_tls()
        .redirect(reqwest::redirect::Policy::limited(5))
}
