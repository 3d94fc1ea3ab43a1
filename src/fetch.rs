//! Download of the schedule page.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GET `url` and return the body as UTF-8 text.
pub fn fetch_page(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .context("Failed to create HTTP client")?;

    info!(url, "Fetching schedule page");

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to fetch {}", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Failed to fetch {} (status {})", url, status);
    }

    let body = response
        .bytes()
        .with_context(|| format!("Failed to read response body from {}", url))?;

    decode_body(&body, url)
}

/// The page is always served as UTF-8; anything else means we fetched the
/// wrong thing.
fn decode_body(body: &[u8], url: &str) -> Result<String> {
    String::from_utf8(body.to_vec())
        .with_context(|| format!("Response from {} is not valid UTF-8", url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf8_body() {
        let body = "Montr\u{e9}al \u{2013} 2014".as_bytes();
        assert_eq!(
            decode_body(body, "https://example.org").unwrap(),
            "Montréal – 2014"
        );
    }

    #[test]
    fn rejects_latin1_body() {
        let err = decode_body(&[0x4d, 0x6f, 0x6e, 0x74, 0x72, 0xe9], "https://example.org")
            .unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
