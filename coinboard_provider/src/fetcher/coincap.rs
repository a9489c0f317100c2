//! CoinCap HTTP quote source.
//!
//! - `GET {base}/page/{id}` — current price and 24h change for one coin.
//! - `GET {base}/front` — ranked coin list; used for the fallback tracked list.
//!
//! Uses reqwest's blocking client: every call runs on a batch worker thread, never on the
//! provider's event loop.

use std::time::Duration;

use coinboard_common::{CoinboardError, Quote, Result};
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;

use super::QuoteFetcher;

/// Public CoinCap endpoint.
pub const DEFAULT_BASE_URL: &str = "https://coincap.io";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct PageResponse {
    id: String,
    display_name: String,
    price: f64,
    #[serde(rename = "cap24hrChange", default)]
    cap24hr_change: f64,
}

#[derive(Debug, Deserialize)]
struct FrontEntry {
    short: String,
}

/// Fetches quotes from CoinCap.
pub struct CoinCapFetcher {
    client: Client,
    base_url: String,
}

impl CoinCapFetcher {
    /// Create a fetcher against `base_url` (no trailing slash needed).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("coinboard/0.1")
            .build()
            .map_err(|e| CoinboardError::Format(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str, id: &str) -> Result<T> {
        debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<T>())
            .map_err(|e| CoinboardError::fetch(id, e))
    }
}

impl QuoteFetcher for CoinCapFetcher {
    fn fetch(&self, id: &str) -> Result<Quote> {
        let url = format!("{}/page/{}", self.base_url, id);
        let page: PageResponse = self.get_json(&url, id)?;
        Quote::new(&page.id, &page.display_name, page.price, page.cap24hr_change)
            .map_err(|e| CoinboardError::fetch(id, e))
    }

    fn top_ids(&self, limit: usize) -> Result<Vec<String>> {
        let url = format!("{}/front", self.base_url);
        let front: Vec<FrontEntry> = self.get_json(&url, "front")?;
        Ok(front.into_iter().take(limit).map(|entry| entry.short).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_response_decodes_coincap_fields() {
        let page: PageResponse = serde_json::from_str(
            r#"{"id":"BTC","display_name":"Bitcoin","price":50000.5,"cap24hrChange":2.1,"volume":1}"#,
        )
        .unwrap();
        assert_eq!(page.id, "BTC");
        assert_eq!(page.display_name, "Bitcoin");
        assert_eq!(page.cap24hr_change, 2.1);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let fetcher = CoinCapFetcher::new("https://example.invalid/").unwrap();
        assert_eq!(fetcher.base_url, "https://example.invalid");
    }

    #[test]
    fn test_unreachable_host_is_fetch_error() {
        let fetcher = CoinCapFetcher::new("http://127.0.0.1:1").unwrap();
        let err = fetcher.fetch("BTC").unwrap_err();
        assert!(matches!(err, CoinboardError::Fetch { ref id, .. } if id == "BTC"));
    }
}
