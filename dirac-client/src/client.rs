use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ProcessorError, Result};
use crate::types::{ActiveSlotResponse, FilteringResponse, Slot, SpeakerGainResponse, SpeakerLimits};

const LIST_SLOTS: &str = "list-slots";
const ACTIVE_SLOT: &str = "active-slot";
const FILTERING: &str = "filtering";
const SPEAKER_LIMITS: &str = "limits/speaker";
const SPEAKER: &str = "speaker";

/// Typed wrapper around the processor's REST API.
///
/// Every method is a single round trip against `{base_url}/{endpoint}`.
/// The client holds no state besides the base URL and the HTTP transport,
/// so clones can be shared freely between concurrent callers.
#[derive(Debug, Clone)]
pub struct ProcessorClient {
    http: Client,
    base_url: String,
}

impl ProcessorClient {
    /// Create a client using the transport's default settings (no timeout).
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = validate_base_url(base_url)?;
        let http = Client::builder()
            .build()
            .map_err(|e| ProcessorError::Configuration(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, base_url })
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = validate_base_url(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProcessorError::Configuration(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, base_url })
    }

    /// Create a client over a caller-configured transport.
    pub fn with_http_client(base_url: &str, http: Client) -> Result<Self> {
        let base_url = validate_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- Slots ---

    /// List all slots in the order the processor reports them.
    pub async fn get_slots(&self) -> Result<Vec<Slot>> {
        self.get_json(LIST_SLOTS).await
    }

    pub async fn get_active_slot(&self) -> Result<u32> {
        let resp: ActiveSlotResponse = self.get_json(ACTIVE_SLOT).await?;
        Ok(resp.index)
    }

    /// Select the active slot. The index is not checked against the listing.
    pub async fn set_active_slot(&self, index: u32) -> Result<()> {
        self.put(ACTIVE_SLOT, &[("index", index)]).await
    }

    // --- Filtering ---

    pub async fn get_filter_state(&self) -> Result<bool> {
        let resp: FilteringResponse = self.get_json(FILTERING).await?;
        Ok(resp.is_enabled())
    }

    pub async fn set_filter_state(&self, enabled: bool) -> Result<()> {
        self.put(FILTERING, &[("enabled", u8::from(enabled))]).await
    }

    // --- Speaker ---

    pub async fn get_speaker_limits(&self) -> Result<SpeakerLimits> {
        self.get_json(SPEAKER_LIMITS).await
    }

    pub async fn get_speaker_gain(&self) -> Result<f64> {
        let resp: SpeakerGainResponse = self.get_json(SPEAKER).await?;
        Ok(resp.gain)
    }

    /// Set the speaker gain in dB. Not clamped to [`SpeakerLimits`].
    pub async fn set_speaker_gain(&self, gain: f64) -> Result<()> {
        self.put(SPEAKER, &[("gain", gain)]).await
    }

    // --- Request primitives ---

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T> {
        let request = self.http.get(self.url(endpoint));
        let response = self.execute(Method::GET, endpoint, request).await?;

        let body = response.bytes().await.map_err(|source| {
            warn!(method = "GET", endpoint, error = %source, "failed to read processor response");
            ProcessorError::Transport { endpoint, source }
        })?;

        serde_json::from_slice(&body).map_err(|source| {
            warn!(method = "GET", endpoint, error = %source, "failed to decode processor response");
            ProcessorError::Decode { endpoint, source }
        })
    }

    /// Parameters go in the query string; the response body is discarded.
    async fn put<Q: Serialize + ?Sized>(&self, endpoint: &'static str, params: &Q) -> Result<()> {
        let request = self.http.put(self.url(endpoint)).query(params);
        self.execute(Method::PUT, endpoint, request).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response> {
        debug!(%method, endpoint, base_url = %self.base_url, "processor request");

        let result = match request.send().await {
            Ok(response) => response.error_for_status(),
            Err(e) => Err(e),
        };

        result.map_err(|source| {
            warn!(%method, endpoint, error = %source, "processor request failed");
            ProcessorError::Transport { endpoint, source }
        })
    }
}

/// Accept only `http://` and `https://` URLs; strip trailing slashes.
fn validate_base_url(base_url: &str) -> Result<String> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        return Ok(base_url.trim_end_matches('/').to_string());
    }
    warn!(base_url, "rejected processor base URL");
    Err(ProcessorError::Configuration(format!(
        "base URL must start with 'http://' or 'https://', got '{}'",
        base_url
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        for url in [
            "http://localhost:8080",
            "https://processor.local",
            "http://192.168.1.20:5000/api",
        ] {
            assert!(ProcessorClient::new(url).is_ok(), "{} should be accepted", url);
        }
    }

    #[test]
    fn test_rejects_other_schemes() {
        for url in [
            "",
            "localhost:8080",
            "ftp://processor.local",
            "ws://processor.local",
            "httpx://processor.local",
            "http:/processor.local",
            " http://processor.local",
        ] {
            let err = ProcessorClient::new(url).unwrap_err();
            assert!(err.is_configuration(), "{:?} should be rejected", url);
        }
    }

    #[test]
    fn test_with_timeout_validates_url() {
        let err = ProcessorClient::with_timeout("processor.local", Duration::from_secs(1))
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(ProcessorClient::with_timeout("http://processor.local", Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn test_with_http_client_validates_url() {
        let err = ProcessorClient::with_http_client("file:///tmp", Client::new()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ProcessorClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url(LIST_SLOTS), "http://localhost:8080/list-slots");
        assert_eq!(client.url(SPEAKER_LIMITS), "http://localhost:8080/limits/speaker");
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProcessorClient>();
    }
}
