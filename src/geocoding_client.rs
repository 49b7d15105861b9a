use crate::errors::AppError;
use reqwest::StatusCode;
use url::Url;
use std::time::Duration;

/// Raw answer from the provider, before any status or body interpretation.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub status: StatusCode,
    pub body: String,
}

/// Client for the third-party geocoding provider.
///
/// Issues exactly one GET per lookup; there is no retry.
#[derive(Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeocodingClient {
    /// Creates a new `GeocodingClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Provider endpoint; the output format is appended as a path segment.
    /// * `api_key` - Secret sent as the `key` query parameter.
    /// * `timeout` - Upper bound for the whole outbound request.
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::Transport(format!("Failed to create geocoding client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Builds `{base_url}/{format}?address=..&key=..` with form-urlencoded parameters.
    pub fn build_url(&self, format: &str, address: &str) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Transport(format!("Invalid geocoding base URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| {
                AppError::Transport(format!(
                    "Geocoding base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(format);

        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("key", &self.api_key);

        Ok(url)
    }

    /// Performs the lookup and returns the provider's status and body untouched.
    ///
    /// # Returns
    ///
    /// * `Result<ProviderReply, AppError>` - The reply, or `AppError::Transport`
    ///   when the provider could not be reached.
    pub async fn fetch(&self, format: &str, address: &str) -> Result<ProviderReply, AppError> {
        let url = self.build_url(format, address)?;

        tracing::info!("Querying geocoding provider ({}) for: {}", format, address);
        // Redact key from logs
        tracing::debug!(
            "Geocoding URL: {}/{}?address={}&key=[REDACTED]",
            self.base_url,
            format,
            address
        );

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("Geocoding provider answered {} ({} bytes)", status, body.len());
        Ok(ProviderReply { status, body })
    }
}
