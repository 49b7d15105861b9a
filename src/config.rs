use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// Default provider endpoint; the output format is appended as a path segment.
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode";

/// How error bodies are paired with HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStatusMode {
    /// Every resolver failure is answered with 200 OK and a text body.
    #[default]
    Legacy,
    /// Failures map to conventional 4xx/5xx statuses.
    Strict,
}

impl FromStr for ErrorStatusMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "strict" => Ok(Self::Strict),
            other => anyhow::bail!("ERROR_STATUS_MODE must be 'legacy' or 'strict', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub google_api_key: String,
    pub geocode_base_url: String,
    pub request_timeout: Duration,
    pub error_status_mode: ErrorStatusMode,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `from_env` feeds this with the process environment; tests feed it a map.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            google_api_key: lookup("GOOGLE_API_KEY")
                .or_else(|| lookup("VERLOOP_GOOGLE_API_KEY"))
                .unwrap_or_default(),
            geocode_base_url: lookup("GEOCODE_BASE_URL")
                .filter(|s| !s.trim().is_empty())
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEOCODE_BASE_URL.to_string()),
            request_timeout: lookup("GEOCODE_TIMEOUT_SECS")
                .unwrap_or_else(|| "10".to_string())
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    anyhow::anyhow!("GEOCODE_TIMEOUT_SECS must be a positive number of seconds")
                })?,
            error_status_mode: lookup("ERROR_STATUS_MODE")
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<ErrorStatusMode>())
                .transpose()?
                .unwrap_or_default(),
        };

        if !config.geocode_base_url.starts_with("http://")
            && !config.geocode_base_url.starts_with("https://")
        {
            anyhow::bail!("GEOCODE_BASE_URL must start with http:// or https://");
        }

        // Never log the key itself
        if config.google_api_key.trim().is_empty() {
            tracing::warn!("GOOGLE_API_KEY is not set; provider calls will be rejected upstream");
        } else {
            tracing::debug!("Google API key configured");
        }
        tracing::debug!("Geocode base URL: {}", config.geocode_base_url);
        tracing::debug!("Outbound timeout: {:?}", config.request_timeout);
        tracing::debug!("Error status mode: {:?}", config.error_status_mode);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
