//! Record store configuration loaded via OrthoConfig.
//!
//! Values come from CLI arguments, `SUPABASE_*` environment variables or a
//! configuration file, in OrthoConfig's usual precedence.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

/// Problems with the record store settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `SUPABASE_URL` was not provided.
    #[error("record store URL is not configured")]
    MissingUrl,
    /// The URL could not be parsed.
    #[error("record store URL `{value}` is invalid: {reason}")]
    InvalidUrl {
        /// Configured value.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// The URL is not `http` or `https`.
    #[error("record store URL must use http or https, got `{scheme}`")]
    UnsupportedScheme {
        /// Configured scheme.
        scheme: String,
    },
    /// `SUPABASE_ANON_KEY` was not provided.
    #[error("record store API key is not configured")]
    MissingApiKey,
}

/// Connection settings for the hosted record store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SUPABASE")]
pub struct RecordStoreSettings {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub url: Option<String>,
    /// Public anonymous API key.
    pub anon_key: Option<String>,
    /// Client timeout in seconds; zero leaves the transport default.
    #[ortho_config(default = 0)]
    pub request_timeout_secs: u64,
}

impl RecordStoreSettings {
    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the URL is missing, malformed or not
    /// HTTP(S).
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(SettingsError::MissingUrl)?;
        let url = Url::parse(raw).map_err(|error| SettingsError::InvalidUrl {
            value: raw.to_owned(),
            reason: error.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SettingsError::UnsupportedScheme {
                scheme: other.to_owned(),
            }),
        }
    }

    /// API key sent with every request.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingApiKey`] when no key is configured.
    pub fn api_key(&self) -> Result<&str, SettingsError> {
        self.anon_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingApiKey)
    }

    /// Client timeout, when one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
