//! Resolver configuration.
//!
//! [`ResolverConfig`] carries the API base URL, the image base URL derived
//! from it, and the placeholder shown when no candidate loads. It is built
//! once at startup and passed by reference to the candidate generator, so
//! tests can swap in fixture base URLs without touching process state.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Environment variable holding the API base URL.
pub const API_URL_VAR: &str = "API_URL";

/// API base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Inline SVG shown when every candidate has failed.
///
/// A data URI, so it resolves without a network request.
pub const NO_IMAGE_PLACEHOLDER: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='400' height='200' viewBox='0 0 400 200'%3E%3Crect width='400' height='200' fill='%23f0f0f0'/%3E%3Ctext x='50%25' y='50%25' font-family='Arial' font-size='24' text-anchor='middle' dominant-baseline='middle' fill='%23999'%3ENo Image%3C/text%3E%3C/svg%3E";

/// Path segment appended to the API URL to form the image base URL.
const UPLOADS_SEGMENT: &str = "/uploads";

/// Errors from validating a configured API URL.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The API URL was empty.
    #[error("API URL is empty")]
    Empty,

    /// The API URL could not be parsed.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API URL uses a scheme other than `http` or `https`.
    #[error("unsupported API URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Base URLs and placeholder used by the candidate generator.
///
/// All URLs are stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    api_url: String,
    image_base_url: String,
    placeholder: String,
    /// Path component of `api_url` (e.g. `/api`), or `None` when the URL
    /// is served from the root or could not be parsed.
    api_path_prefix: Option<String>,
}

impl ResolverConfig {
    /// Build a configuration from an API base URL without validating it.
    ///
    /// The image base URL becomes `{api_url}/uploads` and the placeholder
    /// is [`NO_IMAGE_PLACEHOLDER`]. An unparsable URL is accepted; relative
    /// paths are then joined by plain concatenation.
    #[must_use]
    pub fn new(api_url: &str) -> Self {
        let api_url = trim_trailing_slash(api_url.trim());
        Self {
            image_base_url: format!("{api_url}{UPLOADS_SEGMENT}"),
            placeholder: NO_IMAGE_PLACEHOLDER.to_owned(),
            api_path_prefix: path_prefix(api_url),
            api_url: api_url.to_owned(),
        }
    }

    /// Build a configuration from an API base URL, rejecting URLs that
    /// are empty, unparsable, or not `http`/`https`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`], [`ConfigError::InvalidUrl`], or
    /// [`ConfigError::UnsupportedScheme`].
    pub fn try_new(api_url: &str) -> Result<Self, ConfigError> {
        let trimmed = api_url.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Empty);
        }
        let parsed = url::Url::parse(trimmed)?;
        match parsed.scheme() {
            "http" | "https" => Ok(Self::new(trimmed)),
            other => Err(ConfigError::UnsupportedScheme(other.to_owned())),
        }
    }

    /// Read the API base URL from the `API_URL` environment variable.
    ///
    /// Falls back to [`DEFAULT_API_URL`] when the variable is unset or
    /// holds an invalid URL.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(API_URL_VAR).ok().as_deref())
    }

    /// Same as [`from_env`](Self::from_env) with the variable's value
    /// supplied by the caller (e.g. `option_env!` in a wasm build).
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        let Some(value) = value else {
            info!("{API_URL_VAR} not set, using default: {DEFAULT_API_URL}");
            return Self::default();
        };
        match Self::try_new(value) {
            Ok(config) => config,
            Err(e) => {
                warn!("Invalid {API_URL_VAR} value {value:?}: {e}, using default");
                Self::default()
            }
        }
    }

    /// Replace the placeholder (e.g. with a default avatar asset).
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        placeholder.clone_into(&mut self.placeholder);
        self
    }

    /// Override the image base URL derived from the API URL.
    #[must_use]
    pub fn with_image_base_url(mut self, image_base_url: &str) -> Self {
        self.image_base_url = trim_trailing_slash(image_base_url.trim()).to_owned();
        self
    }

    /// The API base URL, without a trailing slash.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// The base URL for uploaded images, without a trailing slash.
    #[must_use]
    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// The placeholder that terminates every candidate list.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The API URL's path prefix, if it is not served from the root.
    #[must_use]
    pub fn api_path_prefix(&self) -> Option<&str> {
        self.api_path_prefix.as_deref()
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn trim_trailing_slash(s: &str) -> &str {
    s.trim_end_matches('/')
}

/// Path component of `api_url` without its trailing slash.
///
/// `None` for a root path or an unparsable URL.
fn path_prefix(api_url: &str) -> Option<String> {
    let parsed = url::Url::parse(api_url).ok()?;
    let path = trim_trailing_slash(parsed.path());
    (!path.is_empty()).then(|| path.to_owned())
}
