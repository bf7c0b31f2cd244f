//! Client configuration: API key, base URL, and rate budget.

// std
use std::num::NonZeroU32;
// self
use crate::{_prelude::*, error::ConfigError};

/// Public Airtable API root.
pub const DEFAULT_BASE_URL: &str = "https://api.airtable.com/v0";
/// Requests per second admitted by default; Airtable allows five per base.
pub const DEFAULT_RATE_LIMIT: u32 = 4;
/// Environment variable consulted by [`ClientConfig::from_env`].
pub const API_KEY_ENV: &str = "AIRTABLE_TOKEN";

/// Redacted API key wrapper keeping the token out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);
impl ApiKey {
	/// Wraps a new key.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner key. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the `Authorization` header value.
	pub(crate) fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl From<&str> for ApiKey {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for ApiKey {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl Debug for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiKey").field(&"<redacted>").finish()
	}
}
impl Display for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Validated settings consumed by [`Client`](crate::client::Client).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// API root every resource path is appended to.
	pub base_url: Url,
	/// Personal access token sent as a bearer credential.
	pub api_key: ApiKey,
	/// Requests per second admitted by the client's limiter.
	pub rate_limit: NonZeroU32,
}
impl ClientConfig {
	/// Creates a builder seeded with the provided key and default settings.
	pub fn builder(api_key: impl Into<ApiKey>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(api_key.into())
	}

	/// Builds a default configuration using the key stored in `AIRTABLE_TOKEN`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_env_value(std::env::var(API_KEY_ENV).ok())
	}

	fn from_env_value(value: Option<String>) -> Result<Self, ConfigError> {
		let key = value
			.filter(|value| !value.trim().is_empty())
			.ok_or(ConfigError::MissingApiKey { env: API_KEY_ENV })?;

		Self::builder(key).build()
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Key used for every request.
	pub api_key: ApiKey,
	/// Optional override of [`DEFAULT_BASE_URL`].
	pub base_url: Option<Url>,
	/// Requests per second.
	pub rate_limit: u32,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided key.
	pub fn new(api_key: ApiKey) -> Self {
		Self { api_key, base_url: None, rate_limit: DEFAULT_RATE_LIMIT }
	}

	/// Overrides the API root (useful for proxies and mock servers).
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the requests-per-second budget.
	pub fn rate_limit(mut self, rate_limit: u32) -> Self {
		self.rate_limit = rate_limit;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		if self.api_key.expose().trim().is_empty() {
			return Err(ConfigError::MissingApiKey { env: API_KEY_ENV });
		}

		let rate_limit = NonZeroU32::new(self.rate_limit).ok_or(ConfigError::InvalidRateLimit)?;
		let base_url = match self.base_url {
			Some(url) => url,
			None => Url::parse(DEFAULT_BASE_URL)?,
		};

		validate_base_url(&base_url)?;

		Ok(ClientConfig { base_url, api_key: self.api_key, rate_limit })
	}
}

fn validate_base_url(url: &Url) -> Result<(), ConfigError> {
	let supported = matches!(url.scheme(), "http" | "https");

	if !supported || url.cannot_be_a_base() || url.query().is_some() {
		Err(ConfigError::InvalidBaseUrl { url: url.to_string() })
	} else {
		Ok(())
	}
}
