//! Client handle: request signing, rate limiting, status classification, and decoding.

mod pagination;

// std
use std::num::NonZeroU32;
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::{ApiError, ConfigError},
	http::{ApiHttpClient, HttpMethod, HttpRequest},
	rate_limit::RateLimiter,
};
#[cfg(feature = "reqwest")] use crate::{config::ApiKey, http::ReqwestHttpClient};

/// Query string pairs; keys may repeat (e.g. `records[]`).
pub type Query = Vec<(String, String)>;

/// Entry point to the Airtable API.
///
/// The client owns the HTTP transport, the validated configuration, and the rate limiter.
/// Cloning is cheap and clones share all three, so a single limiter spaces every request
/// issued through any clone (including the handles embedded in [`Base`](crate::Base) and
/// [`Table`](crate::Table) values).
#[derive(Clone)]
pub struct Client {
	http_client: Arc<dyn ApiHttpClient>,
	config: Arc<ClientConfig>,
	limiter: Arc<RateLimiter>,
}
impl Client {
	/// Creates a client that sends requests through the caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl ApiHttpClient) -> Self {
		Self::with_shared_http_client(config, Arc::new(http_client))
	}

	/// Creates a client around a transport that is already shared elsewhere.
	pub fn with_shared_http_client(
		config: ClientConfig,
		http_client: Arc<dyn ApiHttpClient>,
	) -> Self {
		let limiter = Arc::new(RateLimiter::new(config.rate_limit));

		Self { http_client, config: Arc::new(config), limiter }
	}

	/// Returns the validated configuration backing this client.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Replaces the rate limiter of this handle with one admitting `per_second` requests.
	///
	/// Clones created before the call keep sharing the previous limiter.
	pub fn set_rate_limit(&mut self, per_second: u32) -> Result<(), ConfigError> {
		let per_second = NonZeroU32::new(per_second).ok_or(ConfigError::InvalidRateLimit)?;
		let limiter = RateLimiter::new(per_second);
		let mut config = ClientConfig::clone(&self.config);

		config.rate_limit = per_second;

		self.limiter = Arc::new(limiter);
		self.config = Arc::new(config);

		Ok(())
	}

	pub(crate) async fn get<T>(&self, path: &[&str], query: &[(String, String)]) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.send::<T, ()>(HttpMethod::Get, path, query, None).await
	}

	pub(crate) async fn post<T, B>(&self, path: &[&str], body: &B) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.send(HttpMethod::Post, path, &[], Some(body)).await
	}

	pub(crate) async fn patch<T, B>(&self, path: &[&str], body: &B) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.send(HttpMethod::Patch, path, &[], Some(body)).await
	}

	pub(crate) async fn put<T, B>(&self, path: &[&str], body: &B) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.send(HttpMethod::Put, path, &[], Some(body)).await
	}

	pub(crate) async fn delete<T, I>(&self, path: &[&str], record_ids: I) -> Result<T>
	where
		T: DeserializeOwned,
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		let query = record_ids
			.into_iter()
			.map(|id| ("records[]".to_owned(), id.as_ref().to_owned()))
			.collect::<Query>();

		self.send::<T, ()>(HttpMethod::Delete, path, &query, None).await
	}

	/// Waits for the limiter, signs and sends the request, then classifies the response.
	pub(crate) async fn send<T, B>(
		&self,
		method: HttpMethod,
		path: &[&str],
		query: &[(String, String)],
		body: Option<&B>,
	) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let url = self.build_url(path, query)?;
		let body = match body {
			Some(body) => Some(
				serde_json::to_vec(body)
					.map_err(|source| Error::Encode { url: url.to_string(), source })?,
			),
			None => None,
		};
		let request = HttpRequest {
			method,
			url: url.clone(),
			headers: vec![
				("Content-Type".into(), "application/json".into()),
				("Authorization".into(), self.config.api_key.bearer()),
			],
			body,
		};

		self.limiter.acquire().await;

		let response = self.http_client.execute(request).await?;

		if !response.is_success() {
			return Err(ApiError::from_response(
				url,
				response.status,
				&response.body,
				response.retry_after,
			)
			.into());
		}

		let de = &mut serde_json::Deserializer::from_slice(&response.body);

		serde_path_to_error::deserialize(de)
			.map_err(|source| Error::Decode { url: url.to_string(), source })
	}

	/// Joins percent-encoded `path` segments onto the base URL and appends `query`.
	pub(crate) fn build_url(&self, path: &[&str], query: &[(String, String)]) -> Result<Url> {
		let mut url = self.config.base_url.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidBaseUrl { url: self.config.base_url.to_string() })?
			.pop_if_empty()
			.extend(path);

		if !query.is_empty() {
			url.query_pairs_mut().extend_pairs(query);
		}

		Ok(url)
	}
}
#[cfg(feature = "reqwest")]
impl Client {
	/// Creates a client with default settings and the reqwest transport.
	pub fn new(api_key: impl Into<ApiKey>) -> Result<Self, ConfigError> {
		let config = ClientConfig::builder(api_key).build()?;

		Ok(Self::with_http_client(config, ReqwestHttpClient::new()?))
	}

	/// Creates a client from `AIRTABLE_TOKEN` with default settings and the reqwest transport.
	pub fn from_env() -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(ClientConfig::from_env()?, ReqwestHttpClient::new()?))
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.config.base_url.as_str())
			.field("rate_limit", &self.config.rate_limit)
			.finish()
	}
}
