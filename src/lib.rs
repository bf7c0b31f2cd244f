//! Typed async client for the Airtable REST API: bases, tables, and records with paginated
//! listing, fixed-interval rate limiting, and chunked bulk writes.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod config;
pub mod error;
pub mod field;
pub mod http;
pub mod obs;
pub mod rate_limit;
pub mod resource;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// crates.io
	use parking_lot::Mutex;
	// self
	#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
	use crate::{
		client::Client,
		config::ClientConfig,
		error::TransportError,
		http::{ApiHttpClient, HttpFuture, HttpRequest, HttpResponse},
	};

	/// API key used by every test client.
	pub const TEST_API_KEY: &str = "key-test";
	/// Rate limit used by test clients so suites are not throttled.
	pub const TEST_RATE_LIMIT: u32 = 1_000;

	/// Builds a reqwest-backed client pointed at a mock server's `base_url`.
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_client(base_url: &str) -> Client {
		let config = test_config(base_url);

		Client::with_http_client(config, ReqwestHttpClient::default())
	}

	/// Builds a client backed by the provided scripted transport.
	pub fn build_scripted_test_client(transport: Arc<ScriptedHttpClient>) -> Client {
		Client::with_shared_http_client(test_config("https://api.test/v0"), transport)
	}

	fn test_config(base_url: &str) -> ClientConfig {
		let base_url = Url::parse(base_url).expect("Test base URL should parse.");

		ClientConfig::builder(TEST_API_KEY)
			.base_url(base_url)
			.rate_limit(TEST_RATE_LIMIT)
			.build()
			.expect("Test client configuration should be valid.")
	}

	type Responder = Box<dyn FnMut(&HttpRequest) -> HttpResponse + Send>;

	/// In-process [`ApiHttpClient`] that replays queued responses and records every request.
	///
	/// Queued responses are served first; once the queue is drained the optional responder
	/// builds replies from the request itself (e.g. echoing a write body back).
	#[derive(Default)]
	pub struct ScriptedHttpClient {
		queue: Mutex<VecDeque<HttpResponse>>,
		responder: Mutex<Option<Responder>>,
		requests: Mutex<Vec<HttpRequest>>,
	}
	impl ScriptedHttpClient {
		/// Queues a raw response.
		pub fn push(&self, response: HttpResponse) -> &Self {
			self.queue.lock().push_back(response);

			self
		}

		/// Queues a JSON response with the given status.
		pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
			self.push(HttpResponse::json(status, &body))
		}

		/// Installs a responder used once the queue is empty.
		pub fn respond_with(
			&self,
			responder: impl 'static + Send + FnMut(&HttpRequest) -> HttpResponse,
		) -> &Self {
			*self.responder.lock() = Some(Box::new(responder));

			self
		}

		/// Returns a copy of every request observed so far.
		pub fn requests(&self) -> Vec<HttpRequest> {
			self.requests.lock().clone()
		}
	}
	impl Debug for ScriptedHttpClient {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.debug_struct("ScriptedHttpClient")
				.field("queued", &self.queue.lock().len())
				.field("observed", &self.requests.lock().len())
				.finish()
		}
	}
	impl ApiHttpClient for ScriptedHttpClient {
		fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
			Box::pin(async move {
				self.requests.lock().push(request.clone());

				if let Some(response) = self.queue.lock().pop_front() {
					return Ok(response);
				}
				if let Some(responder) = self.responder.lock().as_mut() {
					return Ok(responder(&request));
				}

				Err(TransportError::network(std::io::Error::new(
					std::io::ErrorKind::UnexpectedEof,
					"Scripted transport has no response left.",
				)))
			})
		}
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};

pub use client::Client;
pub use config::{ApiKey, ClientConfig};
pub use error::{Error, Result};
pub use resource::*;
