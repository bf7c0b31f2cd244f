//! Client-level error types shared across the transport, listing, and resource layers.

// self
use crate::{_prelude::*, resource::IdentifierError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Airtable answered with a non-2xx status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] IdentifierError),

	/// Request body could not be serialized.
	#[error("Request body for {url} could not be encoded.")]
	Encode {
		/// Target URL of the request.
		url: String,
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Response body could not be decoded into the expected shape.
	#[error("Response from {url} could not be decoded at `{}`.", .source.path())]
	Decode {
		/// URL the response came from.
		url: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Lookup-by-name found no exact match.
	#[error("{kind} '{name}' not found.")]
	NotFound {
		/// Entity kind (base, table, field, view).
		kind: &'static str,
		/// Name that was looked up.
		name: String,
	},
	/// Cell value is not a date-time string.
	#[error("Field is not a date-time value.")]
	NotDateTime,
	/// Cell value is a string but not an Airtable date-time.
	#[error("Field holds a malformed date-time value.")]
	InvalidDateTime(#[from] time::error::Parse),
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// No API key was supplied.
	#[error("API key is missing; set {env} or pass one explicitly.")]
	MissingApiKey {
		/// Environment variable consulted.
		env: &'static str,
	},
	/// Base URL cannot carry path segments.
	#[error("Base URL `{url}` must be an absolute http(s) URL.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Base URL string cannot be parsed.
	#[error("Base URL is invalid.")]
	UnparsableBaseUrl(#[from] url::ParseError),
	/// Rate limit must admit at least one request per second.
	#[error("Rate limit must be at least one request per second.")]
	InvalidRateLimit,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failure to obtain a response from the Airtable API.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure (DNS, TCP, TLS, body read).
	#[error("Network error occurred while calling the Airtable API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Non-2xx response returned by the Airtable API.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Request to {url} failed with HTTP {status}{}.", describe(.kind, .message))]
pub struct ApiError {
	/// Request URL.
	pub url: String,
	/// HTTP status code.
	pub status: u16,
	/// Airtable error type (e.g. `INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND`), when supplied.
	pub kind: Option<String>,
	/// Human-readable error message, when supplied.
	pub message: Option<String>,
	/// Retry-After hint from upstream, if supplied.
	pub retry_after: Option<Duration>,
}
impl ApiError {
	/// Builds an error from the response status and body, reading Airtable's error envelope
	/// when the body carries one.
	pub fn from_response(
		url: impl Into<String>,
		status: u16,
		body: &[u8],
		retry_after: Option<Duration>,
	) -> Self {
		let (kind, message) = match serde_json::from_slice::<ErrorEnvelope>(body) {
			Ok(envelope) => match envelope.error {
				ErrorBody::Detailed { kind, message } => (Some(kind), message),
				ErrorBody::Code(kind) => (Some(kind), None),
			},
			Err(_) => (None, None),
		};

		Self { url: url.into(), status, kind, message, retry_after }
	}

	/// Checks whether the server asked the caller to slow down.
	pub fn is_rate_limited(&self) -> bool {
		self.status == 429
	}
}

#[derive(Deserialize)]
struct ErrorEnvelope {
	error: ErrorBody,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
	Detailed {
		#[serde(rename = "type")]
		kind: String,
		message: Option<String>,
	},
	Code(String),
}

fn describe(kind: &Option<String>, message: &Option<String>) -> String {
	match (kind, message) {
		(Some(kind), Some(message)) => format!(" ({kind}: {message})"),
		(Some(kind), None) => format!(" ({kind})"),
		(None, Some(message)) => format!(" ({message})"),
		(None, None) => String::new(),
	}
}
