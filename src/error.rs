//! Client-wide error types shared by every pipeline step.

// self
use crate::{_prelude::*, obs::Step};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error returned by the pipeline.
///
/// Every variant is fatal; nothing retries and no step runs after a failure.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Missing or unreadable configuration.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Key material could not be used for signing.
	#[error(transparent)]
	KeyFormat(#[from] KeyFormatError),
	/// A remote endpoint answered outside the 2xx range.
	#[error(transparent)]
	Http(#[from] HttpError),
	/// Token endpoint answered 2xx with an unusable body.
	#[error(transparent)]
	ResponseFormat(#[from] ResponseFormatError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration failures raised before any network traffic.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Configuration file could not be read or parsed.
	#[error("Configuration file {path} could not be loaded.")]
	Load {
		/// Path handed to the loader.
		path: PathBuf,
		/// Underlying INI failure.
		#[source]
		source: ini::Error,
	},
	/// Configuration document could not be parsed.
	#[error("Configuration document could not be parsed.")]
	Parse(#[from] ini::ParseError),
	/// Required section is absent.
	#[error("Configuration is missing the [{section}] section.")]
	MissingSection {
		/// Section name.
		section: &'static str,
	},
	/// Required key is absent or empty.
	#[error("Configuration is missing the `{field}` field.")]
	MissingField {
		/// Key name inside the section.
		field: &'static str,
	},
	/// A URL field cannot be parsed as an absolute URL.
	#[error("Configuration field `{field}` is not a valid absolute URL.")]
	InvalidUrl {
		/// Key name inside the section.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Private key file could not be read.
	#[error("Private key file {path} could not be read.")]
	KeyFile {
		/// Configured key path.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Signing failures.
#[derive(Debug, ThisError)]
pub enum KeyFormatError {
	/// Key file exists but holds no material.
	#[error("Private key is empty.")]
	Empty,
	/// Key material is not a PEM-encoded RSA private key.
	#[error("Private key is not a valid PEM-encoded RSA key.")]
	InvalidKey {
		/// Underlying decoding failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// Signing the assertion failed.
	#[error("Assertion could not be signed.")]
	Signing {
		/// Underlying signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

/// Non-2xx answer from one of the remote endpoints.
#[derive(Debug, ThisError)]
#[error("The {step} endpoint returned HTTP {status}: {body}")]
pub struct HttpError {
	/// Pipeline step that issued the request.
	pub step: Step,
	/// HTTP status code.
	pub status: u16,
	/// Response body, kept for diagnostics.
	pub body: String,
}

/// Malformed token endpoint responses.
#[derive(Debug, ThisError)]
pub enum ResponseFormatError {
	/// Response parsed but carries no usable `id_token`.
	#[error("Token endpoint response is missing id_token.")]
	MissingIdToken,
	/// Response body is not the expected JSON shape.
	#[error("Token endpoint returned malformed JSON.")]
	Json {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {step} endpoint.")]
	Network {
		/// Pipeline step that issued the request.
		step: Step,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(step: Step, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { step, source: Box::new(src) }
	}
}
