//! JWT-bearer token exchange against the provider token endpoint.

// self
use crate::{
	_prelude::*,
	assertion::Assertion,
	error::ResponseFormatError,
	http::{self, ReqwestHttpClient},
	obs::Step,
};

/// Grant type identifier of the JWT-bearer grant.
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Identity token returned by the provider, redacted in every formatter.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);
impl BearerToken {
	/// Wraps a token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("BearerToken").field(&"<redacted>").finish()
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	#[serde(default)]
	id_token: Option<String>,
}

/// Trades signed assertions for identity tokens.
#[derive(Clone, Debug)]
pub struct TokenExchanger<'a> {
	http: &'a ReqwestHttpClient,
	endpoint: &'a Url,
}
impl<'a> TokenExchanger<'a> {
	/// Creates an exchanger posting to `endpoint`.
	pub fn new(http: &'a ReqwestHttpClient, endpoint: &'a Url) -> Self {
		Self { http, endpoint }
	}

	/// Posts `assertion` once and returns the `id_token` from the response.
	pub async fn exchange(&self, assertion: &Assertion) -> Result<BearerToken> {
		tracing::info!(endpoint = %self.endpoint, "requesting identity token");

		let form = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.expose())];
		let request = self.http.post(self.endpoint.clone()).form(&form);
		let body = http::send(Step::TokenExchange, request).await?;

		parse_token_response(body.status, &body.bytes)
	}
}

fn parse_token_response(status: StatusCode, bytes: &[u8]) -> Result<BearerToken> {
	let mut de = serde_json::Deserializer::from_slice(bytes);
	let response: TokenResponse = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| ResponseFormatError::Json { source, status: status.as_u16() })?;

	response
		.id_token
		.filter(|token| !token.is_empty())
		.map(BearerToken)
		.ok_or_else(|| ResponseFormatError::MissingIdToken.into())
}
