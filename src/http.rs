//! Transport primitives shared by the token exchange and the update call.
//!
//! Both requests run through [`ReqwestHttpClient`]. Redirects are never followed: the token
//! endpoint must answer directly, and a redirected update would forward the bearer token to a
//! host the configuration never named. Any status outside 2xx is surfaced as
//! [`HttpError`](crate::error::HttpError) together with the response body.

// std
use std::ops::Deref;
// crates.io
use reqwest::{Response, redirect::Policy};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, HttpError, TransportError},
	obs::Step,
};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds the default client: no redirects, crate user agent.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.redirect(Policy::none())
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Status and body of a 2xx response.
#[derive(Clone, Debug)]
pub(crate) struct SuccessBody {
	pub status: StatusCode,
	pub bytes: Vec<u8>,
}

/// Sends `request` and reads the full body, turning non-2xx answers into [`HttpError`].
pub(crate) async fn send(step: Step, request: reqwest::RequestBuilder) -> Result<SuccessBody> {
	let response = request.send().await.map_err(|e| TransportError::network(step, e))?;

	read_success(step, response).await
}

async fn read_success(step: Step, response: Response) -> Result<SuccessBody> {
	let status = response.status();
	let bytes = response.bytes().await.map_err(|e| TransportError::network(step, e))?.to_vec();

	tracing::debug!(step = step.as_str(), status = status.as_u16(), "received response");

	if !status.is_success() {
		return Err(HttpError {
			step,
			status: status.as_u16(),
			body: String::from_utf8_lossy(&bytes).into_owned(),
		}
		.into());
	}

	Ok(SuccessBody { status, bytes })
}
