//! Pipeline orchestration: assertion, token exchange, update.
//!
//! [`DynDnsClient::run`] executes the steps strictly in order and returns on the first failure,
//! so the update is never attempted without a token and a token is never requested without a
//! signed assertion.

// self
use crate::{
	_prelude::*,
	assertion::{AssertionBuilder, SigningKey},
	config::ClientConfig,
	exchange::TokenExchanger,
	http::ReqwestHttpClient,
	obs::{self, Step},
	update::{UpdateInvoker, UpdateReceipt},
};

/// Runs one update with the default transport.
pub async fn run(config: &ClientConfig) -> Result<UpdateReceipt> {
	DynDnsClient::new(config.clone())?.run().await
}

/// Client bound to one configuration and one HTTP transport.
#[derive(Clone, Debug)]
pub struct DynDnsClient {
	config: ClientConfig,
	http: ReqwestHttpClient,
}
impl DynDnsClient {
	/// Creates a client using [`ReqwestHttpClient::new`].
	pub fn new(config: ClientConfig) -> Result<Self> {
		Ok(Self::with_http_client(config, ReqwestHttpClient::new()?))
	}

	/// Creates a client with a caller-supplied transport.
	pub fn with_http_client(config: ClientConfig, http: ReqwestHttpClient) -> Self {
		Self { config, http }
	}

	/// Returns the bound configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Signs a fresh assertion, exchanges it, and triggers the update.
	pub async fn run(&self) -> Result<UpdateReceipt> {
		let config = &self.config;
		let assertion = obs::observe(Step::Assertion, async {
			let key = SigningKey::read(&config.private_key_file)?;

			Ok::<_, Error>(AssertionBuilder::new(config).sign(&key)?)
		})
		.await?;
		let token = obs::observe(Step::TokenExchange, async {
			TokenExchanger::new(&self.http, &config.token_endpoint).exchange(&assertion).await
		})
		.await?;
		let receipt = obs::observe(Step::Update, async {
			UpdateInvoker::new(&self.http, &config.cloud_function_trigger_url, &config.hostname)
				.invoke(&token)
				.await
		})
		.await?;

		Ok(receipt)
	}
}
