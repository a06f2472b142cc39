//! Authorized call to the dynamic-DNS update trigger.
//!
//! The trigger performs the DNS change on its own side; all the client observes is the HTTP
//! status. Updaters that answer with `{"hostname": …, "address": …}` additionally report the
//! address they assigned, which ends up in [`UpdateReceipt::address`].

// crates.io
use reqwest::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	exchange::BearerToken,
	http::{self, ReqwestHttpClient},
	obs::Step,
};

/// Query parameter carrying the host name.
pub const HOSTNAME_PARAM: &str = "hostname";

/// Outcome of a successful update call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateReceipt {
	/// Host name sent to the trigger.
	pub hostname: String,
	/// HTTP status returned by the trigger.
	pub status: u16,
	/// Address reported by the trigger, when its body carries one.
	pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdaterResponse {
	hostname: String,
	address: String,
}

/// Issues the authorized update request.
#[derive(Clone, Debug)]
pub struct UpdateInvoker<'a> {
	http: &'a ReqwestHttpClient,
	trigger_url: &'a Url,
	hostname: &'a str,
}
impl<'a> UpdateInvoker<'a> {
	/// Creates an invoker for `hostname` against `trigger_url`.
	pub fn new(http: &'a ReqwestHttpClient, trigger_url: &'a Url, hostname: &'a str) -> Self {
		Self { http, trigger_url, hostname }
	}

	/// Returns the trigger URL with the `hostname` query parameter appended.
	pub fn request_url(&self) -> Url {
		let mut url = self.trigger_url.clone();

		url.query_pairs_mut().append_pair(HOSTNAME_PARAM, self.hostname);

		url
	}

	/// Calls the trigger once with `token` as bearer credential.
	pub async fn invoke(&self, token: &BearerToken) -> Result<UpdateReceipt> {
		let url = self.request_url();

		tracing::info!(url = %url, hostname = self.hostname, "triggering DNS update");

		let request =
			self.http.get(url).header(AUTHORIZATION, format!("Bearer {}", token.expose()));
		let body = http::send(Step::Update, request).await?;
		let address = reported_address(self.hostname, &body.bytes);

		if let Some(address) = &address {
			tracing::info!(hostname = self.hostname, address = %address, "trigger reported address");
		}

		Ok(UpdateReceipt {
			hostname: self.hostname.to_owned(),
			status: body.status.as_u16(),
			address,
		})
	}
}

fn reported_address(hostname: &str, bytes: &[u8]) -> Option<String> {
	let response = serde_json::from_slice::<UpdaterResponse>(bytes).ok()?;

	if response.hostname != hostname {
		tracing::warn!(
			requested = hostname,
			reported = %response.hostname,
			"trigger reported a different hostname"
		);
	}

	Some(response.address)
}
