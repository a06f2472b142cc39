//! Client configuration loaded from the `[client_config]` section of an INI file.
//!
//! Recognized keys:
//!
//! - `private_key_file`: path to the PEM-encoded service-account private key.
//! - `gcp_project`: project hosting the service account.
//! - `cloud_function_trigger_url`: absolute URL of the update function.
//! - `hostname`: host name whose record should be updated.
//! - `token_endpoint` (optional): overrides the provider token endpoint.
//! - `service_account` (optional): overrides the service account name.
//!
//! Values are trimmed and an empty value counts as missing, so a [`ClientConfig`] never exists
//! with a required field absent.

// std
use std::sync::LazyLock;
// crates.io
use ini::{Ini, ParseOption, Properties};
// self
use crate::{_prelude::*, error::ConfigError};

/// Section holding the client keys.
pub const SECTION: &str = "client_config";
/// Provider token endpoint used when `token_endpoint` is not configured.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v4/token";
/// Service account name used when `service_account` is not configured.
pub const DEFAULT_SERVICE_ACCOUNT: &str = "dyndns-client";

static DEFAULT_TOKEN_ENDPOINT_URL: LazyLock<Url> = LazyLock::new(|| {
	Url::parse(DEFAULT_TOKEN_ENDPOINT).expect("Default token endpoint must be a valid URL.")
});

/// Read-only settings for one client run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Path to the PEM-encoded private key.
	pub private_key_file: PathBuf,
	/// Cloud project identifier.
	pub gcp_project: String,
	/// Trigger URL of the update function.
	pub cloud_function_trigger_url: Url,
	/// Trigger URL exactly as configured, signed as `target_audience`.
	pub target_audience: String,
	/// Host name to update.
	pub hostname: String,
	/// Token endpoint used both as assertion audience and exchange target.
	pub token_endpoint: Url,
	/// Service account name, without the project domain.
	pub service_account: String,
}
impl ClientConfig {
	/// Creates a configuration with the default token endpoint and service account.
	pub fn new(
		private_key_file: impl Into<PathBuf>,
		gcp_project: impl Into<String>,
		cloud_function_trigger_url: Url,
		hostname: impl Into<String>,
	) -> Self {
		Self {
			private_key_file: private_key_file.into(),
			gcp_project: gcp_project.into(),
			target_audience: cloud_function_trigger_url.as_str().to_owned(),
			cloud_function_trigger_url,
			hostname: hostname.into(),
			token_endpoint: DEFAULT_TOKEN_ENDPOINT_URL.clone(),
			service_account: DEFAULT_SERVICE_ACCOUNT.into(),
		}
	}

	/// Overrides the token endpoint.
	pub fn with_token_endpoint(mut self, endpoint: Url) -> Self {
		self.token_endpoint = endpoint;

		self
	}

	/// Overrides the service account name.
	pub fn with_service_account(mut self, account: impl Into<String>) -> Self {
		self.service_account = account.into();

		self
	}

	/// Loads the configuration from an INI file on disk.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let ini = Ini::load_from_file_opt(path, literal_values())
			.map_err(|source| ConfigError::Load { path: path.to_path_buf(), source })?;

		tracing::debug!(path = %path.display(), "loaded configuration file");

		Self::from_ini(&ini)
	}

	/// Parses the configuration from an in-memory INI document.
	pub fn from_ini_str(document: &str) -> Result<Self, ConfigError> {
		let ini = Ini::load_from_str_opt(document, literal_values())?;

		Self::from_ini(&ini)
	}

	fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
		let section =
			ini.section(Some(SECTION)).ok_or(ConfigError::MissingSection { section: SECTION })?;
		let private_key_file = required(section, "private_key_file")?;
		let gcp_project = required(section, "gcp_project")?;
		let trigger_url = required(section, "cloud_function_trigger_url")?;
		let hostname = required(section, "hostname")?;
		let cloud_function_trigger_url = parse_url("cloud_function_trigger_url", trigger_url)?;
		let mut config =
			Self::new(private_key_file, gcp_project, cloud_function_trigger_url, hostname);

		config.target_audience = trigger_url.into();

		if let Some(endpoint) = optional(section, "token_endpoint") {
			config.token_endpoint = parse_url("token_endpoint", endpoint)?;
		}
		if let Some(account) = optional(section, "service_account") {
			config.service_account = account.into();
		}

		if config.cloud_function_trigger_url.scheme() != "https" {
			tracing::warn!(
				url = %config.cloud_function_trigger_url,
				"trigger URL does not use https; the bearer token will travel in clear text"
			);
		}

		Ok(config)
	}

	/// Returns the service account e-mail used as assertion issuer.
	pub fn issuer(&self) -> String {
		format!("{}@{}.iam.gserviceaccount.com", self.service_account, self.gcp_project)
	}
}

// Quotes and backslashes are part of the value.
fn literal_values() -> ParseOption {
	ParseOption { enabled_quote: false, enabled_escape: false, ..Default::default() }
}

fn optional<'a>(section: &'a Properties, field: &'static str) -> Option<&'a str> {
	section.get(field).map(str::trim).filter(|value| !value.is_empty())
}

fn required<'a>(section: &'a Properties, field: &'static str) -> Result<&'a str, ConfigError> {
	optional(section, field).ok_or(ConfigError::MissingField { field })
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
	Url::parse(value).map_err(|source| ConfigError::InvalidUrl { field, source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const COMPLETE: &str = "\
[client_config]
private_key_file = /etc/dyndns/key.pem
gcp_project = acme-dns
cloud_function_trigger_url = https://europe-west1-acme-dns.cloudfunctions.net/update
hostname = home.example.com
";

	#[test]
	fn parses_complete_section_with_defaults() {
		let config = ClientConfig::from_ini_str(COMPLETE).expect("Complete config should parse.");

		assert_eq!(config.private_key_file, PathBuf::from("/etc/dyndns/key.pem"));
		assert_eq!(config.gcp_project, "acme-dns");
		assert_eq!(
			config.cloud_function_trigger_url.as_str(),
			"https://europe-west1-acme-dns.cloudfunctions.net/update"
		);
		assert_eq!(config.hostname, "home.example.com");
		assert_eq!(config.token_endpoint.as_str(), DEFAULT_TOKEN_ENDPOINT);
		assert_eq!(config.target_audience, config.cloud_function_trigger_url.as_str());
		assert_eq!(config.issuer(), "dyndns-client@acme-dns.iam.gserviceaccount.com");
	}

	#[test]
	fn optional_keys_override_defaults() {
		let document = format!(
			"{COMPLETE}token_endpoint = https://id.example.com/token\nservice_account = updater\n"
		);
		let config =
			ClientConfig::from_ini_str(&document).expect("Config with overrides should parse.");

		assert_eq!(config.token_endpoint.as_str(), "https://id.example.com/token");
		assert_eq!(config.issuer(), "updater@acme-dns.iam.gserviceaccount.com");
	}

	#[test]
	fn every_required_field_is_enforced() {
		for field in ["private_key_file", "gcp_project", "cloud_function_trigger_url", "hostname"] {
			let document = COMPLETE
				.lines()
				.filter(|line| !line.starts_with(field))
				.collect::<Vec<_>>()
				.join("\n");
			let err = ClientConfig::from_ini_str(&document)
				.expect_err("Config without a required field should fail.");

			assert!(
				matches!(err, ConfigError::MissingField { field: missing } if missing == field),
				"unexpected error for {field}: {err:?}"
			);
		}
	}

	#[test]
	fn empty_values_count_as_missing() {
		let document = COMPLETE.replace("hostname = home.example.com", "hostname =   ");
		let err = ClientConfig::from_ini_str(&document).expect_err("Empty hostname should fail.");

		assert!(matches!(err, ConfigError::MissingField { field: "hostname" }));
	}

	#[test]
	fn missing_section_is_reported() {
		let document = COMPLETE.replace("[client_config]", "[other]");
		let err = ClientConfig::from_ini_str(&document).expect_err("Wrong section should fail.");

		assert!(matches!(err, ConfigError::MissingSection { section: SECTION }));
	}

	#[test]
	fn relative_trigger_url_is_rejected() {
		let document = COMPLETE.replace(
			"https://europe-west1-acme-dns.cloudfunctions.net/update",
			"/update",
		);
		let err = ClientConfig::from_ini_str(&document).expect_err("Relative URL should fail.");

		assert!(matches!(err, ConfigError::InvalidUrl { field: "cloud_function_trigger_url", .. }));
	}

	#[test]
	fn quotes_and_backslashes_are_kept_literally() {
		let document = COMPLETE
			.replace("/etc/dyndns/key.pem", r"C:\keys\new.pem")
			.replace("hostname = home.example.com", r#"hostname = "home\tlab".example.com"#);
		let config = ClientConfig::from_ini_str(&document).expect("Literal values should parse.");

		assert_eq!(config.private_key_file, PathBuf::from(r"C:\keys\new.pem"));
		assert_eq!(config.hostname, r#""home\tlab".example.com"#);
	}

	#[test]
	fn trigger_url_is_kept_as_configured() {
		let document = COMPLETE.replace(
			"https://europe-west1-acme-dns.cloudfunctions.net/update",
			"https://svc-abc.a.run.app",
		);
		let config = ClientConfig::from_ini_str(&document).expect("Bare origin should parse.");

		assert_eq!(config.target_audience, "https://svc-abc.a.run.app");
		assert_eq!(config.cloud_function_trigger_url.as_str(), "https://svc-abc.a.run.app/");
	}

	#[test]
	fn default_token_endpoint_is_valid() {
		assert_eq!(DEFAULT_TOKEN_ENDPOINT_URL.as_str(), DEFAULT_TOKEN_ENDPOINT);
	}

	#[test]
	fn missing_file_is_a_load_error() {
		let err = ClientConfig::load("/nonexistent/dyndns/client.ini")
			.expect_err("Missing file should fail.");

		assert!(matches!(err, ConfigError::Load { .. }));
	}
}
