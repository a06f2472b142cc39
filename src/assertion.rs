//! Signed service-account assertions for the JWT-bearer grant.
//!
//! An [`Assertion`] is an RS256-signed JWT naming the service account as issuer, the token
//! endpoint as audience, and the trigger URL as `target_audience`. It is valid for
//! [`ASSERTION_LIFETIME`] after issuance, so every run signs a fresh one.

// std
use std::{fs::File, io::Read};
// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::{ConfigError, KeyFormatError},
};

/// Validity window of every assertion.
pub const ASSERTION_LIFETIME: Duration = Duration::seconds(30);

/// Raw private-key material, redacted in every formatter.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Vec<u8>);
impl SigningKey {
	/// Wraps key bytes that are already in memory.
	pub fn from_pem(pem: impl Into<Vec<u8>>) -> Self {
		Self(pem.into())
	}

	/// Reads the key file in one pass; the handle is closed before this returns.
	pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let map_err = |source| ConfigError::KeyFile { path: path.to_path_buf(), source };
		let mut pem = Vec::new();

		{
			let mut file = File::open(path).map_err(map_err)?;

			file.read_to_end(&mut pem).map_err(map_err)?;
		}

		Ok(Self(pem))
	}

	/// Returns the raw key bytes. Callers must avoid logging them.
	pub fn expose(&self) -> &[u8] {
		&self.0
	}

	fn encoding_key(&self) -> Result<EncodingKey, KeyFormatError> {
		if self.0.iter().all(u8::is_ascii_whitespace) {
			return Err(KeyFormatError::Empty);
		}

		EncodingKey::from_rsa_pem(&self.0).map_err(|source| KeyFormatError::InvalidKey { source })
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SigningKey").field(&"<redacted>").finish()
	}
}

/// Claim set carried by an [`Assertion`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Service account e-mail.
	pub iss: String,
	/// Token endpoint the assertion is presented to.
	pub aud: String,
	/// Audience of the identity token being requested.
	pub target_audience: String,
	/// Issued-at, in Unix seconds.
	pub iat: i64,
	/// Expiry, in Unix seconds.
	pub exp: i64,
}
impl AssertionClaims {
	/// Builds the claim set for `config`, issued at `issued_at`.
	pub fn new(config: &ClientConfig, issued_at: OffsetDateTime) -> Self {
		let iat = issued_at.unix_timestamp();

		Self {
			iss: config.issuer(),
			aud: config.token_endpoint.to_string(),
			target_audience: config.target_audience.clone(),
			iat,
			exp: iat + ASSERTION_LIFETIME.whole_seconds(),
		}
	}
}

/// Signed JWT in compact serialization.
#[derive(Clone)]
pub struct Assertion {
	token: String,
	claims: AssertionClaims,
}
impl Assertion {
	/// Returns the encoded JWT. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.token
	}

	/// Returns the signed claim set.
	pub fn claims(&self) -> &AssertionClaims {
		&self.claims
	}
}
impl Debug for Assertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Assertion")
			.field("token", &"<redacted>")
			.field("claims", &self.claims)
			.finish()
	}
}
impl Display for Assertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Builds and signs assertions for one configuration.
#[derive(Clone, Debug)]
pub struct AssertionBuilder<'a> {
	config: &'a ClientConfig,
	issued_at: Option<OffsetDateTime>,
}
impl<'a> AssertionBuilder<'a> {
	/// Creates a builder issuing at the current UTC time.
	pub fn new(config: &'a ClientConfig) -> Self {
		Self { config, issued_at: None }
	}

	/// Pins the issued-at instant instead of reading the clock.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Signs the claim set with `key` using RS256.
	pub fn sign(self, key: &SigningKey) -> Result<Assertion, KeyFormatError> {
		let encoding_key = key.encoding_key()?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let claims = AssertionClaims::new(self.config, issued_at);
		let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
			.map_err(|source| KeyFormatError::Signing { source })?;

		tracing::debug!(iss = %claims.iss, iat = claims.iat, exp = claims.exp, "signed assertion");

		Ok(Assertion { token, claims })
	}
}
