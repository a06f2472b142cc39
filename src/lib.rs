//! One-shot dynamic-DNS client for cloud-function backed updaters.
//!
//! The crate signs a service-account assertion, trades it for an identity token at the provider's
//! token endpoint, and calls the update trigger once with that token. Every step runs in sequence
//! and the first failure aborts the rest; see [`run`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod assertion;
pub mod client;
pub mod config;
pub mod error;
pub mod exchange;
pub mod http;
pub mod obs;
pub mod update;

pub use client::{DynDnsClient, run};

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, StatusCode};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
// Used by the binary target only.
use {clap as _, color_eyre as _, tokio as _, tracing_subscriber as _};
#[cfg(test)] use tempfile as _;
