//! Observability helpers for the pipeline steps.
//!
//! # Feature Flags
//!
//! - Spans named `dyndns_client.step` carry the `step` field and are always emitted through
//!   `tracing`; the binary decides whether anything is printed.
//! - Enable `metrics` to increment the `dyndns_client_step_total` counter for every
//!   attempt/success/failure, labeled by `step` + `outcome`.

mod metrics;
mod span;

pub use self::{metrics::*, span::*};

// self
use crate::_prelude::*;

/// Pipeline steps observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
	/// Building and signing the assertion.
	Assertion,
	/// Trading the assertion for an identity token.
	TokenExchange,
	/// Calling the update trigger.
	Update,
}
impl Step {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Step::Assertion => "assertion",
			Step::TokenExchange => "token_exchange",
			Step::Update => "update",
		}
	}
}
impl Display for Step {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
	/// Entry to a step.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StepOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepOutcome::Attempt => "attempt",
			StepOutcome::Success => "success",
			StepOutcome::Failure => "failure",
		}
	}
}
impl Display for StepOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the attempt, runs `fut` inside the step span, then records the outcome.
pub(crate) async fn observe<T, Fut>(step: Step, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	record_step_outcome(step, StepOutcome::Attempt);

	let result = StepSpan::new(step).instrument(fut).await;

	match &result {
		Ok(_) => record_step_outcome(step, StepOutcome::Success),
		Err(e) => {
			tracing::debug!(step = step.as_str(), error = %e, "step failed");
			record_step_outcome(step, StepOutcome::Failure);
		},
	}

	result
}
