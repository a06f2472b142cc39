// crates.io
use tracing::instrument::Instrumented;
// self
use crate::{_prelude::*, obs::Step};

/// A span builder used by pipeline steps.
#[derive(Clone, Debug)]
pub struct StepSpan {
	span: tracing::Span,
}
impl StepSpan {
	/// Creates a new span tagged with the provided step.
	pub fn new(step: Step) -> Self {
		Self { span: tracing::info_span!("dyndns_client.step", step = step.as_str()) }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}
