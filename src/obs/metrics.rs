// self
use crate::obs::{Step, StepOutcome};

/// Records a step outcome via the global metrics recorder (when enabled).
pub fn record_step_outcome(step: Step, outcome: StepOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"dyndns_client_step_total",
			"step" => step.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (step, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_step_outcome_noop_without_recorder() {
		record_step_outcome(Step::Update, StepOutcome::Failure);
	}
}
