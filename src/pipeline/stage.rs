//! Per-step failure policy.
//!
//! A `Required` step's error ends the run. A `BestEffort` step's error is
//! logged and replaced by the output type's `Default`, because no later
//! step depends on it.

use tracing::warn;

use super::state::Step;
use crate::error::ReportError;

/// What a failure in a step means for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Failure aborts the pipeline.
    Required,
    /// Failure yields the declared default and the pipeline continues.
    BestEffort,
}

impl Step {
    /// The failure policy of this step.
    #[must_use]
    pub fn requirement(self) -> Requirement {
        match self {
            Step::FetchingRepository
            | Step::Summarizing
            | Step::ScanningFiles
            | Step::AnalyzingArchitecture
            | Step::SynthesizingWiki => Requirement::Required,
            Step::ProbingDependencies
            | Step::DetectingSetup
            | Step::DetectingPitfalls
            | Step::ExtractingSymbols => Requirement::BestEffort,
        }
    }
}

/// Applies `step`'s policy to its result.
///
/// # Errors
///
/// Returns the original error only when `step` is [`Requirement::Required`].
pub fn settle<T: Default>(step: Step, result: Result<T, ReportError>) -> Result<T, ReportError> {
    match (result, step.requirement()) {
        (Ok(value), _) => Ok(value),
        (Err(err), Requirement::Required) => Err(err),
        (Err(err), Requirement::BestEffort) => {
            warn!(step = %step, error = %err, "best-effort step failed; using default");
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(step: Step) -> ReportError {
        ReportError::EmptyResponse { step }
    }

    #[test]
    fn policy_table() {
        let required: Vec<Step> =
            Step::ALL.into_iter().filter(|s| s.requirement() == Requirement::Required).collect();
        assert_eq!(
            required,
            vec![
                Step::FetchingRepository,
                Step::Summarizing,
                Step::ScanningFiles,
                Step::AnalyzingArchitecture,
                Step::SynthesizingWiki,
            ]
        );
    }

    #[test]
    fn required_failures_propagate() {
        let result: Result<String, _> = settle(Step::Summarizing, Err(empty(Step::Summarizing)));
        assert!(matches!(result, Err(ReportError::EmptyResponse { step: Step::Summarizing })));
    }

    #[test]
    fn best_effort_failures_yield_default() {
        let result: Result<Vec<u32>, _> =
            settle(Step::DetectingPitfalls, Err(empty(Step::DetectingPitfalls)));
        assert_eq!(result.unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn successes_pass_through() {
        assert_eq!(settle(Step::DetectingSetup, Ok(7_u8)).unwrap(), 7);
    }
}
