//! Pipeline progress as an explicit state machine.
//!
//! Steps run in one fixed order. `Complete` is reached only by advancing
//! past the last step; `Failed` is reachable from any running step.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// One unit of work in an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Repository metadata, README and language statistics.
    FetchingRepository,
    /// High-level project summary.
    Summarizing,
    /// Tree listing, file selection and excerpt fetch.
    ScanningFiles,
    /// Architecture analysis over the excerpts.
    AnalyzingArchitecture,
    /// Dependency manifest probes.
    ProbingDependencies,
    /// Install and run instructions.
    DetectingSetup,
    /// Risk and pitfall detection.
    DetectingPitfalls,
    /// Windowed symbol extraction.
    ExtractingSymbols,
    /// Final documentation synthesis.
    SynthesizingWiki,
}

impl Step {
    /// Every step, in execution order.
    pub const ALL: [Step; 9] = [
        Step::FetchingRepository,
        Step::Summarizing,
        Step::ScanningFiles,
        Step::AnalyzingArchitecture,
        Step::ProbingDependencies,
        Step::DetectingSetup,
        Step::DetectingPitfalls,
        Step::ExtractingSymbols,
        Step::SynthesizingWiki,
    ];

    /// The step after this one, or `None` for the last step.
    #[must_use]
    pub fn next(self) -> Option<Step> {
        let index = self.index();
        Self::ALL.get(index + 1).copied()
    }

    /// Zero-based position in [`Step::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or_default()
    }

    /// Progress text shown to the user.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Step::FetchingRepository => "Fetching repository",
            Step::Summarizing => "Summarizing project",
            Step::ScanningFiles => "Scanning files",
            Step::AnalyzingArchitecture => "Analyzing architecture",
            Step::ProbingDependencies => "Reading dependency manifests",
            Step::DetectingSetup => "Detecting setup",
            Step::DetectingPitfalls => "Detecting pitfalls",
            Step::ExtractingSymbols => "Extracting symbols",
            Step::SynthesizingWiki => "Writing documentation",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a run currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    /// Not started.
    Idle,
    /// Executing a step.
    Running(Step),
    /// Every step finished.
    Complete,
    /// A required step failed.
    Failed {
        /// The step that failed.
        step: Step,
        /// What went wrong, as shown to the user.
        message: String,
    },
}

impl PipelineState {
    /// Moves to the next step, or to `Complete` after the last one.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Transition`] when called on a terminal state.
    pub fn advance(&self) -> Result<PipelineState, ReportError> {
        match self {
            PipelineState::Idle => Ok(PipelineState::Running(Step::ALL[0])),
            PipelineState::Running(step) => {
                Ok(step.next().map_or(PipelineState::Complete, PipelineState::Running))
            }
            terminal => Err(ReportError::Transition(format!("cannot advance from {terminal}"))),
        }
    }

    /// Marks the running step as failed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Transition`] unless a step is running.
    pub fn fail(&self, message: impl Into<String>) -> Result<PipelineState, ReportError> {
        match self {
            PipelineState::Running(step) => {
                Ok(PipelineState::Failed { step: *step, message: message.into() })
            }
            other => Err(ReportError::Transition(format!("cannot fail from {other}"))),
        }
    }

    /// `true` for `Complete` and `Failed`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Complete | PipelineState::Failed { .. })
    }

    /// Steps finished so far and the total.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        let total = Step::ALL.len();
        let done = match self {
            PipelineState::Idle => 0,
            PipelineState::Running(step) | PipelineState::Failed { step, .. } => step.index(),
            PipelineState::Complete => total,
        };
        (done, total)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => f.write_str("idle"),
            PipelineState::Running(step) => write!(f, "{step}"),
            PipelineState::Complete => f.write_str("complete"),
            PipelineState::Failed { step, message } => write!(f, "failed at {step}: {message}"),
        }
    }
}
