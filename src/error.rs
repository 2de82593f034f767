//! Error types for the report pipeline.

use thiserror::Error;

use crate::pipeline::state::Step;
use crate::ports::HostError;

/// Everything that can stop an analysis run.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The repository identifier could not be parsed.
    #[error("invalid repository '{input}': expected owner/name or a GitHub URL")]
    InvalidRepository {
        /// What the user typed.
        input: String,
    },

    /// GitHub returned an error during a step.
    #[error("{step} failed: {source}")]
    Upstream {
        /// Step that issued the request.
        step: Step,
        /// The host error.
        #[source]
        source: HostError,
    },

    /// The model call itself failed.
    #[error("{step} failed: model request error: {message}")]
    Model {
        /// Step that issued the request.
        step: Step,
        /// Transport or API message.
        message: String,
    },

    /// The model returned no text.
    #[error("{step} failed: the model returned an empty response")]
    EmptyResponse {
        /// Step that issued the request.
        step: Step,
    },

    /// The model's text did not match the declared shape.
    #[error("{step} failed: malformed structured response: {message}")]
    StructuredResponse {
        /// Step that issued the request.
        step: Step,
        /// Parser message.
        message: String,
    },

    /// The execution-output simulation produced nothing usable.
    #[error("simulation failed: {0}")]
    Simulation(String),

    /// Invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// The cache slot could not be read or written.
    #[error("cache error: {0}")]
    Cache(String),

    /// A state transition that the pipeline does not allow.
    #[error("invalid pipeline transition: {0}")]
    Transition(String),
}

impl ReportError {
    /// Wraps a host error raised while running `step`.
    #[must_use]
    pub fn upstream(step: Step, source: HostError) -> Self {
        Self::Upstream { step, source }
    }
}
