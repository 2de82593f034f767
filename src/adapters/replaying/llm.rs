//! Replaying adapter for the `LlmClient` port.

use std::sync::Mutex;

use super::{matching_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{CompletionFuture, CompletionRequest, LlmClient};

/// Serves recorded completions, matched by the full request.
pub struct ReplayingLlmClient {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingLlmClient {
    /// Create a replaying LLM client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let output = matching_output(&self.replayer, "llm", "complete", request);
        Box::pin(async move { replay_result(&output, "llm::complete") })
    }
}
