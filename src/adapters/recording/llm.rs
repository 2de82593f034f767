//! Recording adapter for the `LlmClient` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{CompletionFuture, CompletionRequest, LlmClient};

/// Records model calls while delegating to an inner implementation.
///
/// The full request is the recorded input, so concurrent window
/// extractions can be matched back up on replay.
pub struct RecordingLlmClient {
    inner: Box<dyn LlmClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingLlmClient {
    /// Creates a new recording LLM client wrapping the given implementation.
    pub fn new(inner: Box<dyn LlmClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl LlmClient for RecordingLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.complete(&request).await;
            record_result(&self.recorder, "llm", "complete", &request, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::ReplayingLlmClient;
    use crate::cassette::config::CassetteConfig;
    use crate::ports::CompletionResponse;

    /// Echoes the prompt back, failing on prompts that start with "fail".
    struct Echo;

    impl LlmClient for Echo {
        fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
            let prompt = request.prompt.clone();
            Box::pin(async move {
                if prompt.starts_with("fail") {
                    return Err("overloaded".into());
                }
                Ok(CompletionResponse {
                    text: prompt.to_uppercase(),
                    prompt_tokens: 3,
                    completion_tokens: 3,
                })
            })
        }
    }

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest { model: "m".into(), prompt: prompt.into(), max_tokens: 64, schema: None }
    }

    #[tokio::test]
    async fn responses_and_errors_replay_by_request() {
        let dir = std::env::temp_dir().join("reposcope_rec_llm_test");
        let path = dir.join("llm.cassette.yaml");

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test")));
        {
            let llm = RecordingLlmClient::new(Box::new(Echo), Arc::clone(&recorder));
            assert_eq!(llm.complete(&request("alpha")).await.unwrap().text, "ALPHA");
            assert!(llm.complete(&request("fail now")).await.is_err());
            assert_eq!(llm.complete(&request("beta")).await.unwrap().text, "BETA");
        }
        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let replay = ReplayingLlmClient::new(CassetteConfig::load_cassette(&path).unwrap());
        assert_eq!(replay.complete(&request("beta")).await.unwrap().text, "BETA");
        let err = replay.complete(&request("fail now")).await.unwrap_err();
        assert!(err.to_string().contains("overloaded"));
        assert_eq!(replay.complete(&request("alpha")).await.unwrap().text, "ALPHA");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
