//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod filesystem;
pub mod github;
pub mod id_gen;
pub mod llm;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;
pub use github::ReplayingRepoHost;
pub use id_gen::ReplayingIdGenerator;
pub use llm::ReplayingLlmClient;

/// Takes the next recorded output for a sequential port.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output
}

/// Takes the recorded output whose input matches `input`.
pub(crate) fn matching_output<I: serde::Serialize>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
    input: &I,
) -> serde_json::Value {
    let input = serde_json::to_value(input).expect("failed to serialize replay input");
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_matching(port, method, &input).output
}

/// Reads a result recorded with the Ok/Err convention.
///
/// Accepts `{"Ok": v}` / `{"Err": "msg"}` and the lowercase forms used by
/// hand-written cassettes.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("Err").or_else(|| output.get("err")) {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("Ok").or_else(|| output.get("ok")).unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn replay_result_accepts_both_casings() {
        let ok: String = replay_result(&json!({"Ok": "a"}), "t").unwrap();
        assert_eq!(ok, "a");
        let ok: String = replay_result(&json!({"ok": "b"}), "t").unwrap();
        assert_eq!(ok, "b");

        let err = replay_result::<String>(&json!({"Err": "boom"}), "t").unwrap_err();
        assert_eq!(err.to_string(), "boom");
        let err = replay_result::<String>(&json!({"err": "bang"}), "t").unwrap_err();
        assert_eq!(err.to_string(), "bang");
    }

    #[test]
    fn replay_result_reports_shape_mismatch() {
        let err = replay_result::<u32>(&json!({"Ok": "not a number"}), "fs::read").unwrap_err();
        assert!(err.to_string().starts_with("fs::read: failed to deserialize"));
    }
}
