//! Recording adapters that capture interactions to cassettes.

pub mod clock;
pub mod filesystem;
pub mod github;
pub mod id_gen;
pub mod llm;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

pub use clock::RecordingClock;
pub use filesystem::RecordingFileSystem;
pub use github::RecordingRepoHost;
pub use id_gen::RecordingIdGenerator;
pub use llm::RecordingLlmClient;

/// Records an interaction whose output serializes as-is.
///
/// Typed results (`Result<T, HostError>`) go through here too, keeping
/// serde's `{"Ok": ..}` / `{"Err": ..}` shape so the error variant survives.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let output_json = serde_json::to_value(output).expect("failed to serialize recording output");

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}

/// Records a result whose error is only displayable.
///
/// - `Ok(v)` is serialized as `{"Ok": v}`
/// - `Err(e)` is serialized as `{"Err": e.to_string()}`
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let output = match result {
        Ok(v) => serde_json::json!({
            "Ok": serde_json::to_value(v).expect("failed to serialize Ok value")
        }),
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };
    record_interaction(recorder, port, method, input, &output);
}
