//! Structured and free-form model calls.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::schema::response_schema;
use super::state::Step;
use crate::config::ModelSettings;
use crate::context::ServiceContext;
use crate::error::ReportError;
use crate::ports::CompletionRequest;

/// Sends `prompt` with `T`'s schema attached and parses the answer.
///
/// # Errors
///
/// Returns [`ReportError::Model`] if the call fails,
/// [`ReportError::EmptyResponse`] if no text comes back, and
/// [`ReportError::StructuredResponse`] if the text does not parse as `T`.
pub async fn request_structured<T>(
    ctx: &ServiceContext,
    model: &ModelSettings,
    step: Step,
    schema_name: &str,
    prompt: String,
) -> Result<T, ReportError>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema = response_schema::<T>(step, schema_name)?;
    let request = CompletionRequest {
        model: model.model.clone(),
        prompt,
        max_tokens: model.max_tokens,
        schema: Some(schema),
    };
    let text = complete(ctx, step, &request).await?;
    parse_structured(step, &text)
}

/// Sends `prompt` and returns the trimmed free-form answer.
///
/// # Errors
///
/// Returns [`ReportError::Model`] if the call fails and
/// [`ReportError::EmptyResponse`] if no text comes back.
pub async fn request_text(
    ctx: &ServiceContext,
    model: &ModelSettings,
    step: Step,
    prompt: String,
) -> Result<String, ReportError> {
    let request = CompletionRequest {
        model: model.model.clone(),
        prompt,
        max_tokens: model.max_tokens,
        schema: None,
    };
    let text = complete(ctx, step, &request).await?;
    Ok(text.trim().to_string())
}

async fn complete(
    ctx: &ServiceContext,
    step: Step,
    request: &CompletionRequest,
) -> Result<String, ReportError> {
    let response = ctx
        .llm
        .complete(request)
        .await
        .map_err(|e| ReportError::Model { step, message: e.to_string() })?;
    debug!(
        step = %step,
        prompt_tokens = response.prompt_tokens,
        completion_tokens = response.completion_tokens,
        "model call finished"
    );
    if response.text.trim().is_empty() {
        return Err(ReportError::EmptyResponse { step });
    }
    Ok(response.text)
}

/// Parses a structured answer, tolerating a surrounding markdown code fence.
///
/// # Errors
///
/// Returns [`ReportError::EmptyResponse`] for blank text and
/// [`ReportError::StructuredResponse`] when the JSON does not match `T`.
pub fn parse_structured<T: DeserializeOwned>(step: Step, text: &str) -> Result<T, ReportError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(ReportError::EmptyResponse { step });
    }
    serde_json::from_str(body)
        .map_err(|e| ReportError::StructuredResponse { step, message: e.to_string() })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
