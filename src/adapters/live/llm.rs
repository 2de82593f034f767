//! Live adapter for the `LlmClient` port using the Anthropic messages API.
//!
//! Structured requests are sent as a single tool whose input schema is the
//! declared response schema, with `tool_choice` forcing that tool. The
//! tool input is returned as JSON text.

use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Live LLM client that calls the Anthropic Claude API.
pub struct LiveLlmClient {
    client: Client,
}

impl LiveLlmClient {
    /// Creates a new live LLM client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for LiveLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Request body sent to the Anthropic messages API.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<AnthropicTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice<'a>>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct AnthropicTool<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a serde_json::Value,
}

#[derive(Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    name: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

fn build_body(request: &CompletionRequest) -> AnthropicRequest<'_> {
    let messages = vec![AnthropicMessage { role: "user", content: &request.prompt }];
    match &request.schema {
        Some(schema) => AnthropicRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages,
            tools: vec![AnthropicTool {
                name: &schema.name,
                description: "Record the answer in the required structure.",
                input_schema: &schema.schema,
            }],
            tool_choice: Some(ToolChoice { kind: "tool", name: &schema.name }),
        },
        None => AnthropicRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages,
            tools: Vec::new(),
            tool_choice: None,
        },
    }
}

/// Tool input (as JSON text) when present, otherwise the concatenated text blocks.
fn response_text(content: Vec<ContentBlock>) -> String {
    let mut text = String::new();
    for block in content {
        match block {
            ContentBlock::ToolUse { input } => return input.to_string(),
            ContentBlock::Text { text: t } => text.push_str(&t),
            ContentBlock::Other => {}
        }
    }
    text
}

impl LlmClient for LiveLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| {
                Box::<dyn std::error::Error + Send + Sync>::from(
                    "ANTHROPIC_API_KEY environment variable not set",
                )
            })?;

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&build_body(&request))
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Anthropic API request failed: {e}").into()
                })?;

            let status = response.status();
            let response_text_raw =
                response.text().await.map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Failed to read Anthropic API response: {e}").into()
                })?;

            if !status.is_success() {
                let msg = serde_json::from_str::<AnthropicError>(&response_text_raw)
                    .map(|e| e.error.message)
                    .unwrap_or(response_text_raw);
                return Err(format!("Anthropic API error ({}): {msg}", status.as_u16()).into());
            }

            let api_response: AnthropicResponse = serde_json::from_str(&response_text_raw)
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Failed to parse Anthropic API response: {e}").into()
                })?;

            Ok(CompletionResponse {
                text: response_text(api_response.content),
                prompt_tokens: api_response.usage.input_tokens,
                completion_tokens: api_response.usage.output_tokens,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ports::ResponseSchema;

    fn request(schema: Option<ResponseSchema>) -> CompletionRequest {
        CompletionRequest {
            model: "claude-test".into(),
            prompt: "Summarize".into(),
            max_tokens: 512,
            schema,
        }
    }

    #[test]
    fn plain_request_has_no_tools() {
        let body = serde_json::to_value(build_body(&request(None))).unwrap();
        assert_eq!(body["model"], "claude-test");
        assert_eq!(body["messages"][0]["content"], "Summarize");
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn structured_request_forces_the_schema_tool() {
        let schema = ResponseSchema {
            name: "project_summary".into(),
            schema: json!({"type": "object", "properties": {"summary": {"type": "string"}}}),
        };
        let body = serde_json::to_value(build_body(&request(Some(schema)))).unwrap();
        assert_eq!(body["tools"][0]["name"], "project_summary");
        assert_eq!(body["tools"][0]["input_schema"]["type"], "object");
        assert_eq!(body["tool_choice"], json!({"type": "tool", "name": "project_summary"}));
    }

    #[test]
    fn tool_input_wins_over_text() {
        let response: AnthropicResponse = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "Here you go."},
                {"type": "tool_use", "id": "t1", "name": "project_summary",
                 "input": {"summary": "A CLI."}},
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }))
        .unwrap();
        let text = response_text(response.content);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({"summary": "A CLI."}));
    }

    #[test]
    fn text_blocks_are_concatenated() {
        let response: AnthropicResponse = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "# Docs\n"},
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "Body"},
            ],
            "usage": {"input_tokens": 1, "output_tokens": 2}
        }))
        .unwrap();
        assert_eq!(response_text(response.content), "# Docs\nBody");
    }
}
