//! Model-call contract and provider implementations.
//!
//! The engine only depends on [`ModelProvider`]: a system prompt, the
//! conversation history and the declared tools go in; text and/or tool call
//! requests come out.

pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use bon::Builder;

use crate::config::AgenticsConfig;
use crate::error::{AgenticsError, Result};
use crate::tools::ToolDeclaration;
use crate::types::{FinishReason, Message, ResponseFormat, ToolCall, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone, Builder)]
pub struct ModelRequest {
    #[builder(into)]
    pub model: String,
    #[builder(into)]
    pub system_prompt: String,
    #[builder(default)]
    pub messages: Vec<Message>,
    #[builder(default)]
    pub tools: Vec<ToolDeclaration>,
    #[builder(default)]
    pub response_format: ResponseFormat,
}

/// Response from a provider.
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<FinishReason>,
    pub usage: Usage,
}

impl ModelResponse {
    /// A plain text completion.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some(FinishReason::Stop),
            ..Default::default()
        }
    }

    /// A completion requesting tool calls.
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: calls,
            finish_reason: Some(FinishReason::ToolCalls),
            ..Default::default()
        }
    }

    /// Whether the model asked for a tool invocation.
    pub fn is_tool_call(&self) -> bool {
        self.finish_reason == Some(FinishReason::ToolCalls) || !self.tool_calls.is_empty()
    }
}

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// Run one completion.
    async fn execute(&self, request: &ModelRequest) -> Result<ModelResponse>;

    /// Second completion after a tool ran: the original request plus the
    /// assistant's tool call and the tool's output. Tools are not offered
    /// again, so the model answers in text.
    async fn follow_up(
        &self,
        request: &ModelRequest,
        call: &ToolCall,
        output: &str,
    ) -> Result<ModelResponse> {
        let mut request = request.clone();
        request
            .messages
            .push(Message::assistant_tool_calls("", vec![call.clone()]));
        request
            .messages
            .push(Message::tool_result(call.id.clone(), output));
        request.tools.clear();
        self.execute(&request).await
    }
}

/// Create the provider selected by `config`.
#[allow(unused_variables)]
pub fn create_provider(config: &AgenticsConfig) -> Result<Arc<dyn ModelProvider>> {
    match config.provider.as_str() {
        #[cfg(feature = "openai")]
        "openai" => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| AgenticsError::Authentication("Missing OPENAI_API_KEY".into()))?;
            Ok(Arc::new(openai::OpenAiProvider::new(
                api_key,
                config.base_url.clone(),
                config.request_timeout(),
            )))
        }
        other => Err(AgenticsError::Configuration(format!(
            "Provider '{other}' is not available (check enabled features)"
        ))),
    }
}
