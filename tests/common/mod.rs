//! Shared test helpers and mock provider.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use agentics::error::{AgenticsError, Result};
use agentics::hooks::HookRegistry;
use agentics::provider::{ModelProvider, ModelRequest, ModelResponse};
use agentics::state::{Bag, Memory};
use agentics::types::{FinishReason, ToolCall, Usage};

/// A mock provider that returns scripted responses and records every
/// request it receives.
#[derive(Default)]
pub struct MockProvider {
    responses: Mutex<Vec<Result<ModelResponse>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push(Ok(ModelResponse {
            content: text.to_string(),
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
        }));
    }

    /// Queue a tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.queue_tool_calls(vec![ToolCall::new(id, name, args.to_string())]);
    }

    pub fn queue_tool_calls(&self, calls: Vec<ToolCall>) {
        self.responses
            .lock()
            .unwrap()
            .push(Ok(ModelResponse::tool_calls(calls)));
    }

    /// Queue a provider failure.
    pub fn queue_error(&self, error: AgenticsError) {
        self.responses.lock().unwrap().push(Err(error));
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, request: &ModelRequest) -> Result<ModelResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(ModelResponse::text("Mock response"));
        }
        responses.remove(0)
    }
}

/// Router that records its node name in the Bag and routes nowhere.
pub fn marking_router(name: &str) -> impl Fn(&Bag, &dyn Memory) -> Option<String> + Send + Sync {
    let key = format!("visited:{name}");
    move |bag: &Bag, _memory: &dyn Memory| -> Option<String> {
        bag.set(key.clone(), true);
        None
    }
}

/// Router that always names `target`.
pub fn fixed_router(target: &str) -> impl Fn(&Bag, &dyn Memory) -> Option<String> + Send + Sync {
    let target = target.to_string();
    move |_bag: &Bag, _memory: &dyn Memory| -> Option<String> { Some(target.clone()) }
}

/// Hook registry whose hooks append their name to the Bag key `trail`.
pub fn trail_hooks(names: &[&str]) -> HookRegistry {
    let mut hooks = HookRegistry::new();
    for name in names {
        let label = name.to_string();
        hooks.register(*name, move |ctx| {
            let label = label.clone();
            async move {
                let mut trail = ctx.bag.get_text("trail").unwrap_or_default();
                if !trail.is_empty() {
                    trail.push(',');
                }
                trail.push_str(&label);
                ctx.bag.set("trail", trail);
                Ok(())
            }
        });
    }
    hooks
}
