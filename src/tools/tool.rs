//! Tool trait and closure-based tool wrapper.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::arguments::ToolArguments;
use super::types::{ToolDeclaration, ToolParameter};
use crate::error::Result;
use crate::state::Bag;

/// Context available during tool execution.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Shared run state; tools may record results here.
    pub bag: Arc<Bag>,
    pub cancel: CancellationToken,
}

impl ToolContext {
    pub fn new(bag: Arc<Bag>) -> Self {
        Self {
            bag,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Core tool trait: implement to create custom tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Declared parameters.
    fn parameters(&self) -> &[ToolParameter];

    /// Execute the tool with parsed arguments.
    ///
    /// Domain failures the model should see (e.g. division by zero) belong in
    /// the returned value; `Err` aborts the agent's turn.
    async fn execute(&self, args: &ToolArguments, ctx: &ToolContext) -> Result<serde_json::Value>;

    /// Declaration advertised to the model provider.
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters().to_vec(),
        }
    }
}

/// Text sent back to the model for a tool result: strings verbatim, anything
/// else as compact JSON.
pub fn output_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Type alias for the tool handler function.
pub type ToolHandler =
    dyn Fn(ToolArguments, ToolContext) -> BoxFuture<'static, Result<serde_json::Value>> + Send + Sync;

/// Box a closure into a shareable [`ToolHandler`].
pub fn handler<F, Fut>(f: F) -> Arc<ToolHandler>
where
    F: Fn(ToolArguments, ToolContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<serde_json::Value>> + Send + 'static,
{
    Arc::new(move |args, ctx| Box::pin(f(args, ctx)))
}

/// Closure-based tool for quick tool creation.
pub struct FunctionTool {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    /// Create a tool from a closure.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ToolParameter>,
        f: F,
    ) -> Self
    where
        F: Fn(ToolArguments, ToolContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<serde_json::Value>> + Send + 'static,
    {
        Self::from_handler(name, description, parameters, handler(f))
    }

    /// Create a tool around an already boxed handler (e.g. from a registry).
    pub fn from_handler(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ToolParameter>,
        handler: Arc<ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler,
        }
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &[ToolParameter] {
        &self.parameters
    }

    async fn execute(&self, args: &ToolArguments, ctx: &ToolContext) -> Result<serde_json::Value> {
        (self.handler)(args.clone(), ctx.clone()).await
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}
