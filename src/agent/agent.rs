//! A graph node: instructions plus the capabilities that drive one turn.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::DEFAULT_MODEL;
use crate::error::{AgenticsError, Result};
use crate::hooks::{run_hooks, Hook, HookContext, HookFailurePolicy, HookKind};
use crate::provider::http::shared_client;
use crate::provider::{ModelProvider, ModelRequest, ModelResponse};
use crate::state::{Bag, Memory};
use crate::tools::{output_text, Tool, ToolArguments, ToolContext};
use crate::types::{Message, ResponseFormat, ToolCall};
use crate::util::timeout::with_cancel;

use super::{directive, template, Router};

/// Shared state and services handed to an agent for one turn.
#[derive(Clone)]
pub struct AgentContext {
    pub bag: Arc<Bag>,
    pub memory: Arc<dyn Memory>,
    /// Used when the agent has no provider of its own.
    pub provider: Option<Arc<dyn ModelProvider>>,
    pub http: reqwest::Client,
    pub cancel: CancellationToken,
    pub hook_policy: HookFailurePolicy,
}

impl AgentContext {
    pub fn new(bag: Arc<Bag>, memory: Arc<dyn Memory>) -> Self {
        Self {
            bag,
            memory,
            provider: None,
            http: shared_client().clone(),
            cancel: CancellationToken::new(),
            hook_policy: HookFailurePolicy::default(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_hook_policy(mut self, policy: HookFailurePolicy) -> Self {
        self.hook_policy = policy;
        self
    }

    fn hook_context(&self) -> HookContext {
        HookContext {
            bag: Arc::clone(&self.bag),
            memory: Arc::clone(&self.memory),
            http: self.http.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

/// Outcome of one agent turn.
///
/// Failures never escape a turn: they land in `error`, with empty `content`
/// and no `next`. A failing post-hook is the exception: the reply is already
/// in Memory, so `content` and `next` are kept alongside the error.
#[derive(Debug, Default)]
pub struct AgentResponse {
    pub content: String,
    pub error: Option<AgenticsError>,
    pub next: Option<String>,
}

impl AgentResponse {
    fn completed(content: String, next: Option<String>) -> Self {
        Self {
            content,
            error: None,
            next,
        }
    }

    fn routed(next: Option<String>) -> Self {
        Self {
            next: next.filter(|n| !n.trim().is_empty()),
            ..Default::default()
        }
    }

    fn failed(error: AgenticsError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// A single node of a graph.
///
/// A turn either runs the router (if one is set) and nothing else, or runs
/// pre-hooks, renders the instructions, calls the model, serves at most one
/// tool call with one follow-up completion, reads a `{"next": ...}`
/// directive, appends the reply to Memory and runs post-hooks.
///
/// Only the first declared tool that the model asked for is executed; other
/// tool calls in the same completion are ignored. A tool that fails while
/// running has its error sent to the model as the tool result. Undecodable
/// arguments and cancellation end the turn instead.
pub struct Agent {
    name: String,
    instructions: String,
    model: String,
    branches: Vec<String>,
    router: Option<Arc<dyn Router>>,
    tools: Vec<Arc<dyn Tool>>,
    pre_hooks: Vec<Arc<dyn Hook>>,
    post_hooks: Vec<Arc<dyn Hook>>,
    hook_policy: Option<HookFailurePolicy>,
    provider: Option<Arc<dyn ModelProvider>>,
}

impl Agent {
    /// Create an agent with the default model.
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model: DEFAULT_MODEL.to_string(),
            branches: Vec::new(),
            router: None,
            tools: Vec::new(),
            pre_hooks: Vec::new(),
            post_hooks: Vec::new(),
            hook_policy: None,
            provider: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Make this an orchestrator over `branches`.
    ///
    /// The instructions gain a directive asking for `{"next": "<branch>"}`
    /// and the model is asked for a JSON object reply.
    pub fn with_branches<I, S>(mut self, branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.branches = branches.into_iter().map(Into::into).collect();
        if !self.branches.is_empty() {
            self.instructions.push_str(&branch_directive(&self.branches));
        }
        self
    }

    pub fn with_router(mut self, router: impl Router + 'static) -> Self {
        self.router = Some(Arc::new(router));
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn with_hook(mut self, kind: HookKind, hook: Arc<dyn Hook>) -> Self {
        match kind {
            HookKind::Pre => self.pre_hooks.push(hook),
            HookKind::Post => self.post_hooks.push(hook),
        }
        self
    }

    pub fn with_pre_hook(self, hook: Arc<dyn Hook>) -> Self {
        self.with_hook(HookKind::Pre, hook)
    }

    pub fn with_post_hook(self, hook: Arc<dyn Hook>) -> Self {
        self.with_hook(HookKind::Post, hook)
    }

    /// Override the graph's hook failure policy for this agent.
    pub fn with_hook_policy(mut self, policy: HookFailurePolicy) -> Self {
        self.hook_policy = Some(policy);
        self
    }

    /// Use `provider` instead of the graph's.
    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn has_router(&self) -> bool {
        self.router.is_some()
    }

    /// Run one turn.
    pub async fn run(&self, ctx: &AgentContext) -> AgentResponse {
        if let Some(router) = &self.router {
            let next = router.route(&ctx.bag, ctx.memory.as_ref());
            debug!(node = %self.name, next = ?next, "router selected next node");
            return AgentResponse::routed(next);
        }

        let (content, next) = match self.turn(ctx).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(node = %self.name, error = %e, "agent turn failed");
                return AgentResponse::failed(e);
            }
        };

        let mut response = AgentResponse::completed(content, next);
        let policy = self.hook_policy.unwrap_or(ctx.hook_policy);
        if let Err(e) = run_hooks(
            &self.post_hooks,
            &ctx.hook_context(),
            policy,
            &self.name,
            HookKind::Post,
        )
        .await
        {
            warn!(node = %self.name, error = %e, "post-hook failed");
            response.error = Some(e);
        }
        response
    }

    async fn turn(&self, ctx: &AgentContext) -> Result<(String, Option<String>)> {
        if ctx.cancel.is_cancelled() {
            return Err(AgenticsError::Cancelled);
        }
        let policy = self.hook_policy.unwrap_or(ctx.hook_policy);
        let hook_ctx = ctx.hook_context();

        run_hooks(&self.pre_hooks, &hook_ctx, policy, &self.name, HookKind::Pre).await?;

        let provider = self
            .provider
            .as_ref()
            .or(ctx.provider.as_ref())
            .ok_or_else(|| {
                AgenticsError::Configuration(format!("no model provider for node '{}'", self.name))
            })?;

        let request = ModelRequest::builder()
            .model(self.model.clone())
            .system_prompt(template::render(&self.instructions, &ctx.bag))
            .messages(ctx.memory.all())
            .tools(self.tools.iter().map(|t| t.declaration()).collect())
            .response_format(if self.branches.is_empty() {
                ResponseFormat::Text
            } else {
                ResponseFormat::JsonObject
            })
            .build();

        debug!(node = %self.name, model = %self.model, "calling model");
        let mut response = with_cancel(&ctx.cancel, provider.execute(&request)).await?;

        if response.is_tool_call() {
            let final_response = self
                .serve_tool_call(ctx, provider.as_ref(), &request, &response)
                .await?;
            response = final_response;
        }

        let content = response.content;
        let next = directive::parse(&content)?;
        if let Some(target) = &next {
            if !self.branches.is_empty() && !self.branches.contains(target) {
                return Err(AgenticsError::InvalidDirective(format!(
                    "'{target}' is not a branch of '{}'",
                    self.name
                )));
            }
        }

        ctx.memory.push(Message::assistant(content.clone()));

        Ok((content, next))
    }

    /// Execute the first declared tool the model asked for and return the
    /// follow-up completion.
    async fn serve_tool_call(
        &self,
        ctx: &AgentContext,
        provider: &dyn ModelProvider,
        request: &ModelRequest,
        response: &ModelResponse,
    ) -> Result<ModelResponse> {
        let (tool, call) = self.select_tool(&response.tool_calls)?;

        let args = ToolArguments::parse(&call.arguments)?;
        let tool_ctx = ToolContext::new(Arc::clone(&ctx.bag)).with_cancel(ctx.cancel.clone());
        debug!(node = %self.name, tool = %call.name, "executing tool");
        let output = match with_cancel(&ctx.cancel, tool.execute(&args, &tool_ctx)).await {
            Ok(value) => output_text(&value),
            Err(AgenticsError::Cancelled) => return Err(AgenticsError::Cancelled),
            Err(e) => {
                warn!(node = %self.name, tool = %call.name, error = %e, "tool execution failed");
                output_text(&serde_json::json!({"error": e.to_string()}))
            }
        };

        with_cancel(&ctx.cancel, provider.follow_up(request, call, &output)).await
    }

    fn select_tool<'a>(&'a self, calls: &'a [ToolCall]) -> Result<(&'a Arc<dyn Tool>, &'a ToolCall)> {
        self.tools
            .iter()
            .find_map(|tool| {
                calls
                    .iter()
                    .find(|call| call.name == tool.name())
                    .map(|call| (tool, call))
            })
            .ok_or_else(|| {
                let requested: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
                AgenticsError::ToolNotFound(requested.join(", "))
            })
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("branches", &self.branches)
            .field("router", &self.router.is_some())
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field(
                "pre_hooks",
                &self.pre_hooks.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .field(
                "post_hooks",
                &self.post_hooks.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn branch_directive(branches: &[String]) -> String {
    let mut text = String::from(
        "\n\nReply only with a JSON object naming the agent that should handle the conversation next:",
    );
    for branch in branches {
        text.push_str(&format!("\n{{\"next\": \"{branch}\"}}"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SlidingWindowMemory;

    #[test]
    fn branches_extend_instructions() {
        let agent = Agent::new("orchestrator", "Pick a language.")
            .with_branches(["english_agent", "spanish_agent"]);
        assert!(agent.instructions().starts_with("Pick a language."));
        assert!(agent
            .instructions()
            .contains(r#"{"next": "spanish_agent"}"#));
        assert_eq!(agent.branches().len(), 2);
    }

    #[test]
    fn no_branches_leave_instructions_alone() {
        let agent = Agent::new("a", "Be brief.").with_branches(Vec::<String>::new());
        assert_eq!(agent.instructions(), "Be brief.");
    }

    #[tokio::test]
    async fn router_short_circuits_without_provider() {
        let agent = Agent::new("orchestrator", "unused")
            .with_router(|_bag: &Bag, _memory: &dyn Memory| Some("spanish_agent".to_string()));
        let memory: Arc<dyn Memory> = Arc::new(SlidingWindowMemory::default());
        let ctx = AgentContext::new(Arc::new(Bag::new()), Arc::clone(&memory));

        let resp = agent.run(&ctx).await;
        assert!(resp.is_ok());
        assert_eq!(resp.next.as_deref(), Some("spanish_agent"));
        assert!(resp.content.is_empty());
        assert!(memory.is_empty());
    }

    #[tokio::test]
    async fn missing_provider_is_a_turn_error() {
        let agent = Agent::new("a", "hi");
        let ctx = AgentContext::new(
            Arc::new(Bag::new()),
            Arc::new(SlidingWindowMemory::default()),
        );
        let resp = agent.run(&ctx).await;
        assert!(matches!(resp.error, Some(AgenticsError::Configuration(_))));
        assert!(resp.next.is_none());
    }
}
