//! Convenience re-exports for common use.

pub use crate::agent::{Agent, AgentContext, AgentResponse, Router};
pub use crate::config::{AgenticsConfig, GraphConfig};
pub use crate::definition::GraphDefinition;
pub use crate::error::{AgenticsError, Result};
pub use crate::graph::{Graph, NodeStep, RunSummary};
pub use crate::hooks::{Hook, HookContext, HookFailurePolicy, HookKind, HookRegistry};
pub use crate::provider::{ModelProvider, ModelRequest, ModelResponse};
pub use crate::state::{Bag, Memory, SlidingWindowMemory, Value};
pub use crate::tools::{Tool, ToolArguments, ToolContext, ToolDeclaration, ToolParameter, ToolRegistry};
pub use crate::types::{Message, Role, ToolCall};
pub use tokio_util::sync::CancellationToken;
