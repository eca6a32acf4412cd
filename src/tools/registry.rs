//! Named tool implementations, resolved when a graph definition binds them.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use super::arguments::ToolArguments;
use super::builtin;
use super::tool::{handler, FunctionTool, Tool, ToolContext, ToolHandler};
use super::types::ToolDeclaration;
use crate::error::{AgenticsError, Result};

/// Registry mapping tool names to their implementations.
///
/// Definitions supply the description and parameters; the registry supplies
/// the code.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the arithmetic tools (`add`, `subtract`,
    /// `multiply`, `divide`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_arithmetic(&mut registry);
        registry
    }

    /// Register (or replace) the implementation for `name`.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(ToolArguments, ToolContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<serde_json::Value>> + Send + 'static,
    {
        self.handlers.insert(name.into(), handler(f));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a tool for `declaration` backed by the registered implementation.
    pub fn resolve(&self, declaration: &ToolDeclaration) -> Result<Arc<dyn Tool>> {
        let handler = self
            .handlers
            .get(&declaration.name)
            .ok_or_else(|| AgenticsError::ToolNotFound(declaration.name.clone()))?;
        Ok(Arc::new(FunctionTool::from_handler(
            declaration.name.clone(),
            declaration.description.clone(),
            declaration.parameters.clone(),
            Arc::clone(handler),
        )))
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
