//! Graphs declared as JSON documents.
//!
//! ```json
//! {
//!   "entry": "calculator",
//!   "state": [{"name": "result", "type": "int"}],
//!   "nodes": [{
//!     "name": "calculator",
//!     "type": "agent",
//!     "prompt": "Use the tools to answer. Last result: {{result}}",
//!     "functions": [{"type": "pre", "name": "fetchWeather"}],
//!     "tools": [{
//!       "name": "divide",
//!       "description": "Divide a by b",
//!       "parameters": [{"name": "a", "type": "integer"}, {"name": "b", "type": "integer"}]
//!     }]
//!   }],
//!   "edges": []
//! }
//! ```
//!
//! Hooks and tools are bound by name against the registries passed to
//! [`GraphDefinition::build`]; an unknown name fails the build.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::agent::Agent;
use crate::config::AgenticsConfig;
use crate::error::{AgenticsError, Result};
use crate::graph::Graph;
use crate::hooks::{HookKind, HookRegistry};
use crate::provider::ModelProvider;
use crate::state::{Bag, Value};
use crate::tools::{ToolDeclaration, ToolRegistry};

/// Node type whose branches become a next-node directive.
pub const ORCHESTRATOR: &str = "orchestrator";

/// Top-level graph document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub entry: String,
    #[serde(default)]
    pub state: Vec<StateDefinition>,
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub edges: Vec<EdgeDefinition>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A Bag key seeded with a zero value of its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl StateDefinition {
    /// Zero value for this state type; `None` for types not seeded.
    pub fn default_value(&self) -> Option<Value> {
        match self.kind.as_str() {
            "string" => Some(Value::Text(String::new())),
            "int" | "integer" => Some(Value::Integer(0)),
            "float" | "number" => Some(Value::Float(0.0)),
            "bool" | "boolean" => Some(Value::Boolean(false)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionBinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDeclaration>,
}

impl NodeDefinition {
    pub fn is_orchestrator(&self) -> bool {
        self.kind == ORCHESTRATOR
    }
}

/// A registered hook bound to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionBinding {
    #[serde(rename = "type")]
    pub kind: HookKind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDefinition {
    pub source: String,
    pub target: String,
}

impl GraphDefinition {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| AgenticsError::Definition(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Seed `bag` with the zero value of each declared state entry.
    pub fn seed(&self, bag: &Bag) {
        for state in &self.state {
            match state.default_value() {
                Some(value) => bag.set(state.name.clone(), value),
                None => debug!(state = %state.name, kind = %state.kind, "state type not seeded"),
            }
        }
    }

    /// Build a runnable graph.
    ///
    /// Fails on unknown hooks or tools, duplicate nodes, edges naming
    /// unknown nodes, and a missing or unknown entry.
    pub fn build(
        &self,
        hooks: &HookRegistry,
        tools: &ToolRegistry,
        provider: Option<Arc<dyn ModelProvider>>,
        config: &AgenticsConfig,
    ) -> Result<Graph> {
        if self.entry.trim().is_empty() {
            return Err(AgenticsError::MissingEntry);
        }

        let mut graph = Graph::with_config(config.graph_config());
        if let Some(provider) = provider {
            graph = graph.with_provider(provider);
        }
        self.seed(graph.bag());

        for node in &self.nodes {
            graph.add_agent(self.build_agent(node, hooks, tools, config)?)?;
        }

        if !self.nodes.iter().any(|n| n.name == self.entry) {
            return Err(AgenticsError::UnknownNode(self.entry.clone()));
        }
        graph.set_entry(self.entry.clone());

        for edge in &self.edges {
            graph.add_edge(edge.source.clone(), edge.target.clone())?;
        }

        debug!(
            entry = %self.entry,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "graph definition built"
        );
        Ok(graph)
    }

    fn build_agent(
        &self,
        node: &NodeDefinition,
        hooks: &HookRegistry,
        tools: &ToolRegistry,
        config: &AgenticsConfig,
    ) -> Result<Agent> {
        let mut agent = Agent::new(node.name.clone(), node.prompt.clone())
            .with_model(node.model.clone().unwrap_or_else(|| config.model.clone()));

        for binding in &node.functions {
            agent = agent.with_hook(binding.kind, hooks.resolve(&binding.name)?);
        }

        for declaration in &node.tools {
            agent = agent.with_tool(tools.resolve(declaration)?);
        }

        if node.is_orchestrator() {
            if node.branches.is_empty() {
                return Err(AgenticsError::Definition(format!(
                    "orchestrator '{}' declares no branches",
                    node.name
                )));
            }
            agent = agent.with_branches(node.branches.iter().cloned());
        }

        Ok(agent)
    }
}
