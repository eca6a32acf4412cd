//! Graph of agents and the traversal that runs them.
//!
//! Traversal is a breadth-first worklist seeded with the entry node. Each
//! node executes at most once per [`Graph::run`]; an explicit next node from
//! a turn is pushed to the front of the worklist, otherwise the node's
//! outgoing edges append their unvisited targets to the back. A node that
//! routes to itself (or to any node already executed) is not run again
//! within the same run.
//!
//! ```rust
//! use agentics::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> agentics::Result<()> {
//! let mut graph = Graph::new();
//! graph
//!     .add_agent(Agent::new("start", "").with_router(
//!         |_bag: &Bag, _memory: &dyn Memory| -> Option<String> { Some("finish".into()) },
//!     ))?
//!     .add_agent(Agent::new("finish", "").with_router(
//!         |bag: &Bag, _memory: &dyn Memory| -> Option<String> {
//!             bag.set("done", true);
//!             None
//!         },
//!     ))?
//!     .set_entry("start");
//!
//! let summary = graph.run(CancellationToken::new()).await?;
//! assert_eq!(summary.visited(), vec!["start", "finish"]);
//! assert_eq!(graph.bag().get("done"), Some(Value::Boolean(true)));
//! # Ok(())
//! # }
//! ```

pub mod summary;

pub use summary::{NodeStep, RunSummary};

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::agent::{Agent, AgentContext};
use crate::config::GraphConfig;
use crate::error::{AgenticsError, Result};
use crate::provider::http::shared_client;
use crate::provider::ModelProvider;
use crate::state::{Bag, Memory, SlidingWindowMemory};
use crate::types::Role;

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// Agents, edges, entry point and the state they share.
///
/// Bag and Memory live as long as the graph, so repeated runs continue the
/// same conversation.
pub struct Graph {
    nodes: HashMap<String, Arc<Agent>>,
    order: Vec<String>,
    edges: Vec<Edge>,
    entry: Option<String>,
    bag: Arc<Bag>,
    memory: Arc<dyn Memory>,
    provider: Option<Arc<dyn ModelProvider>>,
    config: GraphConfig,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Empty graph with default settings.
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Empty graph whose Memory window and hook policy come from `config`.
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            edges: Vec::new(),
            entry: None,
            bag: Arc::new(Bag::new()),
            memory: Arc::new(SlidingWindowMemory::new(config.memory_window)),
            provider: None,
            config,
        }
    }

    /// Replace the shared state.
    pub fn with_state(mut self, bag: Arc<Bag>, memory: Arc<dyn Memory>) -> Self {
        self.bag = bag;
        self.memory = memory;
        self
    }

    /// Provider for agents that don't carry their own.
    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Register a node. Names are unique.
    pub fn add_agent(&mut self, agent: Agent) -> Result<&mut Self> {
        let name = agent.name().to_string();
        if self.nodes.contains_key(&name) {
            return Err(AgenticsError::DuplicateNode(name));
        }
        self.order.push(name.clone());
        self.nodes.insert(name, Arc::new(agent));
        Ok(self)
    }

    /// Add an edge between two registered nodes. Duplicates and self-loops
    /// are allowed.
    pub fn add_edge(&mut self, source: impl Into<String>, target: impl Into<String>) -> Result<&mut Self> {
        let source = source.into();
        let target = target.into();
        for name in [&source, &target] {
            if !self.nodes.contains_key(name) {
                return Err(AgenticsError::UnknownNode(name.clone()));
            }
        }
        self.edges.push(Edge { source, target });
        Ok(self)
    }

    /// Set the entry node. Checked when the graph runs.
    pub fn set_entry(&mut self, name: impl Into<String>) -> &mut Self {
        self.entry = Some(name.into());
        self
    }

    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    pub fn bag(&self) -> &Arc<Bag> {
        &self.bag
    }

    pub fn memory(&self) -> &Arc<dyn Memory> {
        &self.memory
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.nodes.get(name).map(Arc::as_ref)
    }

    /// Node names in registration order.
    pub fn node_names(&self) -> &[String] {
        &self.order
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Append a user message to Memory and run the graph.
    pub async fn run_with_input(
        &self,
        input: &str,
        cancel: CancellationToken,
    ) -> Result<RunSummary> {
        self.memory.add(Role::User, input);
        self.run(cancel).await
    }

    /// Traverse the graph from its entry node.
    ///
    /// Turn failures are recorded in the summary and never abort the run;
    /// `Err` means the graph has no usable entry or `cancel` fired.
    pub async fn run(&self, cancel: CancellationToken) -> Result<RunSummary> {
        let entry = self.entry.as_deref().ok_or(AgenticsError::MissingEntry)?;
        if !self.nodes.contains_key(entry) {
            return Err(AgenticsError::UnknownNode(entry.to_string()));
        }

        let ctx = AgentContext {
            bag: Arc::clone(&self.bag),
            memory: Arc::clone(&self.memory),
            provider: self.provider.clone(),
            http: shared_client().clone(),
            cancel: cancel.clone(),
            hook_policy: self.config.hook_failure_policy,
        };

        let mut summary = RunSummary::new();
        info!(run_id = %summary.run_id, entry, nodes = self.nodes.len(), "graph run started");

        let mut visited: HashSet<String> = HashSet::new();
        let mut worklist: VecDeque<String> = VecDeque::from([entry.to_string()]);

        while let Some(name) = worklist.pop_front() {
            if cancel.is_cancelled() {
                warn!(node = %name, "graph run cancelled");
                return Err(AgenticsError::Cancelled);
            }
            if !visited.insert(name.clone()) {
                debug!(node = %name, "already visited; skipping");
                continue;
            }
            let Some(agent) = self.nodes.get(&name) else {
                continue;
            };

            debug!(node = %name, "executing node");
            let started = Instant::now();
            let response = agent.run(&ctx).await;
            if matches!(response.error, Some(AgenticsError::Cancelled)) {
                warn!(node = %name, "graph run cancelled");
                return Err(AgenticsError::Cancelled);
            }
            summary
                .steps
                .push(NodeStep::from_response(&name, &response, started.elapsed()));

            match response.next {
                Some(next) if self.nodes.contains_key(&next) => {
                    debug!(node = %name, next = %next, "explicit route");
                    worklist.push_front(next);
                }
                next => {
                    if let Some(unknown) = next {
                        warn!(node = %name, next = %unknown, "route to unknown node skipped");
                    }
                    for edge in self.edges.iter().filter(|e| e.source == name) {
                        if !visited.contains(&edge.target) {
                            worklist.push_back(edge.target.clone());
                        }
                    }
                }
            }
        }

        info!(
            run_id = %summary.run_id,
            executed = summary.steps.len(),
            failed = summary.failures().count(),
            "graph run finished"
        );
        Ok(summary)
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.order)
            .field("edges", &self.edges)
            .field("entry", &self.entry)
            .field("bag", &self.bag)
            .field("memory_len", &self.memory.len())
            .field("provider", &self.provider.as_ref().map(|p| p.provider_name().to_string()))
            .finish()
    }
}
