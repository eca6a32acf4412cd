//! What a single `Graph::run` did.

use std::time::Duration;

use uuid::Uuid;

use crate::agent::AgentResponse;

/// One executed node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStep {
    pub node: String,
    pub content: String,
    pub next: Option<String>,
    /// Text of the turn error, if the turn failed.
    pub error: Option<String>,
    pub duration: Duration,
}

impl NodeStep {
    pub(crate) fn from_response(node: &str, response: &AgentResponse, duration: Duration) -> Self {
        Self {
            node: node.to_string(),
            content: response.content.clone(),
            next: response.next.clone(),
            error: response.error.as_ref().map(ToString::to_string),
            duration,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Executed nodes of one run, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub steps: Vec<NodeStep>,
}

impl RunSummary {
    pub(crate) fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            steps: Vec::new(),
        }
    }

    /// Node names in execution order.
    pub fn visited(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.node.as_str()).collect()
    }

    pub fn step(&self, node: &str) -> Option<&NodeStep> {
        self.steps.iter().find(|s| s.node == node)
    }

    /// Steps whose turn failed.
    pub fn failures(&self) -> impl Iterator<Item = &NodeStep> {
        self.steps.iter().filter(|s| !s.is_ok())
    }

    /// Content of the last step that produced any.
    pub fn last_content(&self) -> Option<&str> {
        self.steps
            .iter()
            .rev()
            .map(|s| s.content.as_str())
            .find(|c| !c.is_empty())
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }
}
