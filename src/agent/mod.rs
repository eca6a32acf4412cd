//! Agents: the nodes of a graph.

pub mod agent;
pub mod directive;
pub mod router;
pub mod template;

pub use agent::{Agent, AgentContext, AgentResponse};
pub use router::{route_on_last_message, Router};
