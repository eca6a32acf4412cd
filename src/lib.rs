//! agentics: directed-graph execution engine for LLM agents.
//!
//! Agents are nodes in a [`graph::Graph`]. A run walks the graph breadth-first
//! from its entry node, letting each agent call a model (optionally serving
//! one tool call), pick the next node explicitly, or fall back to static
//! edges. All nodes share a key/value [`state::Bag`] and a sliding-window
//! conversation [`state::Memory`].
//!
//! # Quick Start
//!
//! ```no_run
//! use agentics::prelude::*;
//!
//! # async fn example() -> agentics::Result<()> {
//! let config = AgenticsConfig::from_env()?;
//! let provider = agentics::provider::create_provider(&config)?;
//!
//! let mut graph = Graph::new().with_provider(provider);
//! graph
//!     .add_agent(Agent::new("greeter", "Greet the user warmly."))?
//!     .set_entry("greeter");
//!
//! graph.run_with_input("Hello!", CancellationToken::new()).await?;
//! if let Some(reply) = graph.memory().last() {
//!     println!("{}", reply.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod definition;
pub mod error;
pub mod graph;
pub mod hooks;
pub mod prelude;
pub mod provider;
pub mod state;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{AgenticsError, Result};
