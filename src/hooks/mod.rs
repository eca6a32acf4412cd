//! Pre/post hooks: named side-effecting callbacks bound to a node.
//!
//! A hook sees the shared [`Bag`] and [`Memory`] plus an HTTP client, so it
//! can pull external data into state before the model runs (or push results
//! out afterwards).
//!
//! ```rust
//! use agentics::hooks::HookRegistry;
//!
//! let mut hooks = HookRegistry::new();
//! hooks.register("mark_seen", |ctx| async move {
//!     ctx.bag.set("seen", true);
//!     Ok(())
//! });
//! assert!(hooks.resolve("mark_seen").is_ok());
//! assert!(hooks.resolve("missing").is_err());
//! ```

pub mod registry;

pub use registry::{FnHook, HookRegistry};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{AgenticsError, Result};
use crate::state::{Bag, Memory};

/// Where a hook is bound on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HookKind {
    Pre,
    Post,
}

/// What a failing hook does to the agent's turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HookFailurePolicy {
    /// The turn fails with the hook's error.
    ///
    /// A pre-hook failure stops the turn before the model is called. A
    /// post-hook failure runs after the reply was stored, so the response
    /// keeps its content and `next` and carries the error next to them.
    #[default]
    Abort,
    /// The error is logged and the remaining steps run.
    LogAndContinue,
}

/// Execution context handed to every hook.
#[derive(Clone)]
pub struct HookContext {
    pub bag: Arc<Bag>,
    pub memory: Arc<dyn Memory>,
    pub http: reqwest::Client,
    pub cancel: CancellationToken,
}

impl std::fmt::Debug for HookContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookContext")
            .field("bag", &self.bag)
            .field("memory_len", &self.memory.len())
            .finish()
    }
}

/// A named callback run before or after a node's model call.
#[async_trait]
pub trait Hook: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, ctx: &HookContext) -> Result<()>;
}

/// Run `hooks` in order under `policy`.
pub(crate) async fn run_hooks(
    hooks: &[Arc<dyn Hook>],
    ctx: &HookContext,
    policy: HookFailurePolicy,
    node: &str,
    kind: HookKind,
) -> Result<()> {
    for hook in hooks {
        if ctx.cancel.is_cancelled() {
            return Err(AgenticsError::Cancelled);
        }
        if let Err(e) = hook.run(ctx).await {
            match policy {
                HookFailurePolicy::Abort => {
                    return Err(match e {
                        AgenticsError::Hook { .. } | AgenticsError::Cancelled => e,
                        other => AgenticsError::hook(hook.name(), other.to_string()),
                    });
                }
                HookFailurePolicy::LogAndContinue => {
                    warn!(node, hook = hook.name(), %kind, error = %e, "hook failed; continuing");
                }
            }
        }
    }
    Ok(())
}
