//! Hook registry and closure-based hooks.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use super::{Hook, HookContext};
use crate::error::{AgenticsError, Result};

type HookFn = dyn Fn(HookContext) -> BoxFuture<'static, Result<()>> + Send + Sync;

/// Closure-based hook.
pub struct FnHook {
    name: String,
    f: Arc<HookFn>,
}

impl FnHook {
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(move |ctx| Box::pin(f(ctx))),
        }
    }
}

#[async_trait]
impl Hook for FnHook {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: &HookContext) -> Result<()> {
        (self.f)(ctx.clone()).await
    }
}

impl std::fmt::Debug for FnHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHook").field("name", &self.name).finish()
    }
}

/// Registry mapping hook names to implementations.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Arc<dyn Hook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure under `name`, replacing any previous binding.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let name = name.into();
        self.hooks
            .insert(name.clone(), Arc::new(FnHook::new(name, f)));
        self
    }

    /// Register a hook implementation under its own name.
    pub fn register_hook(&mut self, hook: Arc<dyn Hook>) -> &mut Self {
        self.hooks.insert(hook.name().to_string(), hook);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Look up a hook; unknown names are a construction error.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Hook>> {
        self.hooks
            .get(name)
            .cloned()
            .ok_or_else(|| AgenticsError::HookNotFound(name.to_string()))
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.hooks.keys().collect();
        names.sort_unstable();
        f.debug_struct("HookRegistry").field("hooks", &names).finish()
    }
}
