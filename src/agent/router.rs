//! Conditional routing that replaces the model call.

use crate::state::{Bag, Memory};

/// Picks the next node directly from state.
///
/// An agent with a router never calls the model, runs no hooks and writes
/// nothing to Memory. Returning `None` (or an empty name) means "no explicit
/// next node"; the graph then follows static edges.
pub trait Router: Send + Sync {
    fn route(&self, bag: &Bag, memory: &dyn Memory) -> Option<String>;
}

impl<F> Router for F
where
    F: Fn(&Bag, &dyn Memory) -> Option<String> + Send + Sync,
{
    fn route(&self, bag: &Bag, memory: &dyn Memory) -> Option<String> {
        self(bag, memory)
    }
}

/// Router that sends the turn to `target` when the latest message contains
/// `needle`, and to `fallback` otherwise.
pub fn route_on_last_message(
    needle: impl Into<String>,
    target: impl Into<String>,
    fallback: Option<String>,
) -> impl Router {
    let needle = needle.into();
    let target = target.into();
    move |_bag: &Bag, memory: &dyn Memory| -> Option<String> {
        match memory.last() {
            Some(msg) if msg.content.contains(&needle) => Some(target.clone()),
            _ => fallback.clone(),
        }
    }
}
