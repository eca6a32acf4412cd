//! Bounded conversation log.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

use crate::types::{Message, Role};

/// Default number of messages kept by a graph's memory.
pub const DEFAULT_MEMORY_WINDOW: usize = 10;

/// Append-only, bounded conversation history.
///
/// Appending is the only mutation; entries leave the log only through
/// eviction once the capacity is exceeded.
pub trait Memory: Send + Sync {
    /// Append a message, evicting the oldest entries past capacity.
    fn push(&self, message: Message);

    /// The final `n` messages (all of them if fewer), oldest first.
    fn last_n(&self, n: usize) -> Vec<Message>;

    /// Snapshot of the whole log, oldest first.
    fn all(&self) -> Vec<Message>;

    fn len(&self) -> usize;

    /// Maximum number of retained messages.
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a plain text message.
    fn add(&self, role: Role, content: &str) {
        self.push(Message::new(role, content));
    }

    fn last(&self) -> Option<Message> {
        self.last_n(1).pop()
    }

    /// Message contents in order.
    fn to_strings(&self) -> Vec<String> {
        self.all().into_iter().map(|m| m.content).collect()
    }
}

/// FIFO sliding-window [`Memory`].
#[derive(Debug)]
pub struct SlidingWindowMemory {
    max: usize,
    data: RwLock<VecDeque<Message>>,
}

impl SlidingWindowMemory {
    /// Create a memory keeping at most `max` messages.
    pub fn new(max: usize) -> Self {
        Self {
            max,
            data: RwLock::new(VecDeque::with_capacity(max)),
        }
    }
}

impl Default for SlidingWindowMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_WINDOW)
    }
}

impl Memory for SlidingWindowMemory {
    fn push(&self, message: Message) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.push_back(message);
        while data.len() > self.max {
            data.pop_front();
        }
    }

    fn last_n(&self, n: usize) -> Vec<Message> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        let skip = data.len().saturating_sub(n);
        data.iter().skip(skip).cloned().collect()
    }

    fn all(&self) -> Vec<Message> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn capacity(&self) -> usize {
        self.max
    }
}
