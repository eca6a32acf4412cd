//! Shared run state: the key/value [`Bag`] and the conversation [`Memory`].

pub mod bag;
pub mod memory;
pub mod value;

pub use bag::Bag;
pub use memory::{Memory, SlidingWindowMemory, DEFAULT_MEMORY_WINDOW};
pub use value::Value;
