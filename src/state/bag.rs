//! Concurrency-safe key/value store shared by every node of a run.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::value::Value;

/// Mutable world state read and written by agents, hooks and tools.
///
/// Every operation takes the internal lock for its own duration only, so
/// values never alias the store: [`Bag::get`] and [`Bag::all`] hand out
/// copies.
#[derive(Debug, Default)]
pub struct Bag {
    values: RwLock<HashMap<String, Value>>,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Insert or replace the value under `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Point-in-time snapshot of every entry.
    pub fn all(&self) -> HashMap<String, Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convenience typed getters.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(Value::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Text rendering of every entry, for prompt templating.
    pub fn to_text_map(&self) -> HashMap<String, String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn set_then_get_returns_value() {
        let bag = Bag::new();
        bag.set("x", 5);
        assert_eq!(bag.get("x"), Some(Value::Integer(5)));
        assert_eq!(bag.get_i64("x"), Some(5));
        assert_eq!(bag.get("missing"), None);
    }

    #[test]
    fn all_is_a_detached_copy() {
        let bag = Bag::new();
        bag.set("x", 5);

        let mut snapshot = bag.all();
        snapshot.insert("x".into(), Value::Integer(99));
        snapshot.insert("y".into(), Value::from("new"));

        assert_eq!(bag.get("x"), Some(Value::Integer(5)));
        assert!(!bag.contains("y"));
    }

    #[test]
    fn set_replaces_existing_key() {
        let bag = Bag::new();
        bag.set("name", "a");
        bag.set("name", "b");
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get_text("name").as_deref(), Some("b"));
    }

    #[test]
    fn concurrent_writers_do_not_lose_keys() {
        let bag = Arc::new(Bag::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let bag = Arc::clone(&bag);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        bag.set(format!("k{i}_{j}"), j);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(bag.len(), 400);
    }

    #[test]
    fn text_map_coerces_values() {
        let bag = Bag::new();
        bag.set("city", "Buenos Aires");
        bag.set("temp", 21.5);
        let map = bag.to_text_map();
        assert_eq!(map["city"], "Buenos Aires");
        assert_eq!(map["temp"], "21.5");
    }
}
