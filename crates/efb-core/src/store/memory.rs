use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex, PoisonError,
};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{ports::KeyValueStore, Result};

/// Store that never leaves memory. `save` only counts flushes.
#[derive(Debug)]
pub struct MemoryStore {
    doc: Mutex<Value>,
    saves: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            doc: Mutex::new(json!({})),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of completed `save()` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the whole document.
    pub fn snapshot(&self) -> Value {
        self.doc
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        let doc = self.doc.lock().unwrap_or_else(PoisonError::into_inner);
        super::lookup(&doc, key)
    }

    fn set(&self, key: &str, value: Value) {
        let mut doc = self.doc.lock().unwrap_or_else(PoisonError::into_inner);
        super::insert(&mut doc, key, value);
    }

    async fn save(&self) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
