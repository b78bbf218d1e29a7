//! FIFO hand-off of websocket urls between scenario steps.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Shared queue of websocket urls.
///
/// Clones share the same underlying queue. Build one per test run (or per
/// test) and hand it to every hook set that should see the same pool.
#[derive(Debug, Clone, Default)]
pub struct UrlQueue {
    inner: Arc<Mutex<VecDeque<String>>>,
}

impl UrlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a url at the tail. Returns the queue length afterwards.
    pub fn push(&self, url: impl Into<String>) -> usize {
        let mut queue = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        queue.push_back(url.into());
        queue.len()
    }

    /// Remove and return the head url, if any.
    pub fn pop(&self) -> Option<String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the pending urls, head first.
    pub fn snapshot(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}
