//! `RecordError`: a bounded LRU of recent error patterns, surfaced as the
//! Error warnings context class.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub text: String,
    pub context: String,
    pub recorded_at: DateTime<Utc>,
}

pub struct ErrorStore {
    capacity: usize,
    entries: VecDeque<ErrorEntry>,
}

impl ErrorStore {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: VecDeque::with_capacity(capacity) }
    }

    pub fn record(&mut self, text: impl Into<String>, context: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ErrorEntry { text: text.into(), context: context.into(), recorded_at: Utc::now() });
    }

    pub fn recent(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_once_over_capacity() {
        let mut store = ErrorStore::new(2);
        store.record("e1", "ctx1");
        store.record("e2", "ctx2");
        store.record("e3", "ctx3");
        assert_eq!(store.len(), 2);
        let texts: Vec<_> = store.recent().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["e2", "e3"]);
    }
}
