//! Fixed-capacity history buffers (for sparklines and graphs).

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// ~1 minute of traffic samples at 1 Hz
pub const TRAFFIC_HISTORY_CAPACITY: usize = 60;
/// ~24 hours of temperature samples at one per minute
pub const TEMPERATURE_HISTORY_CAPACITY: usize = 1440;
pub const RESOURCE_HISTORY_CAPACITY: usize = 60;

/// Circular buffer holding the most recent samples for one key.
///
/// Samples are kept in insertion order (oldest first). Once `capacity`
/// samples are stored, each push evicts the oldest one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BufferFields<T>")]
pub struct HistoryBuffer<T> {
    capacity: usize,
    samples: VecDeque<T>,
}

/// Unchecked wire form; converted so a stored buffer never exceeds its capacity.
#[derive(Deserialize)]
struct BufferFields<T> {
    capacity: usize,
    samples: VecDeque<T>,
}

impl<T> From<BufferFields<T>> for HistoryBuffer<T> {
    fn from(fields: BufferFields<T>) -> Self {
        let mut buffer = Self::with_capacity(fields.capacity);
        for sample in fields.samples {
            buffer.push(sample);
        }
        buffer
    }
}

impl<T> HistoryBuffer<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.samples.front()
    }

    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl<T: Clone> HistoryBuffer<T> {
    /// Copy of the current contents, oldest to newest
    pub fn snapshot(&self) -> Vec<T> {
        self.samples.iter().cloned().collect()
    }
}

/// Per-key collection of history buffers sharing one capacity.
#[derive(Debug, Clone)]
pub struct HistoryStore<T> {
    capacity: usize,
    buffers: HashMap<String, HistoryBuffer<T>>,
}

impl<T> HistoryStore<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            buffers: HashMap::new(),
        }
    }

    pub fn push(&mut self, key: &str, sample: T) {
        let capacity = self.capacity;
        self.buffers
            .entry(key.to_string())
            .or_insert_with(|| HistoryBuffer::with_capacity(capacity))
            .push(sample);
    }

    pub fn get(&self, key: &str) -> Option<&HistoryBuffer<T>> {
        self.buffers.get(key)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.buffers.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl<T: Clone> HistoryStore<T> {
    /// Ordered samples for `key`; empty when the key has never been pushed
    pub fn snapshot(&self, key: &str) -> Vec<T> {
        self.buffers
            .get(key)
            .map(HistoryBuffer::snapshot)
            .unwrap_or_default()
    }
}
