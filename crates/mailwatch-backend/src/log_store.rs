use std::collections::VecDeque;

use mailwatch_bridge::log::LogEntry;

/// Ordered, capacity-bounded log scrollback.
///
/// Entries are kept oldest first. Whenever the number of entries would exceed
/// the capacity, the oldest ones are evicted. A capacity of zero is allowed
/// and keeps nothing.
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    capacity: usize,
    entries: VecDeque<LogEntry>,
}

impl LogStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    /// Appends `entry` at the tail, evicting from the head as needed.
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
        self.evict();
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Changes the capacity, evicting the oldest entries if the store is now
    /// over it.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.evict();
    }

    /// Copy of the entries, oldest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict(&mut self) {
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}
