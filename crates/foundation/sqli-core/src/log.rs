//! Event Log
//!
//! Fixed-capacity, insertion-ordered buffer of attempt records. When an append
//! would exceed capacity the single oldest record is evicted first.

use std::collections::VecDeque;

use crate::record::AttemptRecord;

/// Records kept when no capacity is configured
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded FIFO of attempt records
#[derive(Debug, Clone)]
pub struct EventLog {
    /// Oldest at the front
    records: VecDeque<AttemptRecord>,
    /// Maximum records to keep in memory
    capacity: usize,
}

impl EventLog {
    /// Empty log holding at most `DEFAULT_CAPACITY` records
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Empty log with a custom capacity (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append at the tail, evicting the head when full.
    /// Returns the evicted record, if any.
    pub fn append(&mut self, record: AttemptRecord) -> Option<AttemptRecord> {
        let evicted = if self.records.len() >= self.capacity {
            self.records.pop_front()
        } else {
            None
        };
        self.records.push_back(record);
        evicted
    }

    /// Current contents, oldest first, as owned copies
    pub fn snapshot(&self) -> Vec<AttemptRecord> {
        self.records.iter().cloned().collect()
    }

    /// Borrowing iterator, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &AttemptRecord> {
        self.records.iter()
    }

    /// Most recently appended record
    pub fn last(&self) -> Option<&AttemptRecord> {
        self.records.back()
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
