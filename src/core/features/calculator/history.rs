use std::collections::VecDeque;

use crate::shared::types::HistoryEntry;

/// Maximum number of calculations kept
pub const MAX_HISTORY_SIZE: usize = 10;

/// Bounded calculation log, most recent first
#[derive(Debug, Clone, Default)]
pub struct CalculationHistory {
    entries: VecDeque<HistoryEntry>,
}

impl CalculationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(MAX_HISTORY_SIZE);
    }

    pub fn record(&mut self, expression: impl Into<String>, result: impl Into<String>) {
        self.add_entry(HistoryEntry::new(expression, result));
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// 0 = most recent
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
