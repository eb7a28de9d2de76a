use std::collections::VecDeque;

use chrono::Utc;

use crate::models::{ToolHistoryEntry, ToolRequest, ToolResponse};

/// Bounded log of successful tool invocations. Oldest entries are evicted
/// once the capacity is reached; ids stay monotonic across evictions.
#[derive(Debug)]
pub struct HistoryLog {
    entries: VecDeque<ToolHistoryEntry>,
    max_entries: usize,
    next_id: u64,
}

impl HistoryLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
            next_id: 1,
        }
    }

    pub fn record(&mut self, tool_id: &str, request: &ToolRequest, response: &ToolResponse) {
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }

        let entry = ToolHistoryEntry {
            id: self.next_id,
            tool_id: tool_id.to_string(),
            input: request.input.clone(),
            output: response.output.clone(),
            settings: request.settings.clone(),
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.entries.push_back(entry);
    }

    /// Most recent entries first.
    pub fn recent(&self, limit: usize) -> Vec<ToolHistoryEntry> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }

    pub fn for_tool(&self, tool_id: &str, limit: usize) -> Vec<ToolHistoryEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.tool_id == tool_id)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
