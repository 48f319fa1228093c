//! The single `stacks` table shared by every backend.
//!
//! Columns: `row_id` (auto-increment), `stack_id` (unique) and `stack_data`
//! (comma-joined tokens). Both ids come from `next_id`, which only grows, so
//! an id is never handed out twice even after its row is deleted.

use rpn_core::{decode, encode, filter_tokens};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRow {
    pub row_id: u64,
    pub stack_id: u64,
    pub stack_data: String,
}

/// A stack as returned by listings, with the read filter applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    pub stack_id: u64,
    pub current_stack: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackTable {
    pub next_id: u64,
    pub rows: Vec<StackRow>,
}

impl Default for StackTable {
    fn default() -> Self {
        Self { next_id: 1, rows: Vec::new() }
    }
}

impl StackTable {
    pub fn insert<S: AsRef<str>>(&mut self, tokens: &[S]) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push(StackRow {
            row_id: id,
            stack_id: id,
            stack_data: encode(tokens),
        });
        id
    }

    pub fn get(&self, stack_id: u64) -> Option<Vec<String>> {
        self.row(stack_id).map(|r| decode(&r.stack_data))
    }

    pub fn entries(&self) -> Vec<StackEntry> {
        self.rows
            .iter()
            .map(|r| StackEntry {
                stack_id: r.stack_id,
                current_stack: decode(&r.stack_data),
            })
            .collect()
    }

    /// Overwrite a row with the filtered tokens; returns what was stored.
    pub fn replace<S: AsRef<str>>(&mut self, stack_id: u64, tokens: &[S]) -> Option<Vec<String>> {
        let row = self.rows.iter_mut().find(|r| r.stack_id == stack_id)?;
        let filtered = filter_tokens(tokens);
        row.stack_data = encode(&filtered);
        Some(filtered)
    }

    pub fn remove(&mut self, stack_id: u64) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.stack_id != stack_id);
        self.rows.len() != before
    }

    fn row(&self, stack_id: u64) -> Option<&StackRow> {
        self.rows.iter().find(|r| r.stack_id == stack_id)
    }
}
