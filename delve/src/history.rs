//! Player-facing message log
//!
//! The core writes narration here; tracing is for operators only.

use serde::{Deserialize, Serialize};

/// Display hint attached to a history line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
    Magenta,
    Gray,
}

/// One line of history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub message: String,
    pub color: Option<Color>,
}

/// Append-only sink for narration
pub trait HistorySink {
    fn add_to_history(&mut self, message: &str, color: Option<Color>);
}

/// In-memory history with a read cursor for front ends
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    read: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines ever written, oldest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent line
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }

    /// Lines written since the previous call
    pub fn unread(&mut self) -> &[HistoryEntry] {
        let start = self.read;
        self.read = self.entries.len();
        &self.entries[start..]
    }
}

impl HistorySink for History {
    fn add_to_history(&mut self, message: &str, color: Option<Color>) {
        // Empty hook messages are never surfaced
        if message.trim().is_empty() {
            return;
        }
        self.entries.push(HistoryEntry {
            message: message.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_skips_empty() {
        let mut history = History::new();
        history.add_to_history("", None);
        history.add_to_history("   ", Some(Color::Red));
        assert!(history.is_empty());
    }

    #[test]
    fn test_unread_cursor() {
        let mut history = History::new();
        history.add_to_history("one", None);
        history.add_to_history("two", Some(Color::Green));
        assert_eq!(history.unread().len(), 2);
        assert!(history.unread().is_empty());

        history.add_to_history("three", None);
        let unread = history.unread();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].message, "three");
        assert_eq!(history.len(), 3);
    }
}
