use std::sync::Mutex;

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Durable storage for the command history.
pub trait HistoryStore {
    fn load(&self) -> Result<Vec<String>, StoreError>;
    fn save(&self, entries: &[String]) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<Vec<String>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: Mutex::new(entries.into_iter().map(Into::into).collect()),
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, entries: &[String]) -> Result<(), StoreError> {
        if let Ok(mut e) = self.entries.lock() {
            *e = entries.to_vec();
        }
        Ok(())
    }
}

/// Result of moving the history cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recall {
    /// Replace the input buffer with this entry.
    Entry(String),
    /// Moved past the newest entry; the input buffer should be emptied.
    Blank,
    /// Already at the oldest entry.
    Unchanged,
}

/// Submitted commands in order, plus the navigation cursor.
///
/// The cursor stays within `0..=len`; `len` means "past the newest entry".
#[derive(Clone, Debug, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl CommandHistory {
    pub fn new(entries: Vec<String>) -> Self {
        let cursor = entries.len();
        Self { entries, cursor }
    }

    pub fn load_from<S: HistoryStore + ?Sized>(store: &S) -> Self {
        match store.load() {
            Ok(entries) => Self::new(entries),
            Err(e) => {
                warn!(target: "core::history", "history load failed, starting empty: {}", e);
                Self::default()
            }
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Appends `command` unless it equals the newest entry, then parks the
    /// cursor past the end. Returns whether an entry was added.
    pub fn record(&mut self, command: &str) -> bool {
        let added = self.entries.last().map(String::as_str) != Some(command);
        if added {
            self.entries.push(command.to_string());
        }
        self.cursor = self.entries.len();
        added
    }

    pub fn prev(&mut self) -> Recall {
        if self.cursor == 0 {
            return Recall::Unchanged;
        }
        self.cursor -= 1;
        Recall::Entry(self.entries[self.cursor].clone())
    }

    pub fn next(&mut self) -> Recall {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            Recall::Entry(self.entries[self.cursor].clone())
        } else {
            self.cursor = self.entries.len();
            Recall::Blank
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn adjacent_duplicates_are_suppressed() {
        let mut h = CommandHistory::default();
        assert!(h.record("ls"));
        assert!(!h.record("ls"));
        assert!(h.record("pwd"));
        assert!(h.record("ls"));
        assert_eq!(h.entries(), ["ls", "pwd", "ls"]);
    }

    #[test]
    fn cursor_starts_past_the_end() {
        let h = CommandHistory::new(vec!["a".into(), "b".into()]);
        assert_eq!(h.cursor(), 2);
    }

    #[test]
    fn prev_stops_at_oldest() {
        let mut h = CommandHistory::new(vec!["a".into(), "b".into()]);
        assert_eq!(h.prev(), Recall::Entry("b".into()));
        assert_eq!(h.prev(), Recall::Entry("a".into()));
        assert_eq!(h.prev(), Recall::Unchanged);
        assert_eq!(h.cursor(), 0);
    }

    #[test]
    fn next_past_newest_blanks_and_parks() {
        let mut h = CommandHistory::new(vec!["a".into(), "b".into()]);
        h.prev();
        h.prev();
        assert_eq!(h.next(), Recall::Entry("b".into()));
        assert_eq!(h.next(), Recall::Blank);
        assert_eq!(h.cursor(), 2);
        assert_eq!(h.next(), Recall::Blank);
        assert_eq!(h.cursor(), 2);
    }

    #[test]
    fn empty_history_navigation() {
        let mut h = CommandHistory::default();
        assert_eq!(h.prev(), Recall::Unchanged);
        assert_eq!(h.next(), Recall::Blank);
        assert_eq!(h.cursor(), 0);
    }

    #[test]
    fn record_resets_cursor_even_for_duplicate() {
        let mut h = CommandHistory::new(vec!["a".into(), "b".into()]);
        h.prev();
        h.prev();
        h.record("b");
        assert_eq!(h.cursor(), 2);
    }

    struct BrokenStore;

    impl HistoryStore for BrokenStore {
        fn load(&self) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
        fn save(&self, _entries: &[String]) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn load_failure_yields_empty_history() {
        let h = CommandHistory::load_from(&BrokenStore);
        assert!(h.is_empty());
        assert_eq!(h.cursor(), 0);
    }

    #[test]
    fn memory_store_round_trips_entries() {
        let store = MemoryHistoryStore::with_entries(["x"]);
        store.save(&["x".to_string(), "y".to_string()]).unwrap();
        assert_eq!(store.load().unwrap(), vec!["x", "y"]);
    }
}
