use dashmap::DashMap;

use tally_core::CounterKey;

/// Volatile per-key check-in state for the current week.
///
/// Lives for the process lifetime and is lost on restart by design —
/// durable truth is the ledger. An injectable object, not module state, so
/// tests and hosts control its lifecycle. Per-key mutations serialize on
/// the map shard, so concurrent check-ins on one key cannot lose
/// increments.
#[derive(Default)]
pub struct CounterBoard {
    entries: DashMap<CounterKey, CounterEntry>,
}

#[derive(Clone, Debug, Default)]
struct CounterEntry {
    count: u32,
    notes: Vec<String>,
}

impl CounterBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count, materializing the entry at zero on first reference.
    pub fn count(&self, key: &CounterKey) -> u32 {
        self.entries.entry(key.clone()).or_default().count
    }

    /// Saturating increment: `min(count + 1, cap)`. Returns the new count.
    /// Hitting the cap is silent — a UI affordance, not a failure.
    pub fn check_in(&self, key: &CounterKey, cap: u32) -> u32 {
        let mut entry = self.entries.entry(key.clone()).or_default();
        entry.count = entry.count.saturating_add(1).min(cap);
        entry.count
    }

    /// Append a note for the week. Blank text is a no-op. Growth within a
    /// week is unbounded; every rollover clears the list.
    pub fn add_note(&self, key: &CounterKey, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.entries
            .entry(key.clone())
            .or_default()
            .notes
            .push(trimmed.to_string());
    }

    /// Notes joined with `"; "` in insertion order; empty list yields "".
    pub fn note_summary(&self, key: &CounterKey) -> String {
        self.entries
            .get(key)
            .map(|e| e.notes.join("; "))
            .unwrap_or_default()
    }

    /// Count and note summary in one lock acquisition, for rollover.
    pub fn snapshot(&self, key: &CounterKey) -> (u32, String) {
        self.entries
            .get(key)
            .map(|e| (e.count, e.notes.join("; ")))
            .unwrap_or((0, String::new()))
    }

    /// Zero the count and clear the notes. Entries are never deleted.
    pub fn reset(&self, key: &CounterKey) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.count = 0;
            entry.notes.clear();
        }
    }
}
