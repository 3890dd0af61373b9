//! Fixed-capacity rolling history of one actor's recent actions.

use arrayvec::ArrayVec;

use crate::combat::ActionId;
use crate::config::CombatConfig;

/// One remembered action.
#[derive(Clone, Debug, PartialEq)]
pub struct ComboEntry {
    pub action: ActionId,
    pub at: f64,
}

impl ComboEntry {
    pub fn new(action: impl Into<ActionId>, at: f64) -> Self {
        Self {
            action: action.into(),
            at,
        }
    }
}

/// Ordered buffer of recent actions, oldest first.
///
/// When full, pushing drops the oldest entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComboWindow {
    entries: ArrayVec<ComboEntry, { CombatConfig::MAX_COMBO_HISTORY }>,
}

impl ComboWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ComboEntry) {
        if self.entries.is_full() {
            self.entries.remove(0);
        }
        self.entries.push(entry);
    }

    /// Drop entries older than `horizon` relative to `now`.
    ///
    /// Returns how many entries were evicted.
    pub fn evict_older_than(&mut self, now: f64, horizon: f64) -> usize {
        let keep_from = self
            .entries
            .iter()
            .position(|entry| now - entry.at <= horizon)
            .unwrap_or(self.entries.len());
        self.entries.drain(..keep_from);
        keep_from
    }

    pub fn entries(&self) -> &[ComboEntry] {
        &self.entries
    }

    pub fn newest(&self) -> Option<&ComboEntry> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
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
    fn full_window_drops_oldest() {
        let mut window = ComboWindow::new();
        for i in 0..=CombatConfig::MAX_COMBO_HISTORY {
            window.push(ComboEntry::new(format!("a{i}"), i as f64));
        }

        assert_eq!(window.len(), CombatConfig::MAX_COMBO_HISTORY);
        assert_eq!(window.entries()[0].action, "a1");
    }

    #[test]
    fn eviction_keeps_recent_entries() {
        let mut window = ComboWindow::new();
        window.push(ComboEntry::new("a", 0.0));
        window.push(ComboEntry::new("b", 2.0));
        window.push(ComboEntry::new("c", 4.0));

        assert_eq!(window.evict_older_than(5.0, 3.0), 1);
        assert_eq!(window.entries()[0].action, "b");
        assert_eq!(window.newest().unwrap().action, "c");
    }
}
