//! Per-pair scrape state storage and the shared surface-profile cursor.

use std::collections::HashMap;

use crate::synth::ScrapeState;

/// `HashMap<(primary, secondary), ScrapeState>` plus the surface cursor
/// shared across all pairs.
#[derive(Debug, Default)]
pub struct ScrapeStateStore {
    entries: HashMap<(u32, u32), ScrapeState>,
    cursor: usize,
}

impl ScrapeStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor_mut(&mut self) -> &mut usize {
        &mut self.cursor
    }

    pub fn get_or_create(&mut self, primary: u32, secondary: u32, start_velocity: f64) -> &mut ScrapeState {
        self.entries
            .entry((primary, secondary))
            .or_insert_with(|| ScrapeState::new(start_velocity))
    }

    /// Returns the pair's state and the shared cursor together, as disjoint
    /// borrows of this store's two fields.
    pub fn state_and_cursor(&mut self, primary: u32, secondary: u32, start_velocity: f64) -> (&mut ScrapeState, &mut usize) {
        let state = self
            .entries
            .entry((primary, secondary))
            .or_insert_with(|| ScrapeState::new(start_velocity));
        (state, &mut self.cursor)
    }

    pub fn remove(&mut self, primary: u32, secondary: u32) {
        self.entries.remove(&(primary, secondary));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn get_or_create_is_idempotent_per_pair() {
        let mut store = ScrapeStateStore::new();
        store.get_or_create(1, 2, 3.0);
        assert_eq!(store.get_or_create(1, 2, 9.0).start_velocity(), 3.0);
    }

    #[test]
    fn remove_drops_only_that_pair() {
        let mut store = ScrapeStateStore::new();
        store.get_or_create(1, 2, 1.0);
        store.get_or_create(3, 4, 1.0);
        store.remove(1, 2);
        assert_eq!(store.entries.len(), 1);
    }

    #[test]
    fn clear_resets_cursor() {
        let mut store = ScrapeStateStore::new();
        *store.cursor_mut() = 123;
        store.clear();
        assert_eq!(*store.cursor_mut(), 0);
    }
}
