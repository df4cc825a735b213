//! Per-pair impact synthesis state, retained across frames until reset.

use std::collections::HashMap;

use crate::modes::Modes;

/// Retained modal state for one ordered `(secondary, primary)` pair across
/// successive impacts.
#[derive(Debug, Clone)]
pub struct CollisionAudioInfo {
    pub primary_modes: Modes,
    pub secondary_modes: Modes,
    pub amp: f64,
    pub init_speed: f64,
    pub count: u32,
}

impl CollisionAudioInfo {
    pub fn new(primary_modes: Modes, secondary_modes: Modes, amp: f64) -> Self {
        Self { primary_modes, secondary_modes, amp, init_speed: 0.0, count: 0 }
    }
}

/// `HashMap<(secondary, primary), CollisionAudioInfo>`, matching the two-level
/// associative map in the reference implementation rendered flat.
#[derive(Debug, Default)]
pub struct CollisionAudioStore {
    entries: HashMap<(u32, u32), CollisionAudioInfo>,
}

impl CollisionAudioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, secondary: u32, primary: u32) -> Option<&CollisionAudioInfo> {
        self.entries.get(&(secondary, primary))
    }

    pub fn get_mut(&mut self, secondary: u32, primary: u32) -> Option<&mut CollisionAudioInfo> {
        self.entries.get_mut(&(secondary, primary))
    }

    pub fn get_or_insert_with(
        &mut self,
        secondary: u32,
        primary: u32,
        make: impl FnOnce() -> CollisionAudioInfo,
    ) -> &mut CollisionAudioInfo {
        self.entries.entry((secondary, primary)).or_insert_with(make)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
