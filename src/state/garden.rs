//! Garden slots: one visual marker per completed focus session

use serde::{Deserialize, Serialize};

/// Default number of slots shown in the garden row
pub const DEFAULT_GARDEN_SLOTS: usize = 4;
/// Upper bound accepted for `--slots`
pub const MAX_GARDEN_SLOTS: u64 = 64;

/// What a slot currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    Empty,
    Sprouting,
    Grown,
}

/// Ordered slot sequence plus the slot currently being worked on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Garden {
    slots: usize,
    sprouting: Option<u32>,
}

impl Garden {
    pub fn new(slots: usize) -> Self {
        Self {
            slots,
            sprouting: None,
        }
    }

    /// Show an empty pot in the slot the running focus session will fill
    pub fn plant(&mut self, sessions_completed: u32) {
        self.sprouting = Some(sessions_completed);
    }

    /// The sprouting slot became a grown plant
    pub fn grow(&mut self) {
        self.sprouting = None;
    }

    pub fn clear(&mut self) {
        self.sprouting = None;
    }

    /// Slot `i` is grown iff `i < sessions_completed`. Sessions beyond the
    /// slot count are counted but not drawn.
    pub fn render(&self, sessions_completed: u32) -> Vec<SlotState> {
        (0..self.slots)
            .map(|i| {
                let i = i as u32;
                if i < sessions_completed {
                    SlotState::Grown
                } else if self.sprouting == Some(i) {
                    SlotState::Sprouting
                } else {
                    SlotState::Empty
                }
            })
            .collect()
    }
}

impl Default for Garden {
    fn default() -> Self {
        Self::new(DEFAULT_GARDEN_SLOTS)
    }
}
