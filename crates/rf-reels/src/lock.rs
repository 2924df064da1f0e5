//! Spin trigger lock derived from the balance

use serde::{Deserialize, Serialize};

/// Whether the spin trigger is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockState {
    Unlocked,
    Locked,
}

impl Default for LockState {
    fn default() -> Self {
        Self::Unlocked
    }
}

impl LockState {
    /// Transition on a broke signal.
    ///
    /// | current  | broke | next     |
    /// |----------|-------|----------|
    /// | any      | true  | Locked   |
    /// | Locked   | false | Unlocked |
    /// | Unlocked | false | Unlocked |
    pub fn on_broke(self, is_broke: bool) -> Self {
        match (self, is_broke) {
            (_, true) => Self::Locked,
            (Self::Locked, false) => Self::Unlocked,
            (state, false) => state,
        }
    }

    pub fn is_locked(self) -> bool {
        self == Self::Locked
    }

    /// Spin input listener attached?
    pub fn trigger_attached(self) -> bool {
        !self.is_locked()
    }
}
